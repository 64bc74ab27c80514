pub mod push;

use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// Parse a JSON request body, treating an empty body as `T::default()`.
///
/// Bodies are read as raw bytes rather than through the `Json` extractor so
/// a missing `Content-Type` or an empty body follows the same path as `{}`.
pub fn parse_json_body<T>(body: &[u8]) -> AppResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}
