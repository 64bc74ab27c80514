//! VAPID credential resolution.
//!
//! Keys can be configured in three shapes, checked in this order:
//!
//! 1. `VAPID_PUBLIC_KEY` + `VAPID_PRIVATE_KEY`
//! 2. `VAPID_KEYS` as JSON: `{"publicKey":"...","privateKey":"..."}`
//! 3. `VAPID_KEYS` as `public:private`
//!
//! The first shape that yields two non-empty keys wins. If none does, the
//! server must not start.

use std::fmt;

use serde::Deserialize;

/// Default VAPID `sub` claim when `VAPID_CONTACT_EMAIL` is not set.
pub const DEFAULT_CONTACT: &str = "mailto:admin@example.com";

/// Human-readable list of accepted configuration shapes, for startup errors.
pub const ACCEPTED_SHAPES: [&str; 3] = [
    "VAPID_PUBLIC_KEY + VAPID_PRIVATE_KEY",
    r#"VAPID_KEYS as JSON: {"publicKey":"...","privateKey":"..."}"#,
    "VAPID_KEYS as public:private",
];

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Missing VAPID keys in environment")]
    Missing,
}

/// Which configuration shape the keys were taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    ExplicitPair,
    BundledJson,
    BundledColon,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KeySource::ExplicitPair => "VAPID_PUBLIC_KEY + VAPID_PRIVATE_KEY",
            KeySource::BundledJson => "VAPID_KEYS (JSON)",
            KeySource::BundledColon => "VAPID_KEYS (public:private)",
        };
        f.write_str(s)
    }
}

/// Raw credential inputs, before any precedence is applied.
#[derive(Debug, Clone, Default)]
pub struct VapidKeyInputs {
    pub public_key: Option<String>,
    pub private_key: Option<String>,
    pub bundled: Option<String>,
}

impl VapidKeyInputs {
    /// Read `VAPID_PUBLIC_KEY`, `VAPID_PRIVATE_KEY` and `VAPID_KEYS`.
    pub fn from_env() -> Self {
        Self {
            public_key: std::env::var("VAPID_PUBLIC_KEY").ok(),
            private_key: std::env::var("VAPID_PRIVATE_KEY").ok(),
            bundled: std::env::var("VAPID_KEYS").ok(),
        }
    }
}

/// Resolved signing identity. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VapidCredentials {
    pub public_key: String,
    pub private_key: String,
    /// `mailto:` or `https:` contact used as the VAPID `sub` claim.
    pub contact: String,
    pub source: KeySource,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundledKeys {
    public_key: Option<String>,
    private_key: Option<String>,
}

impl VapidCredentials {
    /// Apply the precedence rules to `inputs`.
    pub fn resolve(
        inputs: &VapidKeyInputs,
        contact: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let (source, public_key, private_key) =
            resolve_pair(inputs).ok_or(CredentialError::Missing)?;
        Ok(Self {
            public_key,
            private_key,
            contact: contact.into(),
            source,
        })
    }
}

fn resolve_pair(inputs: &VapidKeyInputs) -> Option<(KeySource, String, String)> {
    if let (Some(public), Some(private)) = (
        non_empty(inputs.public_key.as_deref()),
        non_empty(inputs.private_key.as_deref()),
    ) {
        return Some((KeySource::ExplicitPair, public, private));
    }

    let bundled = non_empty(inputs.bundled.as_deref())?;

    if let Ok(parsed) = serde_json::from_str::<BundledKeys>(&bundled) {
        if let (Some(public), Some(private)) = (
            non_empty(parsed.public_key.as_deref()),
            non_empty(parsed.private_key.as_deref()),
        ) {
            return Some((KeySource::BundledJson, public, private));
        }
    }

    let (public, private) = bundled.split_once(':')?;
    match (non_empty(Some(public)), non_empty(Some(private))) {
        (Some(public), Some(private)) => Some((KeySource::BundledColon, public, private)),
        _ => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(public: Option<&str>, private: Option<&str>, bundled: Option<&str>) -> VapidKeyInputs {
        VapidKeyInputs {
            public_key: public.map(String::from),
            private_key: private.map(String::from),
            bundled: bundled.map(String::from),
        }
    }

    #[test]
    fn explicit_pair_is_trimmed() {
        let creds =
            VapidCredentials::resolve(&inputs(Some("  pub "), Some("\tpriv\n"), None), DEFAULT_CONTACT)
                .unwrap();
        assert_eq!(creds.public_key, "pub");
        assert_eq!(creds.private_key, "priv");
        assert_eq!(creds.source, KeySource::ExplicitPair);
        assert_eq!(creds.contact, DEFAULT_CONTACT);
    }

    #[test]
    fn explicit_pair_wins_over_bundled() {
        let creds = VapidCredentials::resolve(
            &inputs(Some("pub"), Some("priv"), Some("other:keys")),
            DEFAULT_CONTACT,
        )
        .unwrap();
        assert_eq!(creds.source, KeySource::ExplicitPair);
        assert_eq!(creds.public_key, "pub");
    }

    #[test]
    fn whitespace_only_explicit_value_falls_through() {
        let creds = VapidCredentials::resolve(
            &inputs(Some("pub"), Some("   "), Some("a:b")),
            DEFAULT_CONTACT,
        )
        .unwrap();
        assert_eq!(creds.source, KeySource::BundledColon);
    }

    #[test]
    fn bundled_json() {
        let creds = VapidCredentials::resolve(
            &inputs(None, None, Some(r#"{"publicKey":" pk ","privateKey":"sk"}"#)),
            DEFAULT_CONTACT,
        )
        .unwrap();
        assert_eq!(creds.source, KeySource::BundledJson);
        assert_eq!(creds.public_key, "pk");
        assert_eq!(creds.private_key, "sk");
    }

    #[test]
    fn bundled_colon_splits_on_first_colon() {
        let creds =
            VapidCredentials::resolve(&inputs(None, None, Some(" pk : sk:extra ")), DEFAULT_CONTACT)
                .unwrap();
        assert_eq!(creds.source, KeySource::BundledColon);
        assert_eq!(creds.public_key, "pk");
        assert_eq!(creds.private_key, "sk:extra");
    }

    #[test]
    fn json_with_empty_field_falls_back_to_colon_parse() {
        let result = VapidCredentials::resolve(
            &inputs(None, None, Some(r#"{"publicKey":"pk","privateKey":""}"#)),
            DEFAULT_CONTACT,
        );
        // The fallback splits the raw JSON text; both halves are non-empty.
        let creds = result.unwrap();
        assert_eq!(creds.source, KeySource::BundledColon);
        assert_eq!(creds.public_key, "{\"publicKey\"");
    }

    #[test]
    fn missing_everything_is_an_error() {
        assert!(matches!(
            VapidCredentials::resolve(&VapidKeyInputs::default(), DEFAULT_CONTACT),
            Err(CredentialError::Missing)
        ));
    }

    #[test]
    fn bundled_without_separator_is_an_error() {
        assert!(VapidCredentials::resolve(&inputs(None, None, Some("justonekey")), DEFAULT_CONTACT)
            .is_err());
        assert!(VapidCredentials::resolve(&inputs(None, None, Some("pk:  ")), DEFAULT_CONTACT)
            .is_err());
    }

    #[test]
    fn key_source_display() {
        assert_eq!(KeySource::BundledJson.to_string(), "VAPID_KEYS (JSON)");
        assert_eq!(
            KeySource::BundledColon.to_string(),
            "VAPID_KEYS (public:private)"
        );
    }
}
