//! Push delivery and broadcast dispatch.
//!
//! - [`delivery`]: the [`PushSender`] seam and its web push implementation.
//! - [`broadcast`]: [`BroadcastDispatcher`], the multi-wave fan-out engine.

pub mod broadcast;
pub mod delivery;

pub use broadcast::{BroadcastDispatcher, BroadcastReport, DispatchError};
pub use delivery::webpush::WebPushDelivery;
pub use delivery::{PushError, PushSender};
