//! Browser push subscription types.
//!
//! The wire shape is what `PushSubscription.toJSON()` produces in the browser:
//!
//! ```json
//! { "endpoint": "https://...", "expirationTime": null,
//!   "keys": { "p256dh": "...", "auth": "..." } }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Encryption keys issued by the browser alongside the push endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    /// Client P-256 ECDH public key (base64url).
    pub p256dh: String,
    /// Client authentication secret (base64url).
    pub auth: String,
}

/// A registered push subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Push service endpoint URL.
    pub endpoint: String,
    /// Browser-reported expiry, stored as received. Not part of identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<serde_json::Value>,
    pub keys: SubscriptionKeys,
}

/// Identity of a subscription: the exact `(endpoint, p256dh, auth)` triple.
///
/// Two subscriptions are the same entity iff all three fields are
/// byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionIdentity<'a> {
    pub endpoint: &'a str,
    pub p256dh: &'a str,
    pub auth: &'a str,
}

impl Subscription {
    pub fn new(
        endpoint: impl Into<String>,
        p256dh: impl Into<String>,
        auth: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            expiration_time: None,
            keys: SubscriptionKeys {
                p256dh: p256dh.into(),
                auth: auth.into(),
            },
        }
    }

    pub fn identity(&self) -> SubscriptionIdentity<'_> {
        SubscriptionIdentity {
            endpoint: &self.endpoint,
            p256dh: &self.keys.p256dh,
            auth: &self.keys.auth,
        }
    }

    /// Check that the endpoint and both keys are present and non-empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        let missing: Vec<&str> = [
            ("endpoint", self.endpoint.as_str()),
            ("keys.p256dh", self.keys.p256dh.as_str()),
            ("keys.auth", self.keys.auth.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidSubscription(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }
}

/// Loosely-typed subscription as it arrives over HTTP.
///
/// Every field is optional so a payload with missing keys reaches
/// [`SubscriptionPayload::into_subscription`] and is rejected as an invalid
/// subscription rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPayload {
    pub endpoint: Option<String>,
    pub expiration_time: Option<serde_json::Value>,
    pub keys: Option<SubscriptionKeysPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionKeysPayload {
    pub p256dh: Option<String>,
    pub auth: Option<String>,
}

impl SubscriptionPayload {
    /// Convert into a validated [`Subscription`].
    pub fn into_subscription(self) -> Result<Subscription, CoreError> {
        let keys = self.keys.unwrap_or_default();
        let subscription = Subscription {
            endpoint: self.endpoint.unwrap_or_default(),
            expiration_time: self.expiration_time.filter(|v| !v.is_null()),
            keys: SubscriptionKeys {
                p256dh: keys.p256dh.unwrap_or_default(),
                auth: keys.auth.unwrap_or_default(),
            },
        };
        subscription.validate()?;
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_requires_all_three_fields() {
        let a = Subscription::new("https://push.example/1", "p", "a");
        let same = Subscription::new("https://push.example/1", "p", "a");
        let other_auth = Subscription::new("https://push.example/1", "p", "b");

        assert_eq!(a.identity(), same.identity());
        assert_ne!(a.identity(), other_auth.identity());
    }

    #[test]
    fn identity_ignores_expiration_time() {
        let mut a = Subscription::new("https://push.example/1", "p", "a");
        let b = a.clone();
        a.expiration_time = Some(serde_json::json!(1_700_000_000_000_u64));
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn identity_does_not_collide_on_concatenation() {
        let a = Subscription::new("https://push.example/1p", "", "a");
        let b = Subscription::new("https://push.example/1", "p", "a");
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn validate_lists_missing_fields() {
        let err = Subscription::new("", "p", "").validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("endpoint"));
        assert!(msg.contains("keys.auth"));
        assert!(!msg.contains("p256dh"));
    }

    #[test]
    fn payload_without_keys_is_rejected() {
        let payload: SubscriptionPayload =
            serde_json::from_str(r#"{"endpoint":"https://push.example/1"}"#).unwrap();
        assert!(matches!(
            payload.into_subscription(),
            Err(CoreError::InvalidSubscription(_))
        ));
    }

    #[test]
    fn payload_from_browser_json() {
        let payload: SubscriptionPayload = serde_json::from_str(
            r#"{"endpoint":"https://push.example/1","expirationTime":null,
                "keys":{"p256dh":"BNc","auth":"tBH"}}"#,
        )
        .unwrap();
        let sub = payload.into_subscription().unwrap();
        assert_eq!(sub.endpoint, "https://push.example/1");
        assert_eq!(sub.keys.p256dh, "BNc");
        assert!(sub.expiration_time.is_none());
    }

    #[test]
    fn serializes_with_camel_case_and_nested_keys() {
        let mut sub = Subscription::new("https://push.example/1", "p", "a");
        sub.expiration_time = Some(serde_json::json!(42));
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["expirationTime"], 42);
        assert_eq!(json["keys"]["p256dh"], "p");
        assert_eq!(json["keys"]["auth"], "a");
    }
}
