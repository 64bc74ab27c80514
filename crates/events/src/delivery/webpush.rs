//! Web push delivery (RFC 8030) with VAPID authentication (RFC 8292).
//!
//! [`WebPushDelivery`] uses the `web-push` crate for aes128gcm payload
//! encryption (RFC 8291) and JWT signing, then sends the request itself via
//! a shared `reqwest::Client` for connection pooling.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pushwave_core::credentials::VapidCredentials;
use pushwave_core::subscription::Subscription;
use pushwave_core::vapid;
use web_push::{ContentEncoding, SubscriptionInfo, VapidSignatureBuilder, WebPushMessageBuilder};

use super::{PushError, PushSender};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the push service should hold an undelivered message (4 weeks).
const MESSAGE_TTL_SECS: u32 = 2_419_200;

/// Delivers encrypted payloads to browser push services.
pub struct WebPushDelivery {
    client: reqwest::Client,
    credentials: Arc<VapidCredentials>,
    key_usable: bool,
}

impl WebPushDelivery {
    /// Create a delivery channel signing with `credentials`.
    pub fn new(credentials: Arc<VapidCredentials>) -> Result<Self, PushError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let key_usable = vapid::is_valid_private_key(&credentials.private_key);
        Ok(Self {
            client,
            credentials,
            key_usable,
        })
    }

    fn build_message(
        &self,
        subscription: &Subscription,
        payload: &[u8],
    ) -> Result<web_push::WebPushMessage, PushError> {
        if !self.key_usable {
            return Err(PushError::InvalidPrivateKey);
        }

        let sub_info = SubscriptionInfo::new(
            &subscription.endpoint,
            &subscription.keys.p256dh,
            &subscription.keys.auth,
        );

        let mut sig_builder =
            VapidSignatureBuilder::from_base64(&self.credentials.private_key, &sub_info)?;
        sig_builder.add_claim("sub", self.credentials.contact.as_str());
        let signature = sig_builder.build()?;

        let mut builder = WebPushMessageBuilder::new(&sub_info);
        builder.set_payload(ContentEncoding::Aes128Gcm, payload);
        builder.set_vapid_signature(signature);
        builder.set_ttl(MESSAGE_TTL_SECS);

        Ok(builder.build()?)
    }
}

#[async_trait]
impl PushSender for WebPushDelivery {
    async fn send(&self, subscription: &Subscription, payload: &[u8]) -> Result<(), PushError> {
        let message = self.build_message(subscription, payload)?;

        let mut request = self
            .client
            .post(message.endpoint.to_string())
            .header("TTL", message.ttl.to_string());

        if let Some(urgency) = message.urgency {
            request = request.header("Urgency", urgency.to_string());
        }

        if let Some(topic) = message.topic {
            request = request.header("Topic", topic);
        }

        match message.payload {
            Some(push_payload) => {
                request = request
                    .header("Content-Encoding", push_payload.content_encoding.to_str())
                    .header("Content-Type", "application/octet-stream");

                for (key, value) in &push_payload.crypto_headers {
                    request = request.header(*key, value.as_str());
                }

                request = request.body(push_payload.content);
            }
            None => {
                request = request.header("Content-Length", "0");
            }
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        if matches!(status.as_u16(), 404 | 410) {
            tracing::info!(
                endpoint = %subscription.endpoint,
                status = status.as_u16(),
                "Push subscription is gone"
            );
        }

        Err(PushError::HttpStatus(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use pushwave_core::credentials::{KeySource, DEFAULT_CONTACT};
    use pushwave_core::vapid::VapidKeyPair;

    use super::*;

    const CLIENT_AUTH: &str = "AAAAAAAAAAAAAAAAAAAAAA";

    fn credentials(private_key: &str) -> Arc<VapidCredentials> {
        Arc::new(VapidCredentials {
            public_key: "unused".to_string(),
            private_key: private_key.to_string(),
            contact: DEFAULT_CONTACT.to_string(),
            source: KeySource::ExplicitPair,
        })
    }

    #[test]
    fn builds_signed_encrypted_message() {
        let server_keys = VapidKeyPair::generate();
        // Any valid uncompressed P-256 point works as the browser's key.
        let client_keys = VapidKeyPair::generate();
        let delivery = WebPushDelivery::new(credentials(&server_keys.private_key)).unwrap();
        let subscription = Subscription::new(
            "https://push.example.com/send/abc",
            client_keys.public_key,
            CLIENT_AUTH,
        );

        let message = delivery
            .build_message(&subscription, br#"{"title":"t"}"#)
            .unwrap();

        assert_eq!(message.ttl, MESSAGE_TTL_SECS);
        assert!(message.payload.is_some());
    }

    #[test]
    fn malformed_private_key_fails_without_signing() {
        let client_keys = VapidKeyPair::generate();
        let delivery = WebPushDelivery::new(credentials("bm90LWEta2V5")).unwrap();
        let subscription = Subscription::new(
            "https://push.example.com/send/abc",
            client_keys.public_key,
            CLIENT_AUTH,
        );

        let result = delivery.build_message(&subscription, b"{}");
        assert!(matches!(result, Err(PushError::InvalidPrivateKey)));
    }

    #[test]
    fn http_status_error_display() {
        assert_eq!(
            PushError::HttpStatus(410).to_string(),
            "Push service returned HTTP 410"
        );
    }
}
