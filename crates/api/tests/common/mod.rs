#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use pushwave_core::broadcast::BroadcastLimits;
use pushwave_core::credentials::{KeySource, VapidCredentials};
use pushwave_core::subscription::Subscription;
use pushwave_db::SubscriptionStore;
use pushwave_events::{BroadcastDispatcher, PushError, PushSender};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use pushwave_api::config::{PushConfig, ServerConfig};
use pushwave_api::router::build_app_router;
use pushwave_api::state::AppState;

pub const TEST_PUBLIC_KEY: &str = "test-public-key";

/// Build a test `ServerConfig` with safe defaults and the registry at `path`.
pub fn test_config(path: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        subscriptions_path: path.to_path_buf(),
        push: PushConfig {
            contact: "mailto:test@example.com".to_string(),
            limits: BroadcastLimits::default(),
            log_vapid_keys: false,
        },
    }
}

/// Push sender that records attempts instead of contacting a push service.
#[derive(Default)]
pub struct CountingSender {
    pub attempts: AtomicUsize,
    pub fail_all: bool,
}

impl CountingSender {
    pub fn failing() -> Self {
        Self {
            attempts: AtomicUsize::new(0),
            fail_all: true,
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PushSender for CountingSender {
    async fn send(&self, _subscription: &Subscription, _payload: &[u8]) -> Result<(), PushError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_all {
            Err(PushError::HttpStatus(410))
        } else {
            Ok(())
        }
    }
}

/// A running application plus the handles tests inspect.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<SubscriptionStore>,
    pub sender: Arc<CountingSender>,
    /// Root shutdown token handed to the router state.
    pub shutdown: CancellationToken,
    // Keeps the registry directory alive for the duration of the test.
    _dir: TempDir,
}

/// Build the full application router over a fresh temporary registry.
///
/// Uses the same `build_app_router` as `main.rs` so tests exercise the
/// production middleware stack.
pub fn build_test_app() -> TestApp {
    build_test_app_with(CountingSender::default())
}

pub fn build_test_app_with(sender: CountingSender) -> TestApp {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir.path().join("subscriptions.json"));

    let store = Arc::new(SubscriptionStore::new(config.subscriptions_path.clone()));
    let sender = Arc::new(sender);
    let dispatcher = Arc::new(BroadcastDispatcher::new(
        Arc::clone(&store),
        Arc::clone(&sender) as Arc<dyn PushSender>,
        config.push.limits,
    ));

    let credentials = Arc::new(VapidCredentials {
        public_key: TEST_PUBLIC_KEY.to_string(),
        private_key: "test-private-key".to_string(),
        contact: config.push.contact.clone(),
        source: KeySource::ExplicitPair,
    });

    let shutdown = CancellationToken::new();
    let state = AppState {
        config: Arc::new(config.clone()),
        credentials,
        store: Arc::clone(&store),
        dispatcher,
        shutdown: shutdown.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        sender,
        shutdown,
        _dir: dir,
    }
}

/// A browser-shaped subscription body.
pub fn subscription_json(endpoint: &str) -> serde_json::Value {
    serde_json::json!({
        "endpoint": endpoint,
        "expirationTime": null,
        "keys": { "p256dh": "BPkey", "auth": "authsecret" }
    })
}

pub async fn get(app: Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_raw(app: Router, path: &str, body: &'static str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
