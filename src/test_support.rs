use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api;
use crate::core::{config::Settings, state::AppState};
use crate::resources::registry::ResourceRegistry;
use crate::services::storage::StorageService;

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    upload_root: Option<tempfile::TempDir>,
    _guard: OwnedMutexGuard<()>,
}

impl TestContext {
    pub(crate) fn upload_root(&self) -> Option<&std::path::Path> {
        self.upload_root.as_ref().map(|dir| dir.path())
    }
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    dotenvy::dotenv().ok();

    std::env::set_var("RESTGATE_ENV", "test");
    std::env::set_var("RESTGATE_STRICT_CONFIG", "0");
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::set_var("MAX_UPLOAD_SIZE_MB", "10");
    std::env::remove_var("UPLOAD_ENABLED");
    std::env::remove_var("UPLOAD_DIR");
    std::env::remove_var("BACKEND_CORS_ORIGINS");
    std::env::remove_var("ALLOWED_UPLOAD_EXTENSIONS");
}

pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let upload_root = tempfile::tempdir().expect("temp upload dir");
    std::env::set_var("UPLOAD_DIR", upload_root.path());

    let settings = Settings::load().expect("settings");
    let storage = StorageService::from_settings(&settings).await.expect("storage service");
    let registry = ResourceRegistry::with_default_resources();

    let state = AppState::new(settings, registry, storage);
    let app = api::router::router(state.clone());

    TestContext { state, app, upload_root: Some(upload_root), _guard: guard }
}

pub(crate) async fn setup_test_context_without_storage() -> TestContext {
    let guard = env_lock().await;
    set_test_env();
    std::env::set_var("UPLOAD_ENABLED", "0");

    let settings = Settings::load().expect("settings");
    let storage = StorageService::from_settings(&settings).await.expect("storage service");
    assert!(storage.is_none(), "storage should be disabled");
    let registry = ResourceRegistry::with_default_resources();

    let state = AppState::new(settings, registry, storage);
    let app = api::router::router(state.clone());

    TestContext { state, app, upload_root: None, _guard: guard }
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) fn raw_request(
    method: Method,
    uri: &str,
    content_type: &str,
    body: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .expect("request body")
}

pub(crate) async fn read_text(response: axum::response::Response<Body>) -> String {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
