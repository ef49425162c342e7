use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::get,
    Router,
};
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::resources::Resource;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:resource_type", get(list_resources).post(create_resource))
        .route(
            "/:resource_type/id/:id",
            get(get_resource)
                .put(replace_resource)
                .patch(patch_resource)
                .delete(delete_resource),
        )
}

async fn list_resources(
    Path(resource_type): Path<String>,
    State(state): State<AppState>,
) -> Result<String, ApiError> {
    let handler = resolve(&state, &resource_type)?;
    record_dispatch(&resource_type, "get");
    Ok(handler.get(None).await?)
}

async fn get_resource(
    Path((resource_type, id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<String, ApiError> {
    let handler = resolve(&state, &resource_type)?;
    record_dispatch(&resource_type, "get");
    Ok(handler.get(Some(&id)).await?)
}

async fn create_resource(
    Path(resource_type): Path<String>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let handler = resolve(&state, &resource_type)?;
    let data = decode_body(&body)?;
    record_dispatch(&resource_type, "post");
    Ok(handler.post(data).await?)
}

async fn replace_resource(
    Path((resource_type, id)): Path<(String, String)>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let handler = resolve(&state, &resource_type)?;
    let data = decode_body(&body)?;
    record_dispatch(&resource_type, "put");
    Ok(handler.put(&id, data).await?)
}

async fn patch_resource(
    Path((resource_type, id)): Path<(String, String)>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let handler = resolve(&state, &resource_type)?;
    let data = decode_body(&body)?;
    record_dispatch(&resource_type, "patch");
    Ok(handler.patch(&id, data).await?)
}

async fn delete_resource(
    Path((resource_type, id)): Path<(String, String)>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let handler = resolve(&state, &resource_type)?;
    // Delete accepts an empty body; the payload is still forwarded when present.
    let data = decode_optional_body(&body)?;
    record_dispatch(&resource_type, "delete");
    Ok(handler.delete(&id, data).await?)
}

fn resolve(state: &AppState, resource_type: &str) -> Result<Arc<dyn Resource>, ApiError> {
    state
        .registry()
        .get(resource_type)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown resource type '{resource_type}'")))
}

fn decode_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Request body must be JSON".to_string()));
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::BadRequest(format!("Malformed JSON body: {err}")))
}

fn decode_optional_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::BadRequest(format!("Malformed JSON body: {err}")))
}

fn record_dispatch(resource_type: &str, method: &'static str) {
    metrics::counter!(
        "resource_requests_total",
        "resource" => resource_type.to_string(),
        "method" => method
    )
    .increment(1);
}
