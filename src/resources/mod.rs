pub(crate) mod memory;
pub(crate) mod registry;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ResourceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Internal(String),
}

/// Capability set every resource type exposes to the dispatcher. Each
/// operation returns the response payload as an opaque string; the HTTP
/// layer writes it verbatim.
#[async_trait]
pub(crate) trait Resource: Send + Sync {
    async fn get(&self, id: Option<&str>) -> Result<String, ResourceError>;
    async fn post(&self, data: Value) -> Result<String, ResourceError>;
    async fn put(&self, id: &str, data: Value) -> Result<String, ResourceError>;
    async fn patch(&self, id: &str, data: Value) -> Result<String, ResourceError>;
    async fn delete(&self, id: &str, data: Value) -> Result<String, ResourceError>;
}
