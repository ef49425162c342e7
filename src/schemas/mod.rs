use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) version: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}
