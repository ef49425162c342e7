use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::core::time::now_rfc3339;
use crate::resources::{Resource, ResourceError};

/// Process-local document collection keyed by a generated id. Every stored
/// document is a JSON object carrying `id`, `created_at` and `updated_at`
/// alongside whatever fields the client sent.
pub(crate) struct MemoryCollection {
    name: String,
    documents: RwLock<BTreeMap<String, Value>>,
}

impl MemoryCollection {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), documents: RwLock::new(BTreeMap::new()) }
    }

    fn missing(&self, id: &str) -> ResourceError {
        ResourceError::NotFound(format!("No {} with id '{id}'", self.name))
    }

    fn read_documents(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, Value>> {
        self.documents.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_documents(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, Value>> {
        self.documents.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn render(value: &Value) -> Result<String, ResourceError> {
    serde_json::to_string(value)
        .map_err(|err| ResourceError::Internal(format!("Failed to serialize document: {err}")))
}

fn object_fields(data: Value) -> Result<Map<String, Value>, ResourceError> {
    match data {
        Value::Object(fields) => Ok(fields),
        _ => Err(ResourceError::Invalid("Request body must be a JSON object".to_string())),
    }
}

#[async_trait]
impl Resource for MemoryCollection {
    async fn get(&self, id: Option<&str>) -> Result<String, ResourceError> {
        let documents = self.read_documents();
        match id {
            Some(id) => {
                let document = documents.get(id).ok_or_else(|| self.missing(id))?;
                render(document)
            }
            None => {
                let all: Vec<&Value> = documents.values().collect();
                render(&json!(all))
            }
        }
    }

    async fn post(&self, data: Value) -> Result<String, ResourceError> {
        let mut fields = object_fields(data)?;
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();
        fields.insert("id".to_string(), Value::String(id.clone()));
        fields.insert("created_at".to_string(), Value::String(now.clone()));
        fields.insert("updated_at".to_string(), Value::String(now));

        let document = Value::Object(fields);
        let payload = render(&document)?;
        self.write_documents().insert(id, document);
        Ok(payload)
    }

    async fn put(&self, id: &str, data: Value) -> Result<String, ResourceError> {
        let mut fields = object_fields(data)?;
        let mut documents = self.write_documents();
        let existing = documents.get(id).ok_or_else(|| self.missing(id))?;

        // Full replacement: only identity and creation time survive.
        let created_at = existing.get("created_at").cloned();
        fields.insert("id".to_string(), Value::String(id.to_string()));
        if let Some(created_at) = created_at {
            fields.insert("created_at".to_string(), created_at);
        }
        fields.insert("updated_at".to_string(), Value::String(now_rfc3339()));

        let document = Value::Object(fields);
        let payload = render(&document)?;
        documents.insert(id.to_string(), document);
        Ok(payload)
    }

    async fn patch(&self, id: &str, data: Value) -> Result<String, ResourceError> {
        let fields = object_fields(data)?;
        let mut documents = self.write_documents();
        let document = documents.get_mut(id).ok_or_else(|| self.missing(id))?;

        let Some(target) = document.as_object_mut() else {
            return Err(ResourceError::Internal(format!("Stored {} is not an object", self.name)));
        };
        for (key, value) in fields {
            if key == "id" || key == "created_at" {
                continue;
            }
            target.insert(key, value);
        }
        target.insert("updated_at".to_string(), Value::String(now_rfc3339()));

        render(document)
    }

    async fn delete(&self, id: &str, _data: Value) -> Result<String, ResourceError> {
        if self.write_documents().remove(id).is_none() {
            return Err(self.missing(id));
        }
        render(&json!({ "id": id, "deleted": true }))
    }
}
