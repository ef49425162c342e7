use std::collections::BTreeMap;
use std::sync::Arc;

use crate::resources::memory::MemoryCollection;
use crate::resources::Resource;

/// Maps a resource-type name from the URL to its handler. The registry is
/// built once at startup and is the only place the dynamic segment is
/// resolved; unknown names fail closed.
#[derive(Clone, Default)]
pub(crate) struct ResourceRegistry {
    handlers: BTreeMap<String, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_default_resources() -> Self {
        let mut registry = Self::new();
        registry.register("employees", Arc::new(MemoryCollection::new("employees")));
        registry.register("products", Arc::new(MemoryCollection::new("products")));
        registry
    }

    pub(crate) fn register(&mut self, name: impl Into<String>, handler: Arc<dyn Resource>) {
        self.handlers.insert(name.into(), handler);
    }

    pub(crate) fn get(&self, name: &str) -> Option<Arc<dyn Resource>> {
        self.handlers.get(name).cloned()
    }

    pub(crate) fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resources_are_registered() {
        let registry = ResourceRegistry::with_default_resources();
        assert_eq!(registry.names(), vec!["employees", "products"]);
        assert!(registry.get("employees").is_some());
        assert!(registry.get("products").is_some());
    }

    #[test]
    fn unknown_name_fails_closed() {
        let registry = ResourceRegistry::with_default_resources();
        assert!(registry.get("widgets").is_none());
        assert!(registry.get("Employees").is_none());
    }
}
