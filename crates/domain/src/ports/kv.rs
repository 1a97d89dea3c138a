use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::BoxFuture;
use crate::DomainResult;

/// Single-key blob storage. Every logical collection serializes to one
/// string value under one key; there is no partial update below this
/// interface.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> BoxFuture<'_, DomainResult<Option<String>>>;

    fn set(&self, key: &str, value: String) -> BoxFuture<'_, DomainResult<()>>;

    fn remove(&self, key: &str) -> BoxFuture<'_, DomainResult<()>>;
}

#[derive(Default)]
pub struct InMemoryKvStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKvStore {
    fn get(&self, key: &str) -> BoxFuture<'_, DomainResult<Option<String>>> {
        let key = key.to_string();
        let entries = self.entries.clone();
        Box::pin(async move { Ok(entries.read().await.get(&key).cloned()) })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'_, DomainResult<()>> {
        let key = key.to_string();
        let entries = self.entries.clone();
        Box::pin(async move {
            entries.write().await.insert(key, value);
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, DomainResult<()>> {
        let key = key.to_string();
        let entries = self.entries.clone();
        Box::pin(async move {
            entries.write().await.remove(&key);
            Ok(())
        })
    }
}
