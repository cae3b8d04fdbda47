//! In-memory resource store for testing and development.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use arbor_types::StoreResult;

use crate::ResourceStore;

#[derive(Default)]
struct MemoryData {
    hashes: HashMap<String, Map<String, Value>>,
    sets: HashMap<String, HashSet<String>>,
}

/// In-memory [`ResourceStore`] implementation.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members of the set named `set`, sorted. Test helper.
    pub async fn set_members(&self, set: &str) -> Vec<String> {
        let data = self.data.read().await;
        let mut members: Vec<String> =
            data.sets.get(set).map(|s| s.iter().cloned().collect()).unwrap_or_default();
        members.sort();
        members
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let data = self.data.read().await;
        Ok(data.hashes.contains_key(key))
    }

    async fn read_hash(&self, key: &str) -> StoreResult<Map<String, Value>> {
        let data = self.data.read().await;
        Ok(data.hashes.get(key).cloned().unwrap_or_default())
    }

    async fn write_hash_fields(&self, key: &str, fields: Map<String, Value>) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let hash = data.hashes.entry(key.to_string()).or_default();
        for (field, value) in fields {
            hash.insert(field, value);
        }
        Ok(())
    }

    async fn add_to_set(&self, set: &str, member: &str) -> StoreResult<()> {
        let mut data = self.data.write().await;
        data.sets.entry(set.to_string()).or_default().insert(member.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut data = self.data.write().await;
        data.hashes.remove(key);
        Ok(())
    }
}
