//! In-memory implementation of DataService for testing and development

use crate::config::ListingConfig;
use crate::core::{Data, DataService, FieldValue};
use crate::list::processor::{ListProcessor, ListRequest, ListResult};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory data service implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access
/// and keeps entities in insertion order, which is the order
/// [`list`](DataService::list) returns and the input order the list engine
/// keeps for ties.
///
/// [`list_page`](DataService::list_page) clones a snapshot under the read
/// lock and runs the engine after releasing it.
#[derive(Clone)]
pub struct InMemoryDataService<T: Data> {
    entities: Arc<RwLock<IndexMap<Uuid, T>>>,
    processor: Arc<ListProcessor>,
}

impl<T: Data> InMemoryDataService<T> {
    /// Create a new in-memory data service with default list settings
    pub fn new() -> Self {
        Self::with_processor(ListProcessor::new())
    }

    /// Create a service whose list pages run through `processor`
    pub fn with_processor(processor: ListProcessor) -> Self {
        Self {
            entities: Arc::new(RwLock::new(IndexMap::new())),
            processor: Arc::new(processor),
        }
    }

    /// Create a service using the configuration for `T`'s entity type
    pub fn with_config(config: &ListingConfig) -> Self {
        Self::with_processor(config.processor_for(T::type_name()))
    }

    /// Number of stored entities
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, IndexMap<Uuid, T>>> {
        self.entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, IndexMap<Uuid, T>>> {
        self.entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))
    }

    fn snapshot(&self) -> Result<Vec<T>> {
        Ok(self.read()?.values().cloned().collect())
    }
}

impl<T: Data> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// String form of a field value as used by exact-match search
fn matches_text(value: &FieldValue, expected: &str) -> bool {
    match value {
        FieldValue::String(s) => s == expected,
        FieldValue::Integer(i) => i.to_string() == expected,
        FieldValue::Float(f) => f.to_string() == expected,
        FieldValue::Boolean(b) => b.to_string() == expected,
        FieldValue::Uuid(u) => u.to_string() == expected,
        FieldValue::DateTime(dt) => dt.to_rfc3339() == expected,
        FieldValue::Null => false,
    }
}

#[async_trait]
impl<T: Data> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut entities = self.write()?;
        entities.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        self.snapshot()
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let mut entities = self.write()?;
        let slot = entities
            .get_mut(id)
            .ok_or_else(|| anyhow!("Entity not found: {}", id))?;
        *slot = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        // shift_remove keeps the remaining entities in insertion order
        self.write()?.shift_remove(id);
        Ok(())
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let entities = self.read()?;
        Ok(entities
            .values()
            .filter(|entity| {
                entity
                    .field_value(field)
                    .is_some_and(|fv| matches_text(&fv, value))
            })
            .cloned()
            .collect())
    }

    async fn list_page(&self, request: &ListRequest) -> Result<ListResult<T>> {
        let records = self.snapshot()?;
        tracing::debug!(
            entity = T::type_name(),
            records = records.len(),
            "listing page from in-memory snapshot"
        );
        Ok(self.processor.process_request(&records, request)?)
    }
}
