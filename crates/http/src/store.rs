//! In-memory collections, one per resource namespace, newest record first.

use std::collections::HashMap;

use chrono::Utc;
use leadsync_core::{Page, PageRequest, Pagination, ResourceName};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct ResourceStore {
    collections: RwLock<HashMap<ResourceName, Vec<Value>>>,
}

fn as_object(namespace: ResourceName, payload: Value) -> Result<Map<String, Value>, StoreError> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::Validation(format!("{namespace} payload must be a JSON object"))),
    }
}

fn check_display_field(
    namespace: ResourceName,
    map: &Map<String, Value>,
    required: bool,
) -> Result<(), StoreError> {
    let field = namespace.display_field();
    match map.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(()),
        None if !required => Ok(()),
        _ => Err(StoreError::Validation(format!("{field} is required"))),
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

impl ResourceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a collection wholesale. Records without an `id` get one.
    pub async fn seed(&self, namespace: ResourceName, records: Vec<Value>) {
        let records = records
            .into_iter()
            .map(|mut record| {
                if let Value::Object(map) = &mut record {
                    map.entry("id")
                        .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
                }
                record
            })
            .collect();
        self.collections.write().await.insert(namespace, records);
    }

    pub async fn count(&self, namespace: ResourceName) -> usize {
        self.collections.read().await.get(&namespace).map_or(0, Vec::len)
    }

    /// One page in stored order. A page past the end is empty but valid.
    pub async fn list(&self, namespace: ResourceName, request: PageRequest) -> Page<Value> {
        let collections = self.collections.read().await;
        let records = collections.get(&namespace).map_or(&[][..], Vec::as_slice);
        let items = records
            .iter()
            .skip(request.offset())
            .take(request.limit() as usize)
            .cloned()
            .collect();
        Page { items, pagination: Pagination::compute(records.len() as u64, request) }
    }

    pub async fn create(
        &self,
        namespace: ResourceName,
        payload: Value,
    ) -> Result<Value, StoreError> {
        let mut map = as_object(namespace, payload)?;
        check_display_field(namespace, &map, true)?;
        let now = Value::String(Utc::now().to_rfc3339());
        map.insert("id".to_owned(), Value::String(uuid::Uuid::new_v4().to_string()));
        map.insert("createdAt".to_owned(), now.clone());
        map.insert("updatedAt".to_owned(), now);
        let record = Value::Object(map);

        self.collections.write().await.entry(namespace).or_default().insert(0, record.clone());
        tracing::debug!(resource = %namespace, id = record_id(&record), "record created");
        Ok(record)
    }

    /// Merges `patch` into the record. `id` and `createdAt` cannot be changed.
    pub async fn update(
        &self,
        namespace: ResourceName,
        id: &str,
        patch: Value,
    ) -> Result<Value, StoreError> {
        let mut patch = as_object(namespace, patch)?;
        patch.remove("id");
        patch.remove("createdAt");
        check_display_field(namespace, &patch, false)?;

        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(&namespace)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| StoreError::NotFound { resource: namespace, id: id.to_owned() })?;
        if let Value::Object(map) = &mut *record {
            map.extend(patch);
            map.insert("updatedAt".to_owned(), Value::String(Utc::now().to_rfc3339()));
        }
        Ok(record.clone())
    }

    pub async fn delete(&self, namespace: ResourceName, id: &str) -> Result<Value, StoreError> {
        let mut collections = self.collections.write().await;
        let records = collections.get_mut(&namespace);
        let position = records
            .as_ref()
            .and_then(|records| records.iter().position(|r| record_id(r) == Some(id)));
        match (records, position) {
            (Some(records), Some(pos)) => Ok(records.remove(pos)),
            _ => Err(StoreError::NotFound { resource: namespace, id: id.to_owned() }),
        }
    }
}
