//! In-process routing store backed by `DashMap`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{RouteStore, StoreError};

#[derive(Debug, Clone)]
enum Value {
    List(Vec<String>),
    Set(BTreeSet<String>),
}

/// Thread-safe in-memory store with Redis-like list and set semantics.
///
/// Empty sets are removed, reads of missing keys return empty collections,
/// and using a key with the wrong operation family yields
/// [`StoreError::WrongType`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: DashMap<String, Value>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn wrong_type(key: &str) -> StoreError {
        StoreError::WrongType {
            key: key.to_string(),
        }
    }
}

#[async_trait]
impl RouteStore for MemoryStore {
    async fn list_range(&self, key: &str) -> Result<Vec<String>, StoreError> {
        match self.data.get(key).as_deref() {
            None => Ok(Vec::new()),
            Some(Value::List(items)) => Ok(items.clone()),
            Some(Value::Set(_)) => Err(Self::wrong_type(key)),
        }
    }

    async fn list_push(&self, key: &str, values: &[String]) -> Result<usize, StoreError> {
        let mut entry = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Value::List(Vec::new()));
        match entry.value_mut() {
            Value::List(items) => {
                items.extend(values.iter().cloned());
                Ok(items.len())
            }
            Value::Set(_) => Err(Self::wrong_type(key)),
        }
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        match self.data.get(key).as_deref() {
            None => Ok(Vec::new()),
            Some(Value::Set(members)) => Ok(members.iter().cloned().collect()),
            Some(Value::List(_)) => Err(Self::wrong_type(key)),
        }
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut entry = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Value::Set(BTreeSet::new()));
        match entry.value_mut() {
            Value::Set(members) => Ok(members.insert(member.to_string())),
            Value::List(_) => Err(Self::wrong_type(key)),
        }
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let removed = match self.data.get_mut(key) {
            None => return Ok(false),
            Some(mut entry) => match entry.value_mut() {
                Value::Set(members) => members.remove(member),
                Value::List(_) => return Err(Self::wrong_type(key)),
            },
        };
        self.data
            .remove_if(key, |_, v| matches!(v, Value::Set(members) if members.is_empty()));
        Ok(removed)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .data
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect())
    }

    async fn delete_keys(&self, keys: &[String]) -> Result<usize, StoreError> {
        Ok(keys
            .iter()
            .filter(|key| self.data.remove(key.as_str()).is_some())
            .count())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
