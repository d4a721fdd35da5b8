//! Key/value persistence — one record per key under a namespace.
//!
//! [`KvPersistency`] stores each record at the composite key
//! `"<namespace>$$<id>"`, value = the record's JSON text. The flat
//! [`KeyValueMedium`] it writes through is injected at construction, never
//! reached as ambient global state, so adapters stay testable against the
//! in-memory [`MemoryMedium`].

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PersistencyError;
use crate::record::{Id, Record};

use super::Persistency;

/// Separator between namespace and id in composite keys.
const KEY_SEPARATOR: &str = "$$";

// ============================================================================
// KeyValueMedium
// ============================================================================

/// A flat string key/value medium.
///
/// Implementations back [`KvPersistency`] with whatever durable storage the
/// host has; every operation may fail with a
/// [`PersistencyError::Medium`](crate::error::PersistencyError).
pub trait KeyValueMedium: Send + Sync {
    /// Every key currently present, in no particular order.
    fn keys(&self) -> Result<Vec<String>, PersistencyError>;

    fn get(&self, key: &str) -> Result<Option<String>, PersistencyError>;

    fn set(&self, key: &str, value: &str) -> Result<(), PersistencyError>;

    fn remove(&self, key: &str) -> Result<(), PersistencyError>;
}

impl<M: KeyValueMedium + ?Sized> KeyValueMedium for Arc<M> {
    fn keys(&self) -> Result<Vec<String>, PersistencyError> {
        (**self).keys()
    }

    fn get(&self, key: &str) -> Result<Option<String>, PersistencyError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistencyError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PersistencyError> {
        (**self).remove(key)
    }
}

// ============================================================================
// MemoryMedium
// ============================================================================

/// An in-memory [`KeyValueMedium`]. Never fails.
#[derive(Default)]
pub struct MemoryMedium {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueMedium for MemoryMedium {
    fn keys(&self) -> Result<Vec<String>, PersistencyError> {
        Ok(self.entries.lock().keys().cloned().collect())
    }

    fn get(&self, key: &str) -> Result<Option<String>, PersistencyError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistencyError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistencyError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// KvPersistency
// ============================================================================

/// Reference [`Persistency`] adapter over a [`KeyValueMedium`].
pub struct KvPersistency<T, M> {
    medium: M,
    namespace: String,
    _record: PhantomData<fn() -> T>,
}

impl<T, M: KeyValueMedium> KvPersistency<T, M> {
    /// Create an adapter writing through `medium` under `namespace`.
    pub fn new(medium: M, namespace: impl Into<String>) -> Self {
        Self {
            medium,
            namespace: namespace.into(),
            _record: PhantomData,
        }
    }

    fn prefix(&self) -> String {
        format!("{}{KEY_SEPARATOR}", self.namespace)
    }

    fn key_for(&self, id: &Id) -> String {
        format!("{}{KEY_SEPARATOR}{id}", self.namespace)
    }
}

impl<T, M> KvPersistency<T, M>
where
    T: Record + Serialize,
    M: KeyValueMedium,
{
    fn save(&self, records: &[Arc<T>]) -> Result<(), PersistencyError> {
        for record in records {
            let key = self.key_for(&record.id());
            let encoded = serde_json::to_string(record.as_ref())
                .map_err(|source| PersistencyError::Encode {
                    key: key.clone(),
                    source,
                })?;
            self.medium.set(&key, &encoded)?;
        }
        Ok(())
    }
}

#[async_trait]
impl<T, M> Persistency<T> for KvPersistency<T, M>
where
    T: Record + Serialize + DeserializeOwned,
    M: KeyValueMedium,
{
    /// Scan the whole key space, keep keys under this adapter's namespace,
    /// and decode each value. A single undecodable entry is logged and
    /// skipped; it does not fail the load.
    async fn load(&self) -> Result<Vec<T>, PersistencyError> {
        let prefix = self.prefix();
        let mut records = Vec::new();

        for key in self.medium.keys()? {
            if !key.starts_with(&prefix) {
                continue;
            }
            let Some(raw) = self.medium.get(&key)? else {
                continue;
            };
            match serde_json::from_str::<T>(&raw) {
                Ok(record) => records.push(record),
                Err(source) => {
                    let error = PersistencyError::Decode {
                        key: key.clone(),
                        source,
                    };
                    tracing::warn!(%key, %error, "skipping undecodable record");
                }
            }
        }

        Ok(records)
    }

    fn on_create(&self, records: &[Arc<T>]) -> Result<(), PersistencyError> {
        self.save(records)
    }

    fn on_update(&self, records: &[Arc<T>]) -> Result<(), PersistencyError> {
        self.save(records)
    }

    fn on_delete(&self, ids: &[Id]) -> Result<(), PersistencyError> {
        for id in ids {
            self.medium.remove(&self.key_for(id))?;
        }
        Ok(())
    }
}
