//! Persistence adapters — external durable load/save collaborators.
//!
//! The store consumes adapters purely through the [`Persistency`] contract;
//! how an adapter stores things is its own business. [`kv`] holds the
//! reference key/value adapter.

pub mod kv;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PersistencyError;
use crate::record::{Id, Record};

pub use kv::{KeyValueMedium, KvPersistency, MemoryMedium};

/// Durable load/save collaborator consumed by
/// [`Store`](crate::store::Store).
///
/// `load` is the only async operation; the store runs every adapter's load
/// concurrently and fails the whole hydration on the first error. The write
/// callbacks are fire-and-forget from the store's point of view — they are
/// not awaited or retried, and an error propagates straight out of the
/// mutating store method that triggered it.
#[async_trait]
pub trait Persistency<T: Record>: Send + Sync {
    /// Produce every previously saved record.
    async fn load(&self) -> Result<Vec<T>, PersistencyError>;

    /// Called with the records of a batch that were inserted under a new id.
    fn on_create(&self, records: &[Arc<T>]) -> Result<(), PersistencyError>;

    /// Called with the records of a batch that replaced an existing id.
    fn on_update(&self, records: &[Arc<T>]) -> Result<(), PersistencyError>;

    /// Called with the ids confirmed removed from the table.
    fn on_delete(&self, ids: &[Id]) -> Result<(), PersistencyError>;
}
