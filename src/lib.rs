//! An in-memory, keyed record store with live observer subscriptions.
//!
//! Callers mutate records through [`Store`] and register observers for a
//! single record ([`Store::observe`]) or the full result set of a query
//! ([`Store::observe_all`]); every mutation updates the registered
//! observers synchronously. Persistence adapters ([`Persistency`]) receive
//! the same change batches and hydrate the store through [`Store::load`].

pub mod error;
pub mod manager;
pub mod observer;
pub mod persistency;
pub mod query;
pub mod record;
pub mod store;

pub use error::{PersistencyError, Result, StoreError};
pub use observer::Observer;
pub use persistency::Persistency;
pub use query::{Query, Selector};
pub use record::{Id, Record};
pub use store::Store;
