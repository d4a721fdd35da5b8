//! Observer<T> — a reactive single-value cell with synchronous subscribers.
//!
//! # Emission model
//!
//! Callbacks are stored as `Arc<dyn Fn(&T)>` so emission snapshots are cheap.
//! `set` snapshots the callback list under the lock and releases the lock
//! before calling anything, which means:
//!   - A callback unbound *during* emission is still called in that round.
//!   - A callback bound *during* emission is NOT called until the next `set`.
//!   - Callbacks can freely call `bind`/`unbind`/`set` without deadlocking.
//!
//! # Destruction
//!
//! `destroy()` is terminal: the subscriber list is cleared, the value is
//! frozen, and `set`/`bind`/`unbind` become no-ops. A derived observer
//! (from [`Observer::map`] or [`Observer::filter`]) counts as destroyed as
//! soon as either it or any source up its chain is destroyed; the check is
//! computed on every read, never cached.
//!
//! # Modules
//!
//! - [`array`] — combinators over `Observer<Vec<T>>`.

pub mod array;

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Identifier for a bound callback, returned by [`Observer::bind`] and
/// accepted by [`Observer::unbind`].
pub type BindingId = u64;

/// Closure type for subscriber callbacks.
pub type Callback<T> = dyn Fn(&T) + Send + Sync;

struct CellState<T> {
    value: T,
    callbacks: Vec<(BindingId, Arc<Callback<T>>)>,
    destroyed: bool,
    next_id: BindingId,
}

/// A reactive single-value cell.
///
/// Cloning an `Observer` yields another handle to the same cell, so the
/// store, its managers, and callers can all hold the observer they share.
pub struct Observer<T> {
    state: Arc<Mutex<CellState<T>>>,
    /// Destruction probe of the source chain, present on derived observers.
    source_destroyed: Option<Arc<dyn Fn() -> bool + Send + Sync>>,
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            source_destroyed: self.source_destroyed.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Observer<T> {
    /// Create a primitive observer holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(CellState {
                value: initial,
                callbacks: Vec::new(),
                destroyed: false,
                next_id: 1,
            })),
            source_destroyed: None,
        }
    }

    fn derived(initial: T, source_destroyed: Arc<dyn Fn() -> bool + Send + Sync>) -> Self {
        let mut observer = Self::new(initial);
        observer.source_destroyed = Some(source_destroyed);
        observer
    }

    /// The current value. Always defined; equals the last `set` value, or
    /// the construction value before the first `set`.
    pub fn value(&self) -> T {
        self.state.lock().value.clone()
    }

    /// Whether this observer, or any source up its derivation chain, has
    /// been destroyed.
    pub fn destroyed(&self) -> bool {
        let own = self.state.lock().destroyed;
        own || self.source_destroyed.as_ref().is_some_and(|probe| probe())
    }

    /// Replace the value and synchronously invoke every currently bound
    /// callback with it. No-op once destroyed.
    pub fn set(&self, value: T) {
        let snapshot: Vec<Arc<Callback<T>>> = {
            let mut state = self.state.lock();
            if state.destroyed {
                return;
            }
            state.value = value.clone();
            state.callbacks.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        // Lock released — callbacks may re-enter this observer.
        for callback in snapshot {
            callback(&value);
        }
    }

    /// Register `callback` and return its [`BindingId`].
    ///
    /// No-op once destroyed: the returned id is inert.
    pub fn bind(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> BindingId {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        if !state.destroyed {
            state.callbacks.push((id, Arc::new(callback)));
        }
        id
    }

    /// Remove the callback identified by `id`. Safe to call repeatedly;
    /// no-op once destroyed.
    pub fn unbind(&self, id: BindingId) {
        let mut state = self.state.lock();
        if state.destroyed {
            return;
        }
        state.callbacks.retain(|(bound, _)| *bound != id);
    }

    /// Permanently silence this observer: drop all subscribers, freeze the
    /// value. Idempotent.
    pub fn destroy(&self) {
        let mut state = self.state.lock();
        state.callbacks.clear();
        state.destroyed = true;
    }

    /// Derived observer whose value is `f(source_value)`, recomputed and
    /// re-emitted on every source emission.
    pub fn map<U, F>(&self, f: F) -> Observer<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let derived = Observer::derived(f(&self.value()), self.destroyed_probe());
        let target = derived.clone();
        self.bind(move |value| target.set(f(value)));
        derived
    }

    /// Derived observer that adopts source values passing `keep`.
    ///
    /// Seeded with the current source value if it passes, else `None`. A
    /// later source value that fails `keep` is simply not adopted: the
    /// derived observer keeps its previous value rather than resetting to
    /// `None`. Only matching source changes re-emit.
    pub fn filter<F>(&self, keep: F) -> Observer<Option<T>>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let current = self.value();
        let initial = keep(&current).then_some(current);
        let derived = Observer::derived(initial, self.destroyed_probe());
        let target = derived.clone();
        self.bind(move |value| {
            if keep(value) {
                target.set(Some(value.clone()));
            }
        });
        derived
    }

    /// A closure answering "is this observer destroyed?", handed to derived
    /// observers. Holds the cell weakly: the source already owns the
    /// propagation callback that keeps the derived cell alive, so a strong
    /// reference here would form a cycle. A dropped source cell can never
    /// emit again and reports as destroyed.
    fn destroyed_probe(&self) -> Arc<dyn Fn() -> bool + Send + Sync> {
        let state: Weak<Mutex<CellState<T>>> = Arc::downgrade(&self.state);
        let parent = self.source_destroyed.clone();
        Arc::new(move || {
            let own = match state.upgrade() {
                Some(cell) => cell.lock().destroyed,
                None => true,
            };
            own || parent.as_ref().is_some_and(|probe| probe())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_tracks_last_set() {
        let observer = Observer::new(1);
        assert_eq!(observer.value(), 1);
        observer.set(2);
        assert_eq!(observer.value(), 2);
    }

    #[test]
    fn clone_is_a_handle_to_the_same_cell() {
        let a = Observer::new(0);
        let b = a.clone();
        a.set(9);
        assert_eq!(b.value(), 9);
        b.destroy();
        assert!(a.destroyed());
    }

    #[test]
    fn set_after_destroy_is_a_frozen_no_op() {
        let observer = Observer::new(1);
        observer.destroy();
        observer.destroy(); // idempotent
        observer.set(2);
        assert_eq!(observer.value(), 1);
    }
}
