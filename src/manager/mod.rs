//! Notification routing from the store to registered observers.
//!
//! - [`point`] — [`ObserverManager<T>`], observers of a single record.
//! - [`all`] — [`ObserverAllManager<T>`], observers of full result sets.
//!
//! Destroyed observers are never unregistered eagerly; each notification
//! pass prunes them lazily via [`retain_live`].

pub mod all;
pub mod point;

pub use all::ObserverAllManager;
pub use point::ObserverManager;

/// Single forward pass over `entries` that shift-removes destroyed ones in
/// place and visits the live ones.
///
/// After a removal the index is not advanced, so the entry shifted into the
/// freed slot is still examined. Registration order is preserved.
pub(crate) fn retain_live<E>(
    entries: &mut Vec<E>,
    destroyed: impl Fn(&E) -> bool,
    mut visit: impl FnMut(&mut E),
) {
    let mut i = 0;
    while i < entries.len() {
        if destroyed(&entries[i]) {
            entries.remove(i);
            continue;
        }
        visit(&mut entries[i]);
        i += 1;
    }
}
