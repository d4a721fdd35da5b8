//! Combinators over `Observer<Vec<T>>`.
//!
//! Each function derives a new observer that fully re-evaluates its
//! transform on every source emission — no incremental diffing at this
//! layer. All are thin wrappers over [`Observer::map`], so the derived
//! observer's destruction follows its source's.

use std::cmp::Ordering;

use super::Observer;

/// Element-wise map.
pub fn map<T, U, F>(source: &Observer<Vec<T>>, f: F) -> Observer<Vec<U>>
where
    T: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
    F: Fn(&T) -> U + Send + Sync + 'static,
{
    source.map(move |items| items.iter().map(&f).collect())
}

/// Keep only elements passing `keep`.
pub fn filter<T, F>(source: &Observer<Vec<T>>, keep: F) -> Observer<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    source.map(move |items| items.iter().filter(|item| keep(item)).cloned().collect())
}

/// Sorted copy of the sequence.
pub fn sort<T, F>(source: &Observer<Vec<T>>, compare: F) -> Observer<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    source.map(move |items| {
        let mut sorted = items.clone();
        sorted.sort_by(&compare);
        sorted
    })
}

/// First element, or `None` while the sequence is empty.
pub fn first<T>(source: &Observer<Vec<T>>) -> Observer<Option<T>>
where
    T: Clone + Send + Sync + 'static,
{
    source.map(|items| items.first().cloned())
}

/// At most the first `count` elements.
pub fn limit<T>(source: &Observer<Vec<T>>, count: usize) -> Observer<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
{
    source.map(move |items| items.iter().take(count).cloned().collect())
}

/// Everything after the first `skip` elements.
pub fn offset<T>(source: &Observer<Vec<T>>, skip: usize) -> Observer<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
{
    source.map(move |items| items.iter().skip(skip).cloned().collect())
}

/// `count` elements starting at `skip`.
pub fn window<T>(source: &Observer<Vec<T>>, skip: usize, count: usize) -> Observer<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
{
    source.map(move |items| items.iter().skip(skip).take(count).cloned().collect())
}
