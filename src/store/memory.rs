//! In-memory tuple store for tests and embedding.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::store::TupleStore;
use crate::types::{RelationTuple, TupleQuery};
use crate::Error;

/// A tuple store backed by a shared in-process set.
///
/// `InMemoryStore` holds tuples behind an `Arc<RwLock<_>>`, so clones share
/// the same underlying store and the engine can query it concurrently. It is
/// intended for tests and for embedding the engine without a database.
///
/// ## Example
///
/// ```rust
/// use aclgraph::{InMemoryStore, RelationTuple};
///
/// let store = InMemoryStore::new();
/// store.write(RelationTuple::new("documents", "readme", "viewer", "user-alice"));
/// store.write(RelationTuple::new(
///     "documents",
///     "readme",
///     "viewer",
///     "teams:engineering#member",
/// ));
/// assert_eq!(store.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tuples: Arc<RwLock<HashSet<RelationTuple>>>,
}

impl InMemoryStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a tuple to the store.
    pub fn write(&self, tuple: RelationTuple) {
        self.tuples.write().insert(tuple);
    }

    /// Writes multiple tuples to the store.
    pub fn write_all(&self, tuples: impl IntoIterator<Item = RelationTuple>) {
        let mut store = self.tuples.write();
        for tuple in tuples {
            store.insert(tuple);
        }
    }

    /// Deletes a tuple from the store.
    ///
    /// Returns `true` if the tuple existed.
    pub fn delete(&self, tuple: &RelationTuple) -> bool {
        self.tuples.write().remove(tuple)
    }

    /// Clears all tuples from the store.
    pub fn clear(&self) {
        self.tuples.write().clear();
    }

    /// Returns the number of stored tuples.
    pub fn len(&self) -> usize {
        self.tuples.read().len()
    }

    /// Returns `true` if there are no stored tuples.
    pub fn is_empty(&self) -> bool {
        self.tuples.read().is_empty()
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore").field("len", &self.len()).finish()
    }
}

impl TupleStore for InMemoryStore {
    fn list(
        &self,
        query: &TupleQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RelationTuple>, Error>> + Send + '_>> {
        let result: Vec<RelationTuple> = self
            .tuples
            .read()
            .iter()
            .filter(|tuple| query.matches(tuple))
            .cloned()
            .collect();
        Box::pin(async move { Ok(result) })
    }
}
