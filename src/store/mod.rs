//! Tuple storage interface consumed by the engine.
//!
//! The engine treats storage as a queryable collaborator, never as owned
//! state: every traversal runs against whatever snapshot
//! [`TupleStore::list`] returns.
//!
//! - [`TupleStore`]: object-safe async lookup trait
//! - [`InMemoryStore`]: a store backed by a shared in-process set, for tests
//!   and embedding

mod memory;

use std::future::Future;
use std::pin::Pin;

use crate::types::{RelationTuple, TupleQuery};
use crate::Error;

pub use memory::InMemoryStore;

/// Object-safe trait for tuple lookup.
///
/// Implementations should honor the query's subject filter, but the engine
/// re-filters results itself, so a store that returns a superset (e.g. one
/// that cannot index by subject kind) is still correct, just slower.
///
/// Failures must be reported as [`ErrorKind::Lookup`](crate::ErrorKind::Lookup)
/// errors; the engine propagates them verbatim and never retries.
///
/// ## Example
///
/// ```rust
/// use std::future::Future;
/// use std::pin::Pin;
///
/// use aclgraph::{Error, RelationTuple, TupleQuery, TupleStore};
///
/// struct EmptyStore;
///
/// impl TupleStore for EmptyStore {
///     fn list(
///         &self,
///         _query: &TupleQuery,
///     ) -> Pin<Box<dyn Future<Output = Result<Vec<RelationTuple>, Error>> + Send + '_>> {
///         Box::pin(async { Ok(Vec::new()) })
///     }
/// }
/// ```
pub trait TupleStore: Send + Sync {
    /// Returns the tuples matching `query`.
    fn list(
        &self,
        query: &TupleQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RelationTuple>, Error>> + Send + '_>>;
}
