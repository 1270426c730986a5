//! # aclgraph
//!
//! A relationship-based access control (ReBAC) evaluation engine in the
//! Zanzibar model.
//!
//! Relation tuples `(namespace, object, relation, subject)` are the base
//! facts; a subject is either a concrete id or a *subject set* (all subjects
//! holding some relation on some other object), which gives group and role
//! inheritance by indirection. The engine answers two questions over that
//! graph:
//!
//! - **Check**: is a subject related to an object via a relation, directly or
//!   through an arbitrary chain of subject-set indirections?
//! - **Expand**: what is the full tree of subjects satisfying a relation on
//!   an object?
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use aclgraph::prelude::*;
//!
//! # tokio_test::block_on(async {
//! // Tuples: readme is viewable by engineering members; alice is a member.
//! let store = InMemoryStore::new();
//! store.write_all(vec![
//!     RelationTuple::new("documents", "readme", "viewer", "teams:engineering#member"),
//!     RelationTuple::new("teams", "engineering", "member", "user-alice"),
//! ]);
//!
//! // Namespace config: which relations exist, and which imply which.
//! let policy = StaticPolicy::new([
//!     NamespaceConfig::new("documents")
//!         .relation(RelationConfig::new("editor"))
//!         .relation(RelationConfig::new("viewer").implied_by("editor")),
//!     NamespaceConfig::new("teams").relation(RelationConfig::new("member")),
//! ]);
//!
//! let engine = Engine::new(Arc::new(store), Arc::new(policy));
//!
//! // Check: alice reaches readme#viewer through the subject set.
//! let allowed = engine
//!     .check("documents", "readme", "viewer", "user-alice")
//!     .await
//!     .unwrap();
//! assert!(allowed);
//!
//! // Expand: the full subject tree for readme#viewer.
//! let tree = engine.expand("documents", "readme", "viewer").await.unwrap();
//! assert!(tree.contains("user-alice"));
//! # });
//! ```
//!
//! ## Key Concepts
//!
//! - **Denial ≠ Error**: `check()` returns `Ok(false)` for "not related".
//!   Errors mean the question was not answered: [`ErrorKind::Lookup`] (store
//!   failed), [`ErrorKind::DepthExceeded`] (search truncated), or
//!   [`ErrorKind::Cancelled`] (deadline fired).
//! - **Cycles are fine**: the tuple graph may be cyclic (group A includes
//!   group B includes group A). A per-path visited set guarantees termination
//!   and a definitive result; the depth bound only limits genuinely deep
//!   acyclic chains.
//! - **Unknown config is inert**: tuples in namespaces or relations the
//!   policy does not recognize evaluate as "no match", never as an error, so
//!   evaluation stays robust to config propagation lag.
//! - **Storage is a collaborator**: the engine owns no tuple state and holds
//!   no locks; it queries a [`TupleStore`] snapshot and never retries.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod store;
pub mod types;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use config::EngineConfig;
pub use engine::{CheckRequest, Engine, ExpandNode, ExpandRequest, RequireCheckRequest};
pub use error::{Error, ErrorKind, Result};
pub use policy::{NamespaceConfig, NamespacePolicy, RelationConfig, StaticPolicy};
pub use store::{InMemoryStore, TupleStore};
pub use types::{Object, RelationTuple, Subject, SubjectFilter, SubjectSet, TupleQuery};
