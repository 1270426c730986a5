//! Core types for the aclgraph engine.
//!
//! This module provides the wire-schema types and query types:
//!
//! - [`RelationTuple`]: the stored fact `(namespace, object, relation, subject)`
//! - [`Subject`]: a concrete id or a [`SubjectSet`] indirection
//! - [`SubjectSet`]: "all subjects with `relation` on `object` in `namespace`"
//! - [`Object`]: a `(namespace, id)` pair
//! - [`TupleQuery`]/[`SubjectFilter`]: the lookup interface consumed by the engine

mod query;
mod tuple;

pub use query::{SubjectFilter, TupleQuery};
pub use tuple::{Object, RelationTuple, Subject, SubjectSet};
