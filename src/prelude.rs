//! Prelude module for convenient imports.
//!
//! ```rust
//! use aclgraph::prelude::*;
//! ```

pub use crate::{
    config::EngineConfig,
    engine::{CheckRequest, Engine, ExpandNode, ExpandRequest, RequireCheckRequest},
    error::{Error, ErrorKind, Result},
    policy::{NamespaceConfig, NamespacePolicy, RelationConfig, StaticPolicy},
    store::{InMemoryStore, TupleStore},
    types::{Object, RelationTuple, Subject, SubjectFilter, SubjectSet, TupleQuery},
};
