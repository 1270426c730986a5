//! Tuple query types: the lookup interface the engine issues to stores.

use serde::{Deserialize, Serialize};

use super::{RelationTuple, Subject, SubjectSet};

/// A filter on the subject column of a tuple query.
///
/// The engine issues two distinct queries per traversal node: an exact-subject
/// query for the direct match and a sets-only query for the indirection
/// candidates. Stores that cannot filter may return supersets; the engine
/// re-applies the filter itself via [`TupleQuery::matches`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectFilter {
    /// Match any subject.
    #[default]
    Any,
    /// Match only tuples whose subject equals the given one.
    Exact(Subject),
    /// Match only concrete-id subjects.
    Ids,
    /// Match only subject-set subjects.
    Sets,
}

impl SubjectFilter {
    /// Returns `true` if `subject` passes this filter.
    pub fn matches(&self, subject: &Subject) -> bool {
        match self {
            SubjectFilter::Any => true,
            SubjectFilter::Exact(expected) => subject == expected,
            SubjectFilter::Ids => !subject.is_set(),
            SubjectFilter::Sets => subject.is_set(),
        }
    }
}

/// A query for tuples matching `(namespace, object, relation)` plus an
/// optional subject filter.
///
/// ## Example
///
/// ```rust
/// use aclgraph::{RelationTuple, SubjectFilter, TupleQuery};
///
/// let query = TupleQuery::new("documents", "readme", "viewer")
///     .with_subject(SubjectFilter::Sets);
///
/// let direct = RelationTuple::new("documents", "readme", "viewer", "user-alice");
/// let indirect =
///     RelationTuple::new("documents", "readme", "viewer", "teams:engineering#member");
///
/// assert!(!query.matches(&direct));
/// assert!(query.matches(&indirect));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleQuery {
    /// The namespace to query.
    namespace: String,

    /// The object to query.
    object: String,

    /// The relation to query.
    relation: String,

    /// The subject filter.
    #[serde(default)]
    subject: SubjectFilter,
}

impl TupleQuery {
    /// Creates a query matching any subject on the given triple.
    pub fn new(
        namespace: impl Into<String>,
        object: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            object: object.into(),
            relation: relation.into(),
            subject: SubjectFilter::Any,
        }
    }

    /// Restricts the query to subjects passing `filter`.
    #[must_use]
    pub fn with_subject(mut self, filter: SubjectFilter) -> Self {
        self.subject = filter;
        self
    }

    /// Returns the namespace being queried.
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the object being queried.
    #[inline]
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Returns the relation being queried.
    #[inline]
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Returns the subject filter.
    #[inline]
    pub fn subject(&self) -> &SubjectFilter {
        &self.subject
    }

    /// Returns `true` if `tuple` matches this query, including the subject
    /// filter.
    pub fn matches(&self, tuple: &RelationTuple) -> bool {
        tuple.namespace() == self.namespace
            && tuple.object() == self.object
            && tuple.relation() == self.relation
            && self.subject.matches(tuple.subject())
    }
}

/// Builds the query for all tuples belonging to a triple.
impl From<&SubjectSet> for TupleQuery {
    fn from(triple: &SubjectSet) -> Self {
        TupleQuery::new(triple.namespace(), triple.object(), triple.relation())
    }
}
