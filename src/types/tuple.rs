//! Relation tuple types: the wire schema of the authorization graph.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A resource in a namespace: a `(namespace, id)` pair.
///
/// Objects have no independent lifecycle; they exist only as a field of a
/// tuple or a query.
///
/// ## Example
///
/// ```rust
/// use aclgraph::Object;
///
/// let obj = Object::new("documents", "readme");
/// assert_eq!(obj.to_string(), "documents:readme");
///
/// // The subject set "all viewers of documents:readme"
/// let viewers = obj.relation("viewer");
/// assert_eq!(viewers.to_string(), "documents:readme#viewer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Object {
    /// The namespace of the object.
    namespace: String,

    /// The object id.
    id: String,
}

impl Object {
    /// Creates a new object reference.
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), id: id.into() }
    }

    /// Returns the namespace of the object.
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the object id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the subject set denoting all subjects holding `relation` on
    /// this object.
    pub fn relation(&self, relation: impl Into<String>) -> SubjectSet {
        SubjectSet::new(self.namespace.clone(), self.id.clone(), relation)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.id)
    }
}

impl FromStr for Object {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, id) = s.split_once(':').ok_or_else(|| {
            Error::invalid_argument(format!(
                "invalid object format: missing ':' separator in '{}'",
                s
            ))
        })?;
        if namespace.is_empty() || id.is_empty() {
            return Err(Error::invalid_argument(
                "object namespace and id cannot be empty",
            ));
        }
        Ok(Object::new(namespace, id))
    }
}

/// An indirect subject: all subjects holding `relation` on `object` in
/// `namespace`.
///
/// A subject set is structurally identical to the left-hand side of a tuple
/// query, which is what lets the engine recurse: expanding a set means
/// re-running the same lookup-and-match procedure on its triple. The engine
/// also uses this type as the node key of the traversal graph.
///
/// ## String Format
///
/// ```rust
/// use aclgraph::SubjectSet;
///
/// let set: SubjectSet = "teams:engineering#member".parse().unwrap();
/// assert_eq!(set.namespace(), "teams");
/// assert_eq!(set.object(), "engineering");
/// assert_eq!(set.relation(), "member");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectSet {
    /// The namespace of the object.
    namespace: String,

    /// The object the subjects are related to.
    object: String,

    /// The relation between the object and the subjects.
    relation: String,
}

impl SubjectSet {
    /// Creates a new subject set.
    pub fn new(
        namespace: impl Into<String>,
        object: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            object: object.into(),
            relation: relation.into(),
        }
    }

    /// Returns the namespace.
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the object id.
    #[inline]
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Returns the relation.
    #[inline]
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Returns the `(namespace, id)` pair of this set.
    pub fn to_object(&self) -> Object {
        Object::new(self.namespace.clone(), self.object.clone())
    }
}

impl fmt::Display for SubjectSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.namespace, self.object, self.relation)
    }
}

impl FromStr for SubjectSet {
    type Err = Error;

    /// Parses a subject set from the `namespace:object#relation` format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (object_part, relation) = s.split_once('#').ok_or_else(|| {
            Error::invalid_argument(format!(
                "invalid subject set format: missing '#' separator in '{}'",
                s
            ))
        })?;
        let object: Object = object_part.parse()?;
        if relation.is_empty() {
            return Err(Error::invalid_argument("subject set relation cannot be empty"));
        }
        Ok(SubjectSet::new(object.namespace, object.id, relation))
    }
}

/// A subject: either a concrete id (a leaf) or a [`SubjectSet`] indirection.
///
/// Exactly one variant is populated; this is the polymorphism point the
/// traversal recurses on, and both engines match it exhaustively.
///
/// ## Serialization
///
/// Serializes as an externally tagged enum, mirroring the wire schema's
/// `oneof`:
///
/// ```rust
/// use aclgraph::Subject;
///
/// let id = Subject::from("user-alice");
/// assert_eq!(serde_json::to_string(&id).unwrap(), r#"{"id":"user-alice"}"#);
///
/// let set = Subject::from("teams:engineering#member");
/// assert!(serde_json::to_string(&set).unwrap().starts_with(r#"{"set""#));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    /// A concrete, terminal subject id.
    Id(String),
    /// An indirection expanding to more subjects.
    Set(SubjectSet),
}

impl Subject {
    /// Creates a concrete subject from an id.
    pub fn id(id: impl Into<String>) -> Self {
        Subject::Id(id.into())
    }

    /// Creates an indirect subject from a subject set.
    pub fn set(set: SubjectSet) -> Self {
        Subject::Set(set)
    }

    /// Returns `true` if this subject is a subject set.
    pub fn is_set(&self) -> bool {
        matches!(self, Subject::Set(_))
    }

    /// Returns the concrete id, if this is a leaf subject.
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Subject::Id(id) => Some(id),
            Subject::Set(_) => None,
        }
    }

    /// Returns the subject set, if this is an indirection.
    pub fn as_set(&self) -> Option<&SubjectSet> {
        match self {
            Subject::Id(_) => None,
            Subject::Set(set) => Some(set),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Id(id) => f.write_str(id),
            Subject::Set(set) => set.fmt(f),
        }
    }
}

/// Parses a subject from its text form.
///
/// Strings in the `namespace:object#relation` form become subject sets;
/// anything else is taken verbatim as a concrete id.
impl From<&str> for Subject {
    fn from(s: &str) -> Self {
        match s.parse::<SubjectSet>() {
            Ok(set) => Subject::Set(set),
            Err(_) => Subject::Id(s.to_owned()),
        }
    }
}

impl From<String> for Subject {
    fn from(s: String) -> Self {
        Subject::from(s.as_str())
    }
}

impl From<SubjectSet> for Subject {
    fn from(set: SubjectSet) -> Self {
        Subject::Set(set)
    }
}

/// A relationship tuple: the base fact of the authorization graph.
///
/// A tuple relates a [`Subject`] to an object through a relation, reading as
/// "`object` has `relation` to `subject`". Tuples are created by an external
/// write path and are read-only from the engine's perspective.
///
/// ## String Format
///
/// Tuples parse from and format to `namespace:object#relation@subject`:
///
/// ```rust
/// use aclgraph::RelationTuple;
///
/// let tuple: RelationTuple = "documents:readme#viewer@user-alice".parse().unwrap();
/// assert_eq!(tuple.namespace(), "documents");
/// assert_eq!(tuple.object(), "readme");
/// assert_eq!(tuple.relation(), "viewer");
/// assert_eq!(tuple.subject().as_id(), Some("user-alice"));
///
/// // Subject sets nest after the '@':
/// let indirect: RelationTuple =
///     "documents:readme#viewer@teams:engineering#member".parse().unwrap();
/// assert!(indirect.subject().is_set());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationTuple {
    /// The namespace this tuple lives in.
    namespace: String,

    /// The object related by this tuple, naturally in the tuple's namespace.
    object: String,

    /// The relation between the object and the subject.
    relation: String,

    /// The related subject: a concrete id or a subject set.
    subject: Subject,
}

impl RelationTuple {
    /// Creates a new relation tuple.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aclgraph::RelationTuple;
    ///
    /// // "documents:readme has viewer user-alice"
    /// let direct = RelationTuple::new("documents", "readme", "viewer", "user-alice");
    ///
    /// // "documents:readme has viewer anyone who is member of teams:engineering"
    /// let indirect =
    ///     RelationTuple::new("documents", "readme", "viewer", "teams:engineering#member");
    /// assert!(indirect.subject().is_set());
    /// ```
    pub fn new(
        namespace: impl Into<String>,
        object: impl Into<String>,
        relation: impl Into<String>,
        subject: impl Into<Subject>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            object: object.into(),
            relation: relation.into(),
            subject: subject.into(),
        }
    }

    /// Returns the namespace of the tuple.
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the object id of the tuple.
    #[inline]
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Returns the relation of the tuple.
    #[inline]
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Returns the subject of the tuple.
    #[inline]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Returns the left-hand side of this tuple as a [`SubjectSet`] triple.
    ///
    /// This is the node in the traversal graph the tuple belongs to.
    pub fn triple(&self) -> SubjectSet {
        SubjectSet::new(self.namespace.clone(), self.object.clone(), self.relation.clone())
    }
}

impl fmt::Display for RelationTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}@{}", self.namespace, self.object, self.relation, self.subject)
    }
}

impl FromStr for RelationTuple {
    type Err = Error;

    /// Parses a tuple from the `namespace:object#relation@subject` format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (object_part, rest) = s.split_once('#').ok_or_else(|| {
            Error::invalid_argument(format!(
                "invalid tuple format: missing '#' separator in '{}'",
                s
            ))
        })?;
        let (relation, subject) = rest.split_once('@').ok_or_else(|| {
            Error::invalid_argument(format!(
                "invalid tuple format: missing '@' separator in '{}'",
                s
            ))
        })?;

        let object: Object = object_part.parse()?;
        if relation.is_empty() {
            return Err(Error::invalid_argument("tuple relation cannot be empty"));
        }
        if subject.is_empty() {
            return Err(Error::invalid_argument("tuple subject cannot be empty"));
        }

        Ok(RelationTuple::new(object.namespace, object.id, relation, subject))
    }
}
