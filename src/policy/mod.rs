//! Namespace policy: which relations exist, and which imply which.
//!
//! The engine consults a [`NamespacePolicy`] to validate relations and to
//! expand a queried relation into the set of relations whose tuples also
//! satisfy it (e.g. `editor` implies `viewer`). Implication only widens the
//! set of relations queried at each node; it never changes the recursion
//! shape.
//!
//! Unknown namespaces and relations are not errors: the engine treats them as
//! "no tuples match", so evaluation stays robust while config propagates.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Supplies, per namespace, the set of valid relations and any relation
/// implications.
pub trait NamespacePolicy: Send + Sync {
    /// Returns the relations defined for `namespace`.
    ///
    /// Unknown namespaces yield an empty set, never an error.
    fn valid_relations(&self, namespace: &str) -> HashSet<String>;

    /// Returns the relations whose tuples also satisfy `relation` in
    /// `namespace`, including `relation` itself.
    ///
    /// The default is the identity: no implication.
    fn implied_relations(&self, namespace: &str, relation: &str) -> HashSet<String> {
        let _ = namespace;
        let mut set = HashSet::with_capacity(1);
        set.insert(relation.to_owned());
        set
    }
}

/// Declares one relation of a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationConfig {
    /// The relation name.
    pub name: String,

    /// Relations whose tuples also satisfy this one.
    ///
    /// `implied_by: ["editor"]` on `viewer` means every `editor` tuple also
    /// grants `viewer`. Implication chains are closed transitively when the
    /// policy is built.
    #[serde(default)]
    pub implied_by: Vec<String>,
}

impl RelationConfig {
    /// Declares a relation with no implications.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), implied_by: Vec::new() }
    }

    /// Adds a relation whose tuples also satisfy this one.
    #[must_use]
    pub fn implied_by(mut self, relation: impl Into<String>) -> Self {
        self.implied_by.push(relation.into());
        self
    }
}

/// Declares one namespace and its relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// The namespace name.
    pub name: String,

    /// The relations valid in this namespace.
    #[serde(default)]
    pub relations: Vec<RelationConfig>,
}

impl NamespaceConfig {
    /// Declares an empty namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), relations: Vec::new() }
    }

    /// Adds a relation to the namespace.
    #[must_use]
    pub fn relation(mut self, relation: RelationConfig) -> Self {
        self.relations.push(relation);
        self
    }
}

#[derive(Debug, Clone)]
struct NamespaceDef {
    relations: HashSet<String>,
    // relation -> all relations whose tuples satisfy it (transitive closure,
    // includes the relation itself)
    implied: HashMap<String, HashSet<String>>,
}

/// A [`NamespacePolicy`] built once from declarative config.
///
/// ## Example
///
/// ```rust
/// use aclgraph::{NamespaceConfig, NamespacePolicy, RelationConfig, StaticPolicy};
///
/// let policy = StaticPolicy::new([NamespaceConfig::new("documents")
///     .relation(RelationConfig::new("owner"))
///     .relation(RelationConfig::new("editor").implied_by("owner"))
///     .relation(RelationConfig::new("viewer").implied_by("editor"))]);
///
/// // Checking viewer also queries editor and owner tuples.
/// let implied = policy.implied_relations("documents", "viewer");
/// assert!(implied.contains("viewer"));
/// assert!(implied.contains("editor"));
/// assert!(implied.contains("owner"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticPolicy {
    namespaces: HashMap<String, NamespaceDef>,
}

impl StaticPolicy {
    /// Builds a policy from namespace configs, closing implication chains
    /// transitively.
    pub fn new(configs: impl IntoIterator<Item = NamespaceConfig>) -> Self {
        let mut namespaces = HashMap::new();
        for config in configs {
            let relations: HashSet<String> =
                config.relations.iter().map(|r| r.name.clone()).collect();

            let mut implied: HashMap<String, HashSet<String>> = HashMap::new();
            for relation in &config.relations {
                let entry = implied.entry(relation.name.clone()).or_default();
                entry.insert(relation.name.clone());
                for stronger in &relation.implied_by {
                    entry.insert(stronger.clone());
                }
            }
            close_transitively(&mut implied);
            // Undeclared relations referenced in implied_by are inert; the
            // engine drops them against the valid set anyway.
            namespaces.insert(config.name, NamespaceDef { relations, implied });
        }
        Self { namespaces }
    }

    /// Builds a policy from a JSON array of [`NamespaceConfig`] values.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use aclgraph::StaticPolicy;
    ///
    /// let policy = StaticPolicy::from_json(
    ///     r#"[{
    ///         "name": "documents",
    ///         "relations": [
    ///             {"name": "editor"},
    ///             {"name": "viewer", "implied_by": ["editor"]}
    ///         ]
    ///     }]"#,
    /// )
    /// .unwrap();
    /// ```
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let configs: Vec<NamespaceConfig> = serde_json::from_str(json)?;
        Ok(Self::new(configs))
    }
}

// Fixpoint over the implication map: if a satisfies b and b satisfies c,
// then a satisfies c.
fn close_transitively(implied: &mut HashMap<String, HashSet<String>>) {
    loop {
        let mut changed = false;
        let snapshot = implied.clone();
        for satisfiers in implied.values_mut() {
            let additions: Vec<String> = satisfiers
                .iter()
                .filter_map(|r| snapshot.get(r))
                .flatten()
                .filter(|r| !satisfiers.contains(*r))
                .cloned()
                .collect();
            if !additions.is_empty() {
                satisfiers.extend(additions);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

impl NamespacePolicy for StaticPolicy {
    fn valid_relations(&self, namespace: &str) -> HashSet<String> {
        self.namespaces
            .get(namespace)
            .map(|def| def.relations.clone())
            .unwrap_or_default()
    }

    fn implied_relations(&self, namespace: &str, relation: &str) -> HashSet<String> {
        match self.namespaces.get(namespace).and_then(|def| def.implied.get(relation)) {
            Some(satisfiers) => satisfiers.clone(),
            None => {
                let mut set = HashSet::with_capacity(1);
                set.insert(relation.to_owned());
                set
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn documents_policy() -> StaticPolicy {
        StaticPolicy::new([NamespaceConfig::new("documents")
            .relation(RelationConfig::new("owner"))
            .relation(RelationConfig::new("editor").implied_by("owner"))
            .relation(RelationConfig::new("viewer").implied_by("editor"))])
    }

    #[test]
    fn test_valid_relations() {
        let policy = documents_policy();
        let relations = policy.valid_relations("documents");
        assert_eq!(relations.len(), 3);
        assert!(relations.contains("viewer"));
    }

    #[test]
    fn test_unknown_namespace_is_empty() {
        let policy = documents_policy();
        assert!(policy.valid_relations("folders").is_empty());
    }

    #[test]
    fn test_implication_closure() {
        let policy = documents_policy();
        let implied = policy.implied_relations("documents", "viewer");
        assert!(implied.contains("viewer"));
        assert!(implied.contains("editor"));
        // Transitive: owner implies editor implies viewer
        assert!(implied.contains("owner"));

        let implied = policy.implied_relations("documents", "owner");
        assert_eq!(implied.len(), 1);
        assert!(implied.contains("owner"));
    }

    #[test]
    fn test_implication_cycle_terminates() {
        // a implied_by b, b implied_by a: closure must not loop forever
        let policy = StaticPolicy::new([NamespaceConfig::new("ns")
            .relation(RelationConfig::new("a").implied_by("b"))
            .relation(RelationConfig::new("b").implied_by("a"))]);
        let implied = policy.implied_relations("ns", "a");
        assert!(implied.contains("a"));
        assert!(implied.contains("b"));
    }

    #[test]
    fn test_unknown_relation_defaults_to_identity() {
        let policy = documents_policy();
        let implied = policy.implied_relations("documents", "publisher");
        assert_eq!(implied.len(), 1);
        assert!(implied.contains("publisher"));
    }

    #[test]
    fn test_from_json() {
        let policy = StaticPolicy::from_json(
            r#"[{
                "name": "documents",
                "relations": [
                    {"name": "editor"},
                    {"name": "viewer", "implied_by": ["editor"]}
                ]
            }]"#,
        )
        .unwrap();
        assert!(policy.implied_relations("documents", "viewer").contains("editor"));
        assert!(StaticPolicy::from_json("not json").is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = NamespaceConfig::new("documents")
            .relation(RelationConfig::new("viewer").implied_by("editor"));
        let json = serde_json::to_string(&config).unwrap();
        let parsed: NamespaceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
