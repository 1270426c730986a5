//! The expand engine: materializes the subject tree for a triple.

use std::collections::HashSet;

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::engine::tree::ExpandNode;
use crate::engine::traversal::Traversal;
use crate::types::{Subject, SubjectSet, TupleQuery};
use crate::Error;

impl Traversal<'_> {
    /// Expands a triple into its full subject tree.
    ///
    /// Same recursion as check, without short-circuiting and without an input
    /// subject: direct `Id` tuples become leaves, each subject-set tuple
    /// becomes a child expanded recursively under the same cycle and depth
    /// guards. A child whose triple is already on the path becomes a cut
    /// marker instead of a recursion.
    pub(crate) fn expand<'s>(
        &'s self,
        triple: SubjectSet,
        visited: HashSet<SubjectSet>,
        depth_left: u32,
    ) -> BoxFuture<'s, Result<ExpandNode, Error>> {
        Box::pin(async move {
            self.ensure_active()?;

            let relations = self.relations_for(&triple);
            if relations.is_empty() {
                return Ok(ExpandNode::empty(triple));
            }

            let mut leaves: Vec<String> = Vec::new();
            let mut sets: Vec<SubjectSet> = Vec::new();
            for relation in &relations {
                let query = TupleQuery::new(triple.namespace(), triple.object(), relation);
                for tuple in self.list(&query).await? {
                    match tuple.subject() {
                        Subject::Id(id) => {
                            if !leaves.contains(id) {
                                leaves.push(id.clone());
                            }
                        }
                        Subject::Set(set) => {
                            if !sets.contains(set) {
                                sets.push(set.clone());
                            }
                        }
                    }
                }
            }
            leaves.sort();
            sets.sort_by_key(|set| set.to_string());

            let mut path = visited;
            path.insert(triple.clone());

            let needs_descent = sets.iter().any(|set| !path.contains(set));
            if needs_descent && depth_left == 0 {
                tracing::debug!(triple = %triple, "depth budget exhausted while expanding");
                return Err(Error::depth_exceeded(format!(
                    "unexpanded subject sets under {} at maximum depth",
                    triple
                )));
            }

            let branches: Vec<BoxFuture<'_, Result<ExpandNode, Error>>> = sets
                .into_iter()
                .map(|set| {
                    if path.contains(&set) {
                        tracing::trace!(triple = %set, "cycle detected, emitting cut node");
                        Box::pin(std::future::ready(Ok(ExpandNode::cut(set))))
                    } else {
                        self.expand(set, path.clone(), depth_left - 1)
                    }
                })
                .collect();

            // Ordered buffering keeps children aligned with the candidate
            // order while still bounding concurrency.
            let children: Vec<ExpandNode> =
                stream::iter(branches).buffered(self.max_fanout).try_collect().await?;

            Ok(ExpandNode::new(triple, leaves, children))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::EngineConfig;
    use crate::policy::{NamespaceConfig, RelationConfig, StaticPolicy};
    use crate::store::InMemoryStore;
    use crate::types::RelationTuple;
    use crate::ErrorKind;

    fn test_policy() -> StaticPolicy {
        StaticPolicy::new([
            NamespaceConfig::new("documents")
                .relation(RelationConfig::new("editor"))
                .relation(RelationConfig::new("viewer").implied_by("editor")),
            NamespaceConfig::new("teams").relation(RelationConfig::new("member")),
        ])
    }

    async fn run_expand(
        store: &InMemoryStore,
        policy: &StaticPolicy,
        triple: SubjectSet,
        max_depth: u32,
    ) -> Result<ExpandNode, Error> {
        let config = EngineConfig::builder().max_depth(max_depth).build();
        let traversal = Traversal::new(store, policy, &config, None);
        traversal.expand(triple, HashSet::new(), max_depth).await
    }

    #[tokio::test]
    async fn test_expand_direct_and_indirect() {
        let store = InMemoryStore::new();
        store.write_all(vec![
            RelationTuple::new("documents", "doc1", "viewer", "user-alice"),
            RelationTuple::new("documents", "doc1", "viewer", "teams:team1#member"),
            RelationTuple::new("teams", "team1", "member", "user-bob"),
        ]);
        let policy = test_policy();

        let tree = run_expand(&store, &policy, SubjectSet::new("documents", "doc1", "viewer"), 32)
            .await
            .unwrap();

        assert_eq!(tree.leaves, vec!["user-alice"]);
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].triple, SubjectSet::new("teams", "team1", "member"));
        assert_eq!(tree.children[0].leaves, vec!["user-bob"]);
        assert!(!tree.has_cuts());
        assert!(tree.contains("user-alice"));
        assert!(tree.contains("user-bob"));
    }

    #[tokio::test]
    async fn test_expand_includes_implied_relations() {
        let store = InMemoryStore::new();
        store.write_all(vec![
            RelationTuple::new("documents", "doc1", "viewer", "user-alice"),
            RelationTuple::new("documents", "doc1", "editor", "user-bob"),
        ]);
        let policy = test_policy();

        let tree = run_expand(&store, &policy, SubjectSet::new("documents", "doc1", "viewer"), 32)
            .await
            .unwrap();
        assert_eq!(tree.leaves, vec!["user-alice", "user-bob"]);
    }

    #[tokio::test]
    async fn test_expand_marks_cycles_as_cut() {
        let store = InMemoryStore::new();
        store.write_all(vec![
            RelationTuple::new("teams", "a", "member", "teams:b#member"),
            RelationTuple::new("teams", "b", "member", "teams:a#member"),
            RelationTuple::new("teams", "b", "member", "user-alice"),
        ]);
        let policy = test_policy();

        let tree = run_expand(&store, &policy, SubjectSet::new("teams", "a", "member"), 32)
            .await
            .unwrap();

        assert_eq!(tree.children.len(), 1);
        let b = &tree.children[0];
        assert_eq!(b.leaves, vec!["user-alice"]);
        assert_eq!(b.children.len(), 1);
        assert!(b.children[0].cut);
        assert_eq!(b.children[0].triple, SubjectSet::new("teams", "a", "member"));
        assert!(tree.has_cuts());
    }

    #[tokio::test]
    async fn test_expand_depth_bound() {
        let store = InMemoryStore::new();
        store.write_all(vec![
            RelationTuple::new("teams", "g0", "member", "teams:g1#member"),
            RelationTuple::new("teams", "g1", "member", "teams:g2#member"),
            RelationTuple::new("teams", "g2", "member", "user-alice"),
        ]);
        let policy = test_policy();
        let triple = SubjectSet::new("teams", "g0", "member");

        let tree = run_expand(&store, &policy, triple.clone(), 2).await.unwrap();
        assert!(tree.contains("user-alice"));

        let err = run_expand(&store, &policy, triple, 1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    }

    #[tokio::test]
    async fn test_expand_unknown_relation_is_empty() {
        let store = InMemoryStore::new();
        store.write(RelationTuple::new("documents", "doc1", "viewer", "user-alice"));
        let policy = test_policy();

        let tree = run_expand(&store, &policy, SubjectSet::new("documents", "doc1", "owner"), 32)
            .await
            .unwrap();
        assert!(tree.leaves.is_empty());
        assert!(tree.children.is_empty());
        assert!(!tree.cut);
    }
}
