//! The check engine: boolean membership queries over the tuple graph.

use std::collections::HashSet;

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};

use crate::engine::traversal::Traversal;
use crate::types::{Subject, SubjectFilter, SubjectSet, TupleQuery};
use crate::{Error, ErrorKind};

impl Traversal<'_> {
    /// Decides whether `subject` is related to `triple`'s object by its
    /// relation, directly or through subject-set indirection.
    ///
    /// `visited` is the set of triples on the path from the root to this
    /// node; candidates already on the path are skipped, which guarantees
    /// termination under cyclic tuple graphs independent of `depth_left`.
    ///
    /// `depth_left` is the number of further descents allowed. A node that
    /// still has candidates when it reaches zero fails with `DepthExceeded`
    /// rather than silently returning false.
    pub(crate) fn check<'s>(
        &'s self,
        triple: SubjectSet,
        subject: &'s Subject,
        visited: HashSet<SubjectSet>,
        depth_left: u32,
    ) -> BoxFuture<'s, Result<bool, Error>> {
        Box::pin(async move {
            self.ensure_active()?;

            if self.memo_hit(&triple, subject) {
                tracing::trace!(triple = %triple, "positive memo hit");
                return Ok(true);
            }

            let relations = self.relations_for(&triple);
            if relations.is_empty() {
                return Ok(false);
            }

            // Direct match: a stored tuple whose subject equals the target.
            for relation in &relations {
                let query = TupleQuery::new(triple.namespace(), triple.object(), relation)
                    .with_subject(SubjectFilter::Exact(subject.clone()));
                if !self.list(&query).await?.is_empty() {
                    tracing::debug!(triple = %triple, subject = %subject, "direct match");
                    self.memo_record(&triple, subject);
                    return Ok(true);
                }
            }

            // Indirect candidates: every subject-set tuple under the triple.
            let mut candidates: Vec<SubjectSet> = Vec::new();
            for relation in &relations {
                let query = TupleQuery::new(triple.namespace(), triple.object(), relation)
                    .with_subject(SubjectFilter::Sets);
                for tuple in self.list(&query).await? {
                    if let Subject::Set(set) = tuple.subject() {
                        if !candidates.contains(set) {
                            candidates.push(set.clone());
                        }
                    }
                }
            }

            // A subject set is a subject in its own right: if the target is
            // one of the candidate sets, no recursion is needed.
            if let Subject::Set(target) = subject {
                if candidates.contains(target) {
                    self.memo_record(&triple, subject);
                    return Ok(true);
                }
            }

            // Cycle guard: drop candidates already on this path, including
            // self-loops on the current triple.
            let mut path = visited;
            path.insert(triple.clone());
            candidates.retain(|candidate| {
                let fresh = !path.contains(candidate);
                if !fresh {
                    tracing::trace!(triple = %candidate, "cycle detected, skipping candidate");
                }
                fresh
            });

            if candidates.is_empty() {
                return Ok(false);
            }
            if depth_left == 0 {
                tracing::debug!(triple = %triple, "depth budget exhausted with candidates left");
                return Err(Error::depth_exceeded(format!(
                    "unresolved subject sets under {} at maximum depth",
                    triple
                )));
            }

            // Sibling descents are independent pure reads; run them with
            // bounded concurrency and short-circuit on the first success.
            // Dropping the stream abandons in-flight siblings.
            let branches = candidates
                .into_iter()
                .map(|candidate| self.check(candidate, subject, path.clone(), depth_left - 1));
            let mut results = stream::iter(branches).buffer_unordered(self.max_fanout);

            // A sibling DepthExceeded is deferred: another branch may still
            // prove membership, and only a fully explored miss may report
            // plain false.
            let mut truncated = false;
            while let Some(result) = results.next().await {
                match result {
                    Ok(true) => {
                        self.memo_record(&triple, subject);
                        return Ok(true);
                    }
                    Ok(false) => {}
                    Err(err) if err.kind() == ErrorKind::DepthExceeded => truncated = true,
                    Err(err) => return Err(err),
                }
            }
            if truncated {
                Err(Error::depth_exceeded(format!(
                    "search below {} truncated by the depth bound",
                    triple
                )))
            } else {
                Ok(false)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Instant;

    use super::*;
    use crate::config::EngineConfig;
    use crate::policy::{NamespaceConfig, RelationConfig, StaticPolicy};
    use crate::store::InMemoryStore;
    use crate::types::RelationTuple;

    fn test_policy() -> StaticPolicy {
        StaticPolicy::new([
            NamespaceConfig::new("documents")
                .relation(RelationConfig::new("editor"))
                .relation(RelationConfig::new("viewer").implied_by("editor")),
            NamespaceConfig::new("teams").relation(RelationConfig::new("member")),
        ])
    }

    async fn run_check(
        store: &InMemoryStore,
        policy: &StaticPolicy,
        triple: SubjectSet,
        subject: Subject,
        max_depth: u32,
    ) -> Result<bool, Error> {
        let config = EngineConfig::builder().max_depth(max_depth).build();
        let traversal = Traversal::new(store, policy, &config, None);
        traversal.check(triple, &subject, HashSet::new(), max_depth).await
    }

    #[tokio::test]
    async fn test_direct_match() {
        let store = InMemoryStore::new();
        store.write(RelationTuple::new("documents", "doc1", "viewer", "user-alice"));
        let policy = test_policy();

        let triple = SubjectSet::new("documents", "doc1", "viewer");
        let allowed =
            run_check(&store, &policy, triple.clone(), Subject::id("user-alice"), 32).await;
        assert!(allowed.unwrap());

        let denied = run_check(&store, &policy, triple, Subject::id("user-bob"), 32).await;
        assert!(!denied.unwrap());
    }

    #[tokio::test]
    async fn test_indirect_match() {
        let store = InMemoryStore::new();
        store.write_all(vec![
            RelationTuple::new("documents", "doc1", "viewer", "teams:team1#member"),
            RelationTuple::new("teams", "team1", "member", "user-alice"),
        ]);
        let policy = test_policy();

        let triple = SubjectSet::new("documents", "doc1", "viewer");
        let allowed = run_check(&store, &policy, triple, Subject::id("user-alice"), 32).await;
        assert!(allowed.unwrap());
    }

    #[tokio::test]
    async fn test_implied_relation_satisfies() {
        let store = InMemoryStore::new();
        store.write(RelationTuple::new("documents", "doc1", "editor", "user-alice"));
        let policy = test_policy();

        // An editor tuple satisfies a viewer check.
        let viewer = SubjectSet::new("documents", "doc1", "viewer");
        let allowed = run_check(&store, &policy, viewer, Subject::id("user-alice"), 32).await;
        assert!(allowed.unwrap());

        // The reverse does not hold.
        let store = InMemoryStore::new();
        store.write(RelationTuple::new("documents", "doc1", "viewer", "user-alice"));
        let editor = SubjectSet::new("documents", "doc1", "editor");
        let denied = run_check(&store, &test_policy(), editor, Subject::id("user-alice"), 32).await;
        assert!(!denied.unwrap());
    }

    #[tokio::test]
    async fn test_cycle_terminates_with_false() {
        let store = InMemoryStore::new();
        store.write_all(vec![
            RelationTuple::new("teams", "a", "member", "teams:b#member"),
            RelationTuple::new("teams", "b", "member", "teams:a#member"),
        ]);
        let policy = test_policy();

        // The cycle guard, not the depth guard, resolves this: definitive
        // false, not DepthExceeded.
        let triple = SubjectSet::new("teams", "a", "member");
        let result = run_check(&store, &policy, triple, Subject::id("user-alice"), 32).await;
        assert!(!result.unwrap());
    }

    #[tokio::test]
    async fn test_depth_bound() {
        let store = InMemoryStore::new();
        store.write_all(vec![
            RelationTuple::new("teams", "g0", "member", "teams:g1#member"),
            RelationTuple::new("teams", "g1", "member", "teams:g2#member"),
            RelationTuple::new("teams", "g2", "member", "user-alice"),
        ]);
        let policy = test_policy();
        let triple = SubjectSet::new("teams", "g0", "member");

        // Two descents are needed; a budget of two resolves it.
        let allowed =
            run_check(&store, &policy, triple.clone(), Subject::id("user-alice"), 2).await;
        assert!(allowed.unwrap());

        // A budget of one truncates the search.
        let err = run_check(&store, &policy, triple, Subject::id("user-alice"), 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    }

    #[tokio::test]
    async fn test_short_path_wins_over_truncated_sibling() {
        let store = InMemoryStore::new();
        store.write_all(vec![
            // Deep branch that would exceed the depth budget
            RelationTuple::new("teams", "root", "member", "teams:d1#member"),
            RelationTuple::new("teams", "d1", "member", "teams:d2#member"),
            RelationTuple::new("teams", "d2", "member", "teams:d3#member"),
            RelationTuple::new("teams", "d3", "member", "user-alice"),
            // Shallow branch that resolves within it
            RelationTuple::new("teams", "root", "member", "teams:s1#member"),
            RelationTuple::new("teams", "s1", "member", "user-alice"),
        ]);
        let policy = test_policy();

        let triple = SubjectSet::new("teams", "root", "member");
        let allowed = run_check(&store, &policy, triple, Subject::id("user-alice"), 2).await;
        assert!(allowed.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_namespace_is_false() {
        let store = InMemoryStore::new();
        store.write(RelationTuple::new("folders", "f1", "viewer", "user-alice"));
        let policy = test_policy();

        let triple = SubjectSet::new("folders", "f1", "viewer");
        let result = run_check(&store, &policy, triple, Subject::id("user-alice"), 32).await;
        assert!(!result.unwrap());
    }

    #[tokio::test]
    async fn test_subject_set_as_target() {
        let store = InMemoryStore::new();
        store.write(RelationTuple::new("documents", "doc1", "viewer", "teams:team1#member"));
        let policy = test_policy();

        let triple = SubjectSet::new("documents", "doc1", "viewer");
        let target = Subject::from("teams:team1#member");
        let allowed = run_check(&store, &policy, triple, target, 32).await;
        assert!(allowed.unwrap());
    }

    #[tokio::test]
    async fn test_expired_deadline_cancels() {
        let store = InMemoryStore::new();
        store.write(RelationTuple::new("documents", "doc1", "viewer", "user-alice"));
        let policy = test_policy();
        let config = EngineConfig::default();

        let traversal = Traversal::new(&store, &policy, &config, Some(Instant::now()));
        let subject = Subject::id("user-alice");
        let err = traversal
            .check(SubjectSet::new("documents", "doc1", "viewer"), &subject, HashSet::new(), 32)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }
}
