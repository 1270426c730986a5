//! Shared traversal substrate for the check and expand engines.
//!
//! One `Traversal` exists per request. It carries the request deadline, the
//! policy-resolved relation sets, and the request-scoped memo cache. The
//! per-path visited set is *not* stored here: each recursive branch owns its
//! copy of the ancestor path, so sibling branches need no synchronization on
//! it.

use std::collections::HashSet;
use std::time::Instant;

use parking_lot::Mutex;

use crate::config::EngineConfig;
use crate::policy::NamespacePolicy;
use crate::store::TupleStore;
use crate::types::{RelationTuple, Subject, SubjectSet, TupleQuery};
use crate::Error;

/// Per-request traversal state shared by all branches of one evaluation.
pub(crate) struct Traversal<'a> {
    store: &'a dyn TupleStore,
    policy: &'a dyn NamespacePolicy,
    pub(crate) max_fanout: usize,
    deadline: Option<Instant>,
    // Positive check results proven so far, keyed by triple and target
    // subject. Negative results are path-dependent under cycle cuts and are
    // never cached; errors are never cached.
    memo: Option<Mutex<HashSet<(SubjectSet, Subject)>>>,
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(
        store: &'a dyn TupleStore,
        policy: &'a dyn NamespacePolicy,
        config: &EngineConfig,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            store,
            policy,
            max_fanout: config.max_fanout.max(1),
            deadline,
            memo: config.memoize.then(|| Mutex::new(HashSet::new())),
        }
    }

    /// Fails with `Cancelled` once the request deadline has passed.
    ///
    /// Checked at every node entry; the store calls themselves are raced
    /// against the deadline in [`list`](Self::list).
    pub(crate) fn ensure_active(&self) -> Result<(), Error> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Error::cancelled()),
            _ => Ok(()),
        }
    }

    /// Queries the store, re-applying the subject filter in case the store
    /// ignored it.
    ///
    /// The lookup is raced against the request deadline, so a store that
    /// never resolves cannot hang the request past it.
    pub(crate) async fn list(&self, query: &TupleQuery) -> Result<Vec<RelationTuple>, Error> {
        self.ensure_active()?;
        let tuples = match self.deadline {
            Some(deadline) => {
                let at = tokio::time::Instant::from_std(deadline);
                tokio::time::timeout_at(at, self.store.list(query))
                    .await
                    .map_err(|_| Error::cancelled())??
            }
            None => self.store.list(query).await?,
        };
        Ok(tuples.into_iter().filter(|tuple| query.matches(tuple)).collect())
    }

    /// Resolves the relations to query for a triple: the policy's implied
    /// set, restricted to relations valid in the namespace.
    ///
    /// Returns an empty vector when the namespace or relation is unknown;
    /// the caller treats that as "no tuples match", never as an error.
    pub(crate) fn relations_for(&self, triple: &SubjectSet) -> Vec<String> {
        let valid = self.policy.valid_relations(triple.namespace());
        if !valid.contains(triple.relation()) {
            tracing::trace!(
                namespace = triple.namespace(),
                relation = triple.relation(),
                "relation not defined for namespace, treating as no match"
            );
            return Vec::new();
        }
        self.policy
            .implied_relations(triple.namespace(), triple.relation())
            .into_iter()
            .filter(|relation| valid.contains(relation))
            .collect()
    }

    pub(crate) fn memo_hit(&self, triple: &SubjectSet, subject: &Subject) -> bool {
        match &self.memo {
            Some(memo) => memo.lock().contains(&(triple.clone(), subject.clone())),
            None => false,
        }
    }

    pub(crate) fn memo_record(&self, triple: &SubjectSet, subject: &Subject) {
        if let Some(memo) = &self.memo {
            memo.lock().insert((triple.clone(), subject.clone()));
        }
    }
}
