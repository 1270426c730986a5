//! The check/expand engine.
//!
//! [`Engine`] wires a [`TupleStore`] and a [`NamespacePolicy`] together and
//! exposes the two evaluation operations:
//!
//! - [`check()`](Engine::check): is `subject` related to `object` by
//!   `relation`, directly or through subject-set indirection?
//! - [`expand()`](Engine::expand): the full tree of subjects satisfying
//!   `relation` on `object`.
//!
//! Both operations return request builders; chain modifiers and `.await` to
//! execute:
//!
//! ```rust,ignore
//! let allowed = engine
//!     .check("documents", "readme", "viewer", "user-alice")
//!     .max_depth(8)
//!     .timeout(Duration::from_millis(200))
//!     .await?;
//! ```

mod check;
mod expand;
mod traversal;
mod tree;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::EngineConfig;
use crate::policy::NamespacePolicy;
use crate::store::TupleStore;
use crate::types::{Subject, SubjectSet};
use crate::Error;

use traversal::Traversal;

pub use tree::ExpandNode;

/// The permission-evaluation engine.
///
/// The engine owns no tuple state: every request evaluates against whatever
/// snapshot the store returns, and repeated requests against an unchanged
/// store return the same result. `Engine` is `Clone` and cheap to share
/// across request handlers.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use aclgraph::prelude::*;
///
/// # tokio_test::block_on(async {
/// let store = InMemoryStore::new();
/// store.write_all(vec![
///     RelationTuple::new("documents", "readme", "viewer", "teams:engineering#member"),
///     RelationTuple::new("teams", "engineering", "member", "user-alice"),
/// ]);
///
/// let policy = StaticPolicy::new([
///     NamespaceConfig::new("documents").relation(RelationConfig::new("viewer")),
///     NamespaceConfig::new("teams").relation(RelationConfig::new("member")),
/// ]);
///
/// let engine = Engine::new(Arc::new(store), Arc::new(policy));
/// let allowed = engine
///     .check("documents", "readme", "viewer", "user-alice")
///     .await
///     .unwrap();
/// assert!(allowed);
/// # });
/// ```
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn TupleStore>,
    policy: Arc<dyn NamespacePolicy>,
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with the default configuration.
    pub fn new(store: Arc<dyn TupleStore>, policy: Arc<dyn NamespacePolicy>) -> Self {
        Self::with_config(store, policy, EngineConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    pub fn with_config(
        store: Arc<dyn TupleStore>,
        policy: Arc<dyn NamespacePolicy>,
        config: EngineConfig,
    ) -> Self {
        Self { store, policy, config }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds a check request: is `subject` related to `object` by
    /// `relation` in `namespace`?
    ///
    /// Returns `Ok(true)`/`Ok(false)` for a definitive answer. Denial is NOT
    /// an error; use [`require()`](CheckRequest::require) if it should be.
    /// Errors mean the question was not answered: the store failed, the
    /// depth bound truncated the search, or the deadline fired.
    pub fn check(
        &self,
        namespace: impl Into<String>,
        object: impl Into<String>,
        relation: impl Into<String>,
        subject: impl Into<Subject>,
    ) -> CheckRequest {
        CheckRequest {
            engine: self.clone(),
            triple: SubjectSet::new(namespace, object, relation),
            subject: subject.into(),
            max_depth: None,
            timeout: None,
            deadline: None,
        }
    }

    /// Builds an expand request: the full tree of subjects satisfying
    /// `relation` on `object` in `namespace`.
    pub fn expand(
        &self,
        namespace: impl Into<String>,
        object: impl Into<String>,
        relation: impl Into<String>,
    ) -> ExpandRequest {
        ExpandRequest {
            engine: self.clone(),
            triple: SubjectSet::new(namespace, object, relation),
            max_depth: None,
            timeout: None,
            deadline: None,
        }
    }

    fn resolve_deadline(
        &self,
        timeout: Option<Duration>,
        deadline: Option<Instant>,
    ) -> Option<Instant> {
        deadline.or_else(|| timeout.or(self.config.timeout).map(|t| Instant::now() + t))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("config", &self.config).finish_non_exhaustive()
    }
}

/// A builder for check requests.
///
/// Created by [`Engine::check()`]. Chain modifiers, then `.await` to execute.
#[must_use = "check requests do nothing until awaited"]
pub struct CheckRequest {
    engine: Engine,
    triple: SubjectSet,
    subject: Subject,
    max_depth: Option<u32>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
}

impl CheckRequest {
    /// Overrides the configured maximum traversal depth for this request.
    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets a deadline relative to now.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Converts this to a requiring check that returns an error on denial.
    ///
    /// Instead of `Ok(false)`, a denied check resolves to
    /// `Err(ErrorKind::PermissionDenied)`, so `?` can gate a handler.
    pub fn require(self) -> RequireCheckRequest {
        RequireCheckRequest { inner: self }
    }

    async fn execute(self) -> Result<bool, Error> {
        let deadline = self.engine.resolve_deadline(self.timeout, self.deadline);
        let max_depth = self.max_depth.unwrap_or(self.engine.config.max_depth);
        let traversal = Traversal::new(
            self.engine.store.as_ref(),
            self.engine.policy.as_ref(),
            &self.engine.config,
            deadline,
        );
        tracing::debug!(triple = %self.triple, subject = %self.subject, "check");
        traversal.check(self.triple, &self.subject, HashSet::new(), max_depth).await
    }
}

impl std::future::IntoFuture for CheckRequest {
    type Output = Result<bool, Error>;
    type IntoFuture =
        std::pin::Pin<Box<dyn std::future::Future<Output = Self::Output> + Send + 'static>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}

/// A check request that returns an error on denial.
///
/// Created by [`CheckRequest::require()`].
#[must_use = "check requests do nothing until awaited"]
pub struct RequireCheckRequest {
    inner: CheckRequest,
}

impl RequireCheckRequest {
    /// Overrides the configured maximum traversal depth for this request.
    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.inner.max_depth = Some(depth);
        self
    }

    /// Sets a deadline relative to now.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner.timeout = Some(timeout);
        self
    }

    async fn execute(self) -> Result<(), Error> {
        let triple = &self.inner.triple;
        let description = format!(
            "{} is not {} of {}:{}",
            self.inner.subject,
            triple.relation(),
            triple.namespace(),
            triple.object()
        );
        if self.inner.execute().await? {
            Ok(())
        } else {
            Err(Error::permission_denied(description))
        }
    }
}

impl std::future::IntoFuture for RequireCheckRequest {
    type Output = Result<(), Error>;
    type IntoFuture =
        std::pin::Pin<Box<dyn std::future::Future<Output = Self::Output> + Send + 'static>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}

/// A builder for expand requests.
///
/// Created by [`Engine::expand()`]. Chain modifiers, then `.await` to execute.
#[must_use = "expand requests do nothing until awaited"]
pub struct ExpandRequest {
    engine: Engine,
    triple: SubjectSet,
    max_depth: Option<u32>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
}

impl ExpandRequest {
    /// Overrides the configured maximum traversal depth for this request.
    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets a deadline relative to now.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    async fn execute(self) -> Result<ExpandNode, Error> {
        let deadline = self.engine.resolve_deadline(self.timeout, self.deadline);
        let max_depth = self.max_depth.unwrap_or(self.engine.config.max_depth);
        let traversal = Traversal::new(
            self.engine.store.as_ref(),
            self.engine.policy.as_ref(),
            &self.engine.config,
            deadline,
        );
        tracing::debug!(triple = %self.triple, "expand");
        traversal.expand(self.triple, HashSet::new(), max_depth).await
    }
}

impl std::future::IntoFuture for ExpandRequest {
    type Output = Result<ExpandNode, Error>;
    type IntoFuture =
        std::pin::Pin<Box<dyn std::future::Future<Output = Self::Output> + Send + 'static>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}
