//! Engine configuration.

use std::time::Duration;

/// Configuration for the check/expand engine.
///
/// ## Depth vs. cycles
///
/// The depth bound and the cycle guard are independent: cycles are resolved
/// by the per-path visited set and terminate with a definitive result, while
/// `max_depth` bounds genuinely deep (acyclic) indirection chains and fails
/// the request with `DepthExceeded` when hit.
///
/// ## Example
///
/// ```rust
/// use std::time::Duration;
///
/// use aclgraph::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .max_depth(8)
///     .max_fanout(4)
///     .timeout(Duration::from_millis(200))
///     .build();
/// assert_eq!(config.max_depth, 8);
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct EngineConfig {
    /// Maximum number of subject-set descents per traversal.
    #[builder(default = 32)]
    pub max_depth: u32,

    /// Maximum number of sibling subject-set descents evaluated concurrently
    /// at one node.
    #[builder(default = 16)]
    pub max_fanout: usize,

    /// Default per-request deadline, applied when a request sets none.
    pub timeout: Option<Duration>,

    /// Whether to memoize positive check results within one request.
    ///
    /// The cache is request-scoped and never shared across requests.
    #[builder(default = true)]
    pub memoize: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
