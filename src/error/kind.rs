//! Error kind enumeration for categorizing engine errors.

/// Categorization of engine errors.
///
/// This enum provides a stable interface for matching on error types, enabling
/// different handling strategies for different failure modes.
///
/// | ErrorKind          | Retriable | Meaning                                  |
/// |--------------------|-----------|------------------------------------------|
/// | `Lookup`           | Yes       | Tuple store failed (timeout, unavailable)|
/// | `DepthExceeded`    | No        | Traversal hit the depth bound            |
/// | `Cancelled`        | No        | Request deadline fired mid-traversal     |
/// | `PermissionDenied` | No        | `require()` on a denied check            |
/// | `InvalidArgument`  | No        | Malformed input (tuple syntax, config)   |
/// | `Internal`         | No        | Engine invariant violated                |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The tuple store collaborator failed.
    ///
    /// The engine never retries lookups itself; retry policy belongs to the
    /// storage client. A transient store failure must not be interpreted as
    /// "no tuples", so this is always surfaced to the caller.
    ///
    /// **Retriable** (by the caller, with backoff).
    #[error("lookup failed")]
    Lookup,

    /// Traversal hit the depth bound without resolving.
    ///
    /// Distinct from `Ok(false)`: the search was truncated, not exhausted.
    /// Authorization gates should deny by default on this, but must not cache
    /// it as a negative result.
    ///
    /// **Not retriable** without raising the depth limit.
    #[error("traversal depth exceeded")]
    DepthExceeded,

    /// The request deadline or cancellation fired mid-traversal.
    ///
    /// **Not retriable.** The operation was intentionally abandoned.
    #[error("cancelled")]
    Cancelled,

    /// A required check was denied.
    ///
    /// Only produced by [`require()`](crate::engine::CheckRequest::require),
    /// which converts `Ok(false)` into an error for `?`-style gating.
    ///
    /// **Not retriable.** Grant the relationship first.
    #[error("permission denied")]
    PermissionDenied,

    /// Malformed input: tuple syntax, empty fields, or invalid config.
    ///
    /// **Not retriable.** Fix the input.
    #[error("invalid argument")]
    InvalidArgument,

    /// An engine invariant was violated. Indicates a bug.
    ///
    /// **Not retriable.**
    #[error("internal error")]
    Internal,
}

impl ErrorKind {
    /// Returns `true` if this error kind is generally safe to retry.
    pub fn is_retriable(&self) -> bool {
        matches!(self, ErrorKind::Lookup)
    }
}
