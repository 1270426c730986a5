//! Main error type for the aclgraph engine.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::ErrorKind;

/// The primary error type for aclgraph operations.
///
/// `Error` carries a [`kind()`](Error::kind) for `match`-based handling, a
/// human-readable message, and an optional underlying cause.
///
/// ## Example
///
/// ```rust
/// use aclgraph::{Error, ErrorKind};
///
/// fn handle_error(err: Error) {
///     match err.kind() {
///         ErrorKind::DepthExceeded => {
///             // Inconclusive: deny by default, but do not cache as a deny.
///             eprintln!("search truncated: {}", err);
///         }
///         kind if kind.is_retriable() => {
///             eprintln!("transient store failure, will retry: {}", err);
///         }
///         _ => {
///             eprintln!("permanent error: {}", err);
///         }
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    /// The error category.
    kind: ErrorKind,

    /// Human-readable error message.
    message: Cow<'static, str>,

    /// The underlying error, if any.
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aclgraph::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::InvalidArgument, "relation cannot be empty");
    /// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self { kind, message: message.into(), source: None }
    }

    /// Creates an error from a kind with a default message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::Lookup => "tuple lookup failed",
            ErrorKind::DepthExceeded => "traversal exceeded the maximum depth",
            ErrorKind::Cancelled => "request cancelled",
            ErrorKind::PermissionDenied => "subject is not related to object",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::Internal => "internal engine error",
        };
        Self::new(kind, message)
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns `true` if this error is generally safe to retry.
    ///
    /// Equivalent to `self.kind().is_retriable()`.
    #[inline]
    pub fn is_retriable(&self) -> bool {
        self.kind.is_retriable()
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors for the engine's error taxonomy

    /// Creates a lookup error (the tuple store failed).
    pub fn lookup(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Lookup, message)
    }

    /// Creates a depth-exceeded error.
    pub fn depth_exceeded(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::DepthExceeded, message)
    }

    /// Creates a cancelled error.
    pub fn cancelled() -> Self {
        Self::from_kind(ErrorKind::Cancelled)
    }

    /// Creates a permission-denied error.
    pub fn permission_denied(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::invalid_argument(format!("JSON error: {}", err)).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_new() {
        let err = Error::new(ErrorKind::InvalidArgument, "test message");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("test message"));
    }

    #[test]
    fn test_error_from_kind() {
        let err = Error::from_kind(ErrorKind::DepthExceeded);
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
        assert!(err.to_string().contains("maximum depth"));
    }

    #[test]
    fn test_error_with_source() {
        let io_err = std::io::Error::other("underlying error");
        let err = Error::lookup("store unavailable").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_convenience_constructors() {
        assert_eq!(Error::lookup("test").kind(), ErrorKind::Lookup);
        assert_eq!(Error::depth_exceeded("test").kind(), ErrorKind::DepthExceeded);
        assert_eq!(Error::cancelled().kind(), ErrorKind::Cancelled);
        assert_eq!(Error::permission_denied("test").kind(), ErrorKind::PermissionDenied);
        assert_eq!(Error::invalid_argument("test").kind(), ErrorKind::InvalidArgument);
        assert_eq!(Error::internal("test").kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_is_retriable() {
        assert!(Error::lookup("down").is_retriable());
        assert!(!Error::cancelled().is_retriable());
    }

    #[test]
    fn test_from_error_kind() {
        let err: Error = ErrorKind::Cancelled.into();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_display_format() {
        let err = Error::depth_exceeded("gave up after 3 hops");
        let display = err.to_string();
        assert!(display.contains("traversal depth exceeded"));
        assert!(display.contains("gave up after 3 hops"));
    }
}
