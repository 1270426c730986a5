//! Error types for the aclgraph engine.
//!
//! The engine distinguishes three terminal failure kinds from an ordinary
//! negative answer:
//!
//! - [`ErrorKind::Lookup`]: the tuple store failed; propagated verbatim
//! - [`ErrorKind::DepthExceeded`]: traversal truncated before resolution
//! - [`ErrorKind::Cancelled`]: the request deadline fired mid-traversal
//!
//! ## Key Invariant
//!
//! `check()` returns `Ok(false)` for "not related", not `Err`. An error means
//! the question was *not answered*: a truncated or failed search must never be
//! confused with a definitive deny, since callers cache and alert on the two
//! differently.

mod core;
mod kind;

pub use self::core::Error;
pub use self::kind::ErrorKind;

/// A specialized `Result` type for aclgraph operations.
pub type Result<T> = std::result::Result<T, Error>;
