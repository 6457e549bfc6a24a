//!
//! Defines error types for the authorization engine.

/// Errors produced by an authorization check.
///
/// `PermissionDenied` and `NotFound` are only produced by
/// [`crate::policy::Verdict::into_result`]; the checks themselves report
/// those outcomes as verdicts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// A required identifier (such as the parent resource id) is missing.
    /// This is a client input error, not an authorization outcome.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The actor lacks the ability required for the action.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    /// The resource must appear absent to the actor.
    #[error("Not found")]
    NotFound,
    /// The access entry store failed. Propagated as-is, never retried here.
    #[error("Access store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors reported by an [`crate::store::AccessStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Access store unavailable: {0}")]
    Unavailable(String),
    #[error("Inconsistent access store state: {0}")]
    Inconsistent(String),
}

/// Errors raised while loading [`crate::config::AuthzSettings`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(String),
    #[error("Failed to parse settings: {0}")]
    Parse(String),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}
