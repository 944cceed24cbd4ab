//! Errors reported by supervisor adapters.

use thiserror::Error;

/// Failures at the supervisor boundary.
///
/// Adapters flatten platform errors into a message; the controller only needs to know
/// which call failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SupervisorError {
    /// The process is not running under the supervisor (or the dispatcher refused it).
    #[error("service dispatcher unavailable: {0}")]
    Unavailable(String),

    /// The control receiver could not be registered.
    #[error("control handler registration failed: {0}")]
    Registration(String),

    /// A dispatcher was already entered in this process.
    #[error("service dispatcher already entered in this process")]
    AlreadyDispatched,

    /// A status record could not be published.
    #[error("status publication failed: {0}")]
    Publish(String),
}
