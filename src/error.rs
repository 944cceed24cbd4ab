//! # Controller Errors
//!
//! Errors raised synchronously to the caller of the controller (initialization,
//! dispatcher registration, configuration parsing) share one enum with the failures
//! that the transition executor absorbs. The latter never reach a caller: they are
//! turned into a log line and a `Stopped` report whose exit code comes from
//! [`ServiceError::exit_code`].

use crate::model::ServiceState;
use crate::supervisor::SupervisorError;
use thiserror::Error;

/// Exit code reported for a recognized failure (a returned error, a failed report).
pub const EXIT_RECOGNIZED_FAILURE: u32 = 1;
/// Exit code reported when a callback failed in a way nobody anticipated (a panic).
pub const EXIT_UNRECOGNIZED_FAILURE: u32 = 2;

/// Errors produced by the service lifecycle controller.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The entry point was called a second time in this process.
    #[error("Service start attempt was already done in this process")]
    AlreadyStarted,

    /// An enumerated option (e.g. the start type) was not recognized.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Publishing a non-error status to the supervisor failed.
    #[error("Error changing status to: [{state}], error: [{source}]")]
    StatusReportFailed {
        state: ServiceState,
        #[source]
        source: SupervisorError,
    },

    /// The supervisor's dispatch loop could not be entered.
    #[error("Error starting service, name: [{name}], error: [{source}]")]
    DispatchFailed {
        name: String,
        #[source]
        source: SupervisorError,
    },

    /// The control receiver could not be registered from the one-time main entry.
    #[error("Fatal error registering control handler, name: [{name}], error: [{source}]")]
    RegistrationFatal {
        name: String,
        #[source]
        source: SupervisorError,
    },

    /// A start or stop callback failed.
    #[error("{message}")]
    UserCallbackFailed { message: String, recognized: bool },

    /// A status handle was attached twice.
    #[error("Status handle is already attached")]
    HandleAlreadyAttached,

    /// The lifecycle context was used before `initialize`.
    #[error("Lifecycle context is not initialized")]
    NotInitialized,

    /// A service manager operation (install, uninstall, start, stop) failed.
    #[error("{operation} failed, name: [{name}], error: [{reason}]")]
    ManagerFailed {
        operation: &'static str,
        name: String,
        reason: String,
    },
}

impl ServiceError {
    /// Exit code to report with the terminal `Stopped` status for this failure.
    pub fn exit_code(&self) -> u32 {
        match self {
            ServiceError::UserCallbackFailed {
                recognized: false, ..
            } => EXIT_UNRECOGNIZED_FAILURE,
            _ => EXIT_RECOGNIZED_FAILURE,
        }
    }

    /// Short stable label (snake_case) for log fields.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::AlreadyStarted => "already_started",
            ServiceError::InvalidConfiguration(_) => "invalid_configuration",
            ServiceError::StatusReportFailed { .. } => "status_report_failed",
            ServiceError::DispatchFailed { .. } => "dispatch_failed",
            ServiceError::RegistrationFatal { .. } => "registration_fatal",
            ServiceError::UserCallbackFailed { .. } => "user_callback_failed",
            ServiceError::HandleAlreadyAttached => "handle_already_attached",
            ServiceError::NotInitialized => "not_initialized",
            ServiceError::ManagerFailed { .. } => "manager_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_distinguish_unrecognized_failures() {
        let recognized = ServiceError::UserCallbackFailed {
            message: "disk full".into(),
            recognized: true,
        };
        let unrecognized = ServiceError::UserCallbackFailed {
            message: String::new(),
            recognized: false,
        };
        let report = ServiceError::StatusReportFailed {
            state: ServiceState::Running,
            source: SupervisorError::Publish("handle closed".into()),
        };
        assert_eq!(recognized.exit_code(), 1);
        assert_eq!(unrecognized.exit_code(), 2);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_status_report_message_carries_state_code() {
        let err = ServiceError::StatusReportFailed {
            state: ServiceState::Running,
            source: SupervisorError::Publish("handle closed".into()),
        };
        assert_eq!(
            err.to_string(),
            "Error changing status to: [4], error: [status publication failed: handle closed]"
        );
        assert_eq!(err.as_label(), "status_report_failed");
    }
}
