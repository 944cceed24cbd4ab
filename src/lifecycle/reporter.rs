//! # Status Reporter
//!
//! Translates a lifecycle state into the record the supervisor expects and publishes it.

use crate::error::ServiceError;
use crate::lifecycle::context::LifecycleContext;
use crate::model::{ServiceState, EXIT_OK};
use crate::supervisor::SupervisorError;
use tracing::{debug, warn};

impl LifecycleContext {
    /// Publishes `state` with `exit_code`.
    ///
    /// A failed publication is an error only for ordinary reports. While reporting an
    /// error (`exit_code != 0`) the controller is already on its terminal path, so the
    /// failure is logged and swallowed.
    pub fn report(&mut self, state: ServiceState, exit_code: u32) -> Result<(), ServiceError> {
        let inner = self.populated_mut()?;
        inner.status.advance(state, exit_code);
        let published = match inner.handle.as_deref() {
            Some(handle) => handle.publish(&inner.status),
            None => Err(SupervisorError::Publish("no status handle attached".into())),
        };

        let service = &inner.identity;
        let checkpoint = inner.status.checkpoint;
        match published {
            Ok(()) => {
                debug!(%service, ?state, checkpoint, exit_code, "Status reported");
                Ok(())
            }
            Err(source) if exit_code == EXIT_OK => Err(ServiceError::StatusReportFailed { state, source }),
            Err(source) => {
                warn!(%service, ?state, exit_code, error = %source, "Error status could not be reported");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeOptions;
    use crate::handler::{CallbackError, ServiceHandler};
    use crate::supervisor::SimulatedSupervisor;

    struct Idle;

    impl ServiceHandler for Idle {
        fn start(&mut self) -> Result<(), CallbackError> {
            Ok(())
        }

        fn stop(&mut self) -> Result<(), CallbackError> {
            Ok(())
        }
    }

    fn attached(supervisor: &SimulatedSupervisor) -> LifecycleContext {
        let mut ctx = LifecycleContext::new();
        ctx.initialize("foo", Box::new(Idle), &RuntimeOptions::default())
            .unwrap();
        ctx.attach_handle(Box::new(supervisor.handle())).unwrap();
        ctx
    }

    #[test]
    fn test_checkpoint_sequence_reaches_supervisor() {
        let supervisor = SimulatedSupervisor::new();
        let mut ctx = attached(&supervisor);

        ctx.report(ServiceState::StartPending, EXIT_OK).unwrap();
        ctx.report(ServiceState::Running, EXIT_OK).unwrap();
        ctx.report(ServiceState::StopPending, EXIT_OK).unwrap();
        ctx.report(ServiceState::Stopped, EXIT_OK).unwrap();

        let checkpoints: Vec<u32> = supervisor.reports().iter().map(|r| r.checkpoint).collect();
        assert_eq!(checkpoints, vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_failed_ordinary_report_is_an_error() {
        let supervisor = SimulatedSupervisor::new();
        supervisor.fail_publish(ServiceState::Running);
        let mut ctx = attached(&supervisor);

        let err = ctx.report(ServiceState::Running, EXIT_OK).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::StatusReportFailed {
                state: ServiceState::Running,
                ..
            }
        ));
    }

    #[test]
    fn test_failed_error_report_is_swallowed() {
        let supervisor = SimulatedSupervisor::new();
        supervisor.fail_publish(ServiceState::Stopped);
        let mut ctx = attached(&supervisor);

        ctx.report(ServiceState::Stopped, 1).unwrap();
        assert_eq!(supervisor.failed_publishes().len(), 1);
        // The record itself still moved on.
        assert_eq!(ctx.status().unwrap().exit_code, 1);
    }

    #[test]
    fn test_report_without_handle_fails() {
        let mut ctx = LifecycleContext::new();
        ctx.initialize("foo", Box::new(Idle), &RuntimeOptions::default())
            .unwrap();
        let err = ctx.report(ServiceState::StartPending, EXIT_OK).unwrap_err();
        assert!(matches!(err, ServiceError::StatusReportFailed { .. }));
    }
}
