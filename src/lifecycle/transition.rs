//! # Transition Executor
//!
//! Every transition has the same shape: report the pending state, run one callback,
//! report the target state. If any of the three steps fails the service is reported
//! `Stopped` with an exit code, and the caller's log sink gets a diagnostic. Nothing
//! escapes: the supervisor must always hear either "made it" or "died", because
//! silence looks like a hang.
//!
//! | Failure | Exit code |
//! |---------|-----------|
//! | Callback returned an error | 1 |
//! | Pending or target status could not be published | 1 |
//! | Callback panicked | 2 |

use crate::error::ServiceError;
use crate::handler::{self, Action, CallbackOutcome};
use crate::lifecycle::context::LifecycleContext;
use crate::model::{ServiceState, EXIT_OK};
use tracing::{error, info, warn};

/// Runs `pending → action → target`; every failure ends in a `Stopped` report.
pub fn run_transition(
    ctx: &mut LifecycleContext,
    pending: ServiceState,
    target: ServiceState,
    action: Action,
) {
    let err = match attempt(ctx, pending, target, action) {
        Ok(()) => {
            info!(?pending, ?target, "Transition complete");
            return;
        }
        Err(err) => err,
    };

    let exit_code = err.exit_code();
    let trailer = format!(
        "Error {} service, pending: [{}], target: [{}]",
        action.verb(),
        pending,
        target
    );
    let message = match &err {
        ServiceError::UserCallbackFailed {
            recognized: false, ..
        } => trailer,
        other => format!("{other}\n{trailer}"),
    };
    error!(?pending, ?target, exit_code, label = err.as_label(), error = %err, "Transition failed");
    ctx.log(&message);

    if let Err(report_err) = ctx.report(ServiceState::Stopped, exit_code) {
        warn!(error = %report_err, "Terminal status could not be reported");
    }
}

fn attempt(
    ctx: &mut LifecycleContext,
    pending: ServiceState,
    target: ServiceState,
    action: Action,
) -> Result<(), ServiceError> {
    ctx.report(pending, EXIT_OK)?;
    match handler::invoke(ctx.handler_mut()?, action) {
        CallbackOutcome::Completed => {}
        CallbackOutcome::Failed(message) => {
            return Err(ServiceError::UserCallbackFailed {
                message,
                recognized: true,
            });
        }
        CallbackOutcome::Panicked(payload) => {
            return Err(ServiceError::UserCallbackFailed {
                message: payload.unwrap_or_default(),
                recognized: false,
            });
        }
    }
    ctx.report(target, EXIT_OK)
}
