//! # Dispatch Entry
//!
//! [`ServiceRuntime::run_and_wait`] is the one call a service binary makes. It blocks
//! the calling thread inside the supervisor's dispatch loop until the service stops.
//!
//! ```text
//! caller                  supervisor thread(s)
//! ──────                  ────────────────────
//! run_and_wait("foo")
//!   initialize context
//!   run_dispatcher ───▶  main entry
//!                          register control receiver ─▶ attach handle
//!                          StartPending → start() → Running
//!                        control receiver (per signal)
//!                          StopPending → stop() → Stopped
//!   ◀── returns
//! ```

use crate::config::RuntimeOptions;
use crate::error::ServiceError;
use crate::handler::{Action, ServiceHandler};
use crate::lifecycle::context::{self, LifecycleContext, SharedContext};
use crate::lifecycle::{dispatch, transition};
use crate::model::{ControlSignal, ServiceState};
use crate::supervisor::{ControlReceiver, Supervisor, SupervisorError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, info_span};

/// Binds one service to a supervisor.
pub struct ServiceRuntime<S: Supervisor> {
    supervisor: Arc<S>,
    context: SharedContext,
    options: RuntimeOptions,
}

impl<S: Supervisor> Clone for ServiceRuntime<S> {
    fn clone(&self) -> Self {
        Self {
            supervisor: Arc::clone(&self.supervisor),
            context: Arc::clone(&self.context),
            options: self.options.clone(),
        }
    }
}

impl<S: Supervisor> ServiceRuntime<S> {
    pub fn new(supervisor: S) -> Self {
        Self {
            supervisor: Arc::new(supervisor),
            context: LifecycleContext::shared(),
            options: RuntimeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RuntimeOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the wait hint sent with every status report.
    pub fn with_wait_hint(mut self, wait_hint: Duration) -> Self {
        self.options.wait_hint = wait_hint;
        self
    }

    /// The shared lifecycle context. Clones of this runtime share it.
    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    /// Runs `name` under the supervisor and blocks until the dispatch loop returns.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::AlreadyStarted`] if this runtime (or a clone) already ran a
    ///   service, or another runtime already entered the supervisor's dispatcher in
    ///   this process. The existing service is not disturbed.
    /// - [`ServiceError::DispatchFailed`] if the supervisor's dispatch loop could not be
    ///   entered, e.g. the process was not launched by the service manager.
    ///
    /// Failures after the service main has started are never returned: they end in a
    /// `Stopped` report and a line in the handler's log.
    pub fn run_and_wait(
        &self,
        name: &str,
        handler: impl ServiceHandler,
    ) -> Result<(), ServiceError> {
        context::lock(&self.context).initialize(name, Box::new(handler), &self.options)?;
        info!(service = name, "Starting service dispatcher");

        let identity = context::lock(&self.context).identity()?.clone();
        let supervisor = Arc::clone(&self.supervisor);
        let context = Arc::clone(&self.context);
        let main = Box::new(move || service_main(supervisor.as_ref(), &context));

        self.supervisor
            .run_dispatcher(&identity, main)
            .map_err(|source| {
                let err = match source {
                    SupervisorError::AlreadyDispatched => ServiceError::AlreadyStarted,
                    source => ServiceError::DispatchFailed {
                        name: name.to_string(),
                        source,
                    },
                };
                error!(error = %err, "Dispatcher could not be entered");
                err
            })?;

        info!(service = name, "Service dispatcher returned");
        Ok(())
    }
}

/// The one-time main entry, run on a supervisor thread.
fn service_main<S: Supervisor>(supervisor: &S, shared: &SharedContext) {
    let mut ctx = context::lock(shared);
    let identity = match ctx.identity() {
        Ok(identity) => identity.clone(),
        Err(err) => {
            error!(error = %err, "Service main entered without a context");
            return;
        }
    };
    let _span = info_span!("service_main", service = %identity).entered();

    let registered = supervisor
        .register_control_receiver(&identity, control_receiver(Arc::clone(shared)))
        .and_then(|handle| {
            ctx.attach_handle(Box::new(handle))
                .map_err(|err| SupervisorError::Registration(err.to_string()))
        });

    if let Err(source) = registered {
        let fatal = ServiceError::RegistrationFatal {
            name: identity.name().to_string(),
            source,
        };
        ctx.log(&fatal.to_string());
        error!(error = %fatal, "Control handler registration failed");
        drop(ctx);
        supervisor.terminate(&fatal);
        return;
    }

    transition::run_transition(
        &mut ctx,
        ServiceState::StartPending,
        ServiceState::Running,
        Action::Start,
    );
}

/// Receiver handed to the supervisor; serializes each signal behind the context lock.
fn control_receiver(shared: SharedContext) -> ControlReceiver {
    Box::new(move |signal: ControlSignal| {
        let mut ctx = context::lock(&shared);
        dispatch::on_control(&mut ctx, signal)
    })
}
