//! The user's side of the lifecycle: what to do on start, on stop, and where to send
//! diagnostics.
//!
//! # Callback contract
//!
//! `start` and `stop` run on a supervisor-owned thread **while the controller's lock is
//! held**. A callback that blocks stalls every later control signal until it returns,
//! and the supervisor will eventually treat the service as hung. Callbacks should hand
//! long-running work to their own threads (or use [`BlockingHandler`] to drive an async
//! runtime) and return promptly.
//!
//! Failures are values, not unwinding:
//! - returning `Err` is a *recognized* failure, reported as exit code 1;
//! - panicking is an *unrecognized* failure, caught at the boundary and reported as
//!   exit code 2.

pub mod blocking;

pub use blocking::{AsyncServiceHandler, BlockingHandler};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Error type returned by lifecycle callbacks.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Callbacks driven by the lifecycle controller.
pub trait ServiceHandler: Send + 'static {
    /// Called on start and on continue.
    fn start(&mut self) -> Result<(), CallbackError>;

    /// Called on stop, pause and shutdown.
    fn stop(&mut self) -> Result<(), CallbackError>;

    /// Receives every diagnostic produced by the controller. Must not fail.
    fn log(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Which callback a transition runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
}

impl Action {
    /// Verb used in diagnostics ("Error starting service", "Error stopping service").
    pub fn verb(self) -> &'static str {
        match self {
            Action::Start => "starting",
            Action::Stop => "stopping",
        }
    }
}

/// Result of invoking a callback behind the panic boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Completed,
    Failed(String),
    Panicked(Option<String>),
}

/// Runs `action` on `handler`, converting both errors and panics into values.
pub fn invoke(handler: &mut dyn ServiceHandler, action: Action) -> CallbackOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| match action {
        Action::Start => handler.start(),
        Action::Stop => handler.stop(),
    }));
    match result {
        Ok(Ok(())) => CallbackOutcome::Completed,
        Ok(Err(e)) => CallbackOutcome::Failed(e.to_string()),
        Err(payload) => CallbackOutcome::Panicked(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(s) = payload.downcast_ref::<&str>() {
        Some((*s).to_string())
    } else {
        payload.downcast_ref::<String>().cloned()
    }
}

// =============================================================================
// CLOSURE ADAPTER
// =============================================================================

/// A [`ServiceHandler`] built from three closures.
///
/// ```rust
/// use service_lifecycle::handler::{ServiceCallbacks, CallbackError};
///
/// let callbacks = ServiceCallbacks::new(
///     || -> Result<(), CallbackError> { Ok(()) },
///     || -> Result<(), CallbackError> { Ok(()) },
///     |message: &str| eprintln!("{message}"),
/// );
/// # let _ = callbacks;
/// ```
pub struct ServiceCallbacks<Start, Stop, Log> {
    start: Start,
    stop: Stop,
    log: Log,
}

impl<Start, Stop, Log, E1, E2> ServiceCallbacks<Start, Stop, Log>
where
    Start: FnMut() -> Result<(), E1> + Send + 'static,
    Stop: FnMut() -> Result<(), E2> + Send + 'static,
    Log: Fn(&str) + Send + 'static,
    E1: Into<CallbackError>,
    E2: Into<CallbackError>,
{
    pub fn new(start: Start, stop: Stop, log: Log) -> Self {
        Self { start, stop, log }
    }
}

impl<Start, Stop, Log, E1, E2> ServiceHandler for ServiceCallbacks<Start, Stop, Log>
where
    Start: FnMut() -> Result<(), E1> + Send + 'static,
    Stop: FnMut() -> Result<(), E2> + Send + 'static,
    Log: Fn(&str) + Send + 'static,
    E1: Into<CallbackError>,
    E2: Into<CallbackError>,
{
    fn start(&mut self) -> Result<(), CallbackError> {
        (self.start)().map_err(Into::into)
    }

    fn stop(&mut self) -> Result<(), CallbackError> {
        (self.stop)().map_err(Into::into)
    }

    fn log(&self, message: &str) {
        (self.log)(message)
    }
}
