//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//! The controller itself emits spans and events at every step; the service's own log
//! sink ([`ServiceHandler::log`](crate::handler::ServiceHandler::log)) only receives
//! the diagnostics that end a transition in `Stopped`.
//!
//! ## Configuration
//!
//! - **Compact format** that hides the module prefix (`with_target(false)`)
//! - **Configurable log levels** via the `RUST_LOG` environment variable
//!
//! A service started by the service manager has no console. Use
//! [`setup_tracing_with_writer`] to send output to a file instead.
//!
//! ## What Gets Traced
//!
//! - **Dispatcher**: entry and return, with the service name
//! - **Service main**: a `service_main` span around registration and the start transition
//! - **Control signals**: a `control` span per signal, ignored signals at `debug`
//! - **Status reports**: state, checkpoint and exit code of every publication at `debug`
//! - **Failures**: the failed transition with its exit code and error label
//!
//! ## Usage Examples
//!
//! ```bash
//! # Transitions and failures
//! RUST_LOG=info my-service.exe
//!
//! # Every status report and control signal
//! RUST_LOG=debug my-service.exe
//!
//! # Filter to the controller
//! RUST_LOG=service_lifecycle=debug my-service.exe
//! ```
//!
//! ## Trace Example
//!
//! **With `RUST_LOG=debug`**, a start followed by a stop:
//!
//! ```text
//! INFO Starting service dispatcher service="foo"
//! DEBUG service_main: Control receiver registered service=foo
//! DEBUG service_main: Status reported service=foo state=StartPending checkpoint=1 exit_code=0
//! DEBUG service_main: Status reported service=foo state=Running checkpoint=0 exit_code=0
//! INFO service_main: Transition complete pending=StartPending target=Running
//! DEBUG control: Status reported service=foo state=StopPending checkpoint=1 exit_code=0
//! DEBUG control: Status reported service=foo state=Stopped checkpoint=0 exit_code=0
//! INFO control: Transition complete pending=StopPending target=Stopped
//! INFO Service dispatcher returned service="foo"
//! ```

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Initializes tracing to stdout.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false) // Service name is a field on every event
        .compact() // Shows spans inline (e.g., "service_main:")
        .init();
}

/// Initializes tracing to `writer`, without ANSI colors.
///
/// Returns `false` if a global subscriber was already installed.
pub fn setup_tracing_with_writer<W>(writer: W) -> bool
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_ansi(false)
        .compact()
        .with_writer(writer)
        .try_init()
        .is_ok()
}
