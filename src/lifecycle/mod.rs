//! The lifecycle controller.
//!
//! This module contains everything between the supervisor and the user's callbacks:
//!
//! - **Context**: the one shared record of identity, callbacks and status
//! - **Reporting**: checkpoint bookkeeping and status publication
//! - **Transitions**: `pending → callback → target`, with failures folded into `Stopped`
//! - **Dispatch**: the control signal table and the blocking entry point
//! - **Observability**: tracing setup for service binaries
//!
//! # Main Components
//!
//! - [`ServiceRuntime`] - binds a service to a supervisor and runs it
//! - [`LifecycleContext`] - the shared state, reachable only through its lock
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod context;
pub mod dispatch;
pub mod entry;
pub mod reporter;
pub mod tracing;
pub mod transition;

pub use context::{LifecycleContext, SharedContext};
pub use dispatch::{on_control, route};
pub use entry::ServiceRuntime;
pub use self::tracing::*;
pub use transition::run_transition;
