//! # Service Lifecycle
//!
//! > **Run one process as a supervised Windows service with three callbacks.**
//!
//! A service binary hands this crate a name, a `start` callback, a `stop` callback and
//! a log sink, then blocks in [`ServiceRuntime::run_and_wait`]. The crate speaks the
//! supervisor's protocol: it registers for control signals, reports every state change
//! with the right checkpoint, and turns any failure into a `Stopped` report with an
//! exit code the operator can read.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### One context, one lock
//!
//! Everything the controller knows lives in a single [`LifecycleContext`] behind a
//! mutex. The service main and every control signal take that lock for the whole
//! transition, including the user's callback. Two signals can never interleave, and a
//! signal that arrives mid-start waits for the start to finish.
//!
//! ### Failures are values
//!
//! A transition never propagates an error to the supervisor. Returned errors and panics
//! are caught at the callback boundary ([`handler::invoke`]) and folded into a
//! `Stopped` status:
//!
//! | What happened | Exit code |
//! |---------------|-----------|
//! | Callback returned `Err` | 1 |
//! | A status report failed | 1 |
//! | Callback panicked | 2 |
//!
//! ### The supervisor is a trait
//!
//! The controller only consumes the [`Supervisor`] trait. [`WindowsSupervisor`]
//! talks to the Service Control Manager; [`SimulatedSupervisor`] plays its part
//! in-process so the full lifecycle can be tested on any platform.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Vocabulary ([`model`])
//! States, control signals, the status record and its checkpoint policy.
//!
//! ### 2. The Controller ([`lifecycle`])
//! - **Role**: context, status reporting, transitions, signal dispatch, entry point.
//! - **Key items**: [`ServiceRuntime`], [`LifecycleContext`], [`run_transition`](lifecycle::run_transition).
//!
//! ### 3. The User's Side ([`handler`])
//! - **Role**: the callback contract, sync or async.
//! - **Key items**: [`ServiceHandler`], [`ServiceCallbacks`], [`BlockingHandler`].
//!
//! ### 4. The Other Side ([`supervisor`])
//! - **Role**: the boundary to the operating system and its test double.
//!
//! ### 5. Administration (`manager`, Windows only)
//! Install, uninstall, start and stop services from an administrator's process.
//!
//! ## 🚀 Quick Start
//!
//! ```rust,ignore
//! use service_lifecycle::{ServiceCallbacks, ServiceRuntime, WindowsSupervisor};
//!
//! fn main() -> Result<(), service_lifecycle::ServiceError> {
//!     service_lifecycle::setup_tracing();
//!     let callbacks = ServiceCallbacks::new(
//!         || server::start(),
//!         || server::stop(),
//!         |msg: &str| eprintln!("{msg}"),
//!     );
//!     ServiceRuntime::new(WindowsSupervisor::new()).run_and_wait("foo", callbacks)
//! }
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod lifecycle;
#[cfg(windows)]
pub mod manager;
pub mod model;
pub mod supervisor;

pub use config::{InstallConfig, RuntimeOptions};
pub use error::ServiceError;
pub use handler::{AsyncServiceHandler, BlockingHandler, ServiceCallbacks, ServiceHandler};
pub use lifecycle::{setup_tracing, setup_tracing_with_writer, LifecycleContext, ServiceRuntime};
pub use model::{ControlSignal, Disposition, ServiceState, StartType, StatusRecord};
pub use supervisor::{SimulatedSupervisor, Supervisor, SupervisorError};
#[cfg(windows)]
pub use supervisor::WindowsSupervisor;
