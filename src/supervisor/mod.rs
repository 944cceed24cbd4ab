//! The supervisor boundary.
//!
//! The controller never calls the operating system directly. It consumes the three
//! operations of the [`Supervisor`] trait and hands the supervisor two callbacks: a
//! one-time [`MainEntry`] and a [`ControlReceiver`] invoked for every control signal.
//!
//! # Adapters
//!
//! - [`SimulatedSupervisor`](simulated::SimulatedSupervisor) runs the dispatch loop
//!   in-process, injects synthetic signals and records every published status. It is
//!   the harness the lifecycle tests run against and works on every platform.
//! - `WindowsSupervisor` (Windows only) forwards to the Service Control Manager through
//!   the `windows-service` crate.

pub mod error;
pub mod simulated;
pub mod slot;
#[cfg(windows)]
pub mod windows;

pub use error::SupervisorError;
pub use simulated::{SimulatedHandle, SimulatedSupervisor};
pub use slot::DispatchSlot;
#[cfg(windows)]
pub use windows::{WindowsStatusHandle, WindowsSupervisor};

use crate::error::ServiceError;
use crate::model::{ControlSignal, Disposition, ServiceIdentity, StatusRecord};

/// Callback the supervisor invokes for every control signal.
pub type ControlReceiver = Box<dyn FnMut(ControlSignal) -> Disposition + Send + 'static>;

/// One-time callback the supervisor invokes once the dispatch loop is running.
pub type MainEntry = Box<dyn FnOnce() + Send + 'static>;

/// Addressing token issued by the supervisor for status reports.
pub trait StatusPublisher: Send {
    fn publish(&self, status: &StatusRecord) -> Result<(), SupervisorError>;
}

/// The operations the controller consumes from the service supervisor.
pub trait Supervisor: Send + Sync + 'static {
    type Handle: StatusPublisher + 'static;

    /// Enters the supervisor's dispatch loop; blocks until the service has stopped.
    ///
    /// The supervisor calls `main` exactly once, on a thread it owns. A second call in
    /// the same process fails with [`SupervisorError::AlreadyDispatched`].
    fn run_dispatcher(&self, identity: &ServiceIdentity, main: MainEntry)
        -> Result<(), SupervisorError>;

    /// Installs `receiver` as the handler for control signals and returns the handle
    /// used to publish status.
    fn register_control_receiver(
        &self,
        identity: &ServiceIdentity,
        receiver: ControlReceiver,
    ) -> Result<Self::Handle, SupervisorError>;

    /// Ends the process after an unrecoverable registration failure.
    ///
    /// The default exits with status -1. Only test adapters override this.
    fn terminate(&self, error: &ServiceError) {
        tracing::error!(error = %error, label = error.as_label(), "Terminating process");
        std::process::exit(-1)
    }
}
