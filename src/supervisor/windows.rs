//! # Windows Service Control Manager adapter
//!
//! Forwards the [`Supervisor`] operations to the SCM through the `windows-service` crate.
//!
//! The SCM calls the service main through a plain `extern "system"` function that
//! carries no user data, so the one-time [`MainEntry`] is parked in the process-wide
//! [`DispatchSlot`] for the trampoline to pick up. The slot also refuses a second
//! dispatcher in the same process. Everything else (identity, callbacks, status)
//! stays in the lifecycle context.

use crate::model::{ControlSignal, Disposition, ServiceIdentity, ServiceState, StatusRecord};
use crate::supervisor::{
    ControlReceiver, DispatchSlot, MainEntry, StatusPublisher, Supervisor, SupervisorError,
};
use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use tracing::{debug, error};
use windows_service::service::{
    self as win, ServiceControl, ServiceControlAccept, ServiceExitCode, ServiceStatus, ServiceType,
};
use windows_service::service_control_handler::{
    self, ServiceControlHandlerResult, ServiceStatusHandle,
};
use windows_service::{define_windows_service, service_dispatcher};

static SLOT: DispatchSlot = DispatchSlot::new();

define_windows_service!(ffi_service_main, service_main);

fn service_main(_arguments: Vec<OsString>) {
    match SLOT.take_entry() {
        Some(main) => main(),
        None => error!("Service main invoked without a pending entry"),
    }
}

/// The real supervisor. Only one dispatcher may run per process.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsSupervisor;

impl WindowsSupervisor {
    pub fn new() -> Self {
        Self
    }
}

impl Supervisor for WindowsSupervisor {
    type Handle = WindowsStatusHandle;

    fn run_dispatcher(
        &self,
        identity: &ServiceIdentity,
        main: MainEntry,
    ) -> Result<(), SupervisorError> {
        SLOT.claim(main)?;
        service_dispatcher::start(service_name(identity), ffi_service_main).map_err(|e| {
            SLOT.release();
            SupervisorError::Unavailable(e.to_string())
        })
    }

    fn register_control_receiver(
        &self,
        identity: &ServiceIdentity,
        mut receiver: ControlReceiver,
    ) -> Result<WindowsStatusHandle, SupervisorError> {
        let handle = service_control_handler::register(service_name(identity), move |control| {
            let signal = to_signal(control);
            match receiver(signal) {
                Disposition::Handled => ServiceControlHandlerResult::NoError,
                // Interrogate must always succeed; the SCM re-reads the last status.
                Disposition::Ignored if signal == ControlSignal::Interrogate => {
                    ServiceControlHandlerResult::NoError
                }
                Disposition::Ignored => ServiceControlHandlerResult::NotImplemented,
            }
        })
        .map_err(|e| SupervisorError::Registration(e.to_string()))?;
        debug!(service = %identity, "Control handler registered with the SCM");
        Ok(WindowsStatusHandle(handle))
    }
}

fn service_name(identity: &ServiceIdentity) -> OsString {
    OsString::from_wide(identity.wide_name_trimmed())
}

fn to_signal(control: ServiceControl) -> ControlSignal {
    match control {
        ServiceControl::Stop => ControlSignal::Stop,
        ServiceControl::Pause => ControlSignal::Pause,
        ServiceControl::Continue => ControlSignal::Continue,
        ServiceControl::Interrogate => ControlSignal::Interrogate,
        ServiceControl::Shutdown => ControlSignal::Shutdown,
        other => ControlSignal::from_raw(other.raw_service_control_type()),
    }
}

/// Status handle issued by the SCM.
pub struct WindowsStatusHandle(ServiceStatusHandle);

impl StatusPublisher for WindowsStatusHandle {
    fn publish(&self, status: &StatusRecord) -> Result<(), SupervisorError> {
        self.0
            .set_service_status(to_service_status(status))
            .map_err(|e| SupervisorError::Publish(e.to_string()))
    }
}

fn to_service_status(status: &StatusRecord) -> ServiceStatus {
    ServiceStatus {
        service_type: ServiceType::OWN_PROCESS,
        current_state: match status.state {
            ServiceState::Stopped => win::ServiceState::Stopped,
            ServiceState::StartPending => win::ServiceState::StartPending,
            ServiceState::StopPending => win::ServiceState::StopPending,
            ServiceState::Running => win::ServiceState::Running,
            ServiceState::ContinuePending => win::ServiceState::ContinuePending,
            ServiceState::PausePending => win::ServiceState::PausePending,
            ServiceState::Paused => win::ServiceState::Paused,
        },
        controls_accepted: ServiceControlAccept::from_bits_truncate(status.controls_accepted),
        exit_code: ServiceExitCode::Win32(status.exit_code),
        checkpoint: status.checkpoint,
        wait_hint: status.wait_hint,
        process_id: None,
    }
}
