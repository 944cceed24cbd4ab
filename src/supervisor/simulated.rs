//! # Simulated Supervisor
//!
//! An in-process stand-in for the Service Control Manager. It plays the supervisor's
//! side of the protocol: it runs the dispatch loop, calls the one-time main entry on a
//! thread it owns, routes injected control signals to the registered receiver and
//! records every status the controller publishes.
//!
//! ## When to use it
//!
//! | Need | SimulatedSupervisor | WindowsSupervisor |
//! |------|---------------------|-------------------|
//! | **Runs without an installed service** | Yes | No |
//! | **Deterministic signal order** | Yes (one at a time) | Decided by the OS |
//! | **Inspect every published status** | Yes ([`reports`](SimulatedSupervisor::reports)) | No |
//! | **Fault injection** | Refuse dispatch, refuse registration, fail a publish | Hard |
//!
//! ## Example
//!
//! ```rust,ignore
//! let supervisor = SimulatedSupervisor::new();
//! let runtime = ServiceRuntime::new(supervisor.clone());
//! let service = std::thread::spawn(move || runtime.run_and_wait("foo", callbacks));
//!
//! assert!(supervisor.wait_until(ServiceState::Running, Duration::from_secs(5)));
//! supervisor.send_control(ControlSignal::Stop)?;
//! service.join().unwrap()?;
//! ```
//!
//! Signals are delivered through a bounded tokio channel using its blocking API, so
//! [`send_control`](SimulatedSupervisor::send_control) must not be called from inside
//! an async task.

use crate::error::ServiceError;
use crate::model::{ControlSignal, Disposition, ServiceIdentity, ServiceState, StatusRecord};
use crate::supervisor::{
    ControlReceiver, DispatchSlot, MainEntry, StatusPublisher, Supervisor, SupervisorError,
};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// SHARED HARNESS STATE
// =============================================================================

/// Messages into the simulated dispatch loop.
enum Envelope {
    Control {
        signal: ControlSignal,
        respond_to: oneshot::Sender<Disposition>,
    },
    /// Wakes the loop after a `Stopped` report published from outside the loop thread.
    Stopped,
}

#[derive(Default)]
struct HarnessState {
    reports: Vec<StatusRecord>,
    failed_publishes: Vec<StatusRecord>,
    failing_states: Vec<ServiceState>,
    refuse_dispatch: Option<String>,
    refuse_registration: Option<String>,
    receiver: Option<ControlReceiver>,
    registrations: usize,
    terminated: Option<String>,
    stopped: bool,
}

#[derive(Default)]
struct Shared {
    state: Mutex<HarnessState>,
    changed: Condvar,
    slot: DispatchSlot,
    inbox: Mutex<Option<mpsc::Sender<Envelope>>>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, HarnessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn inbox(&self) -> MutexGuard<'_, Option<mpsc::Sender<Envelope>>> {
        self.inbox.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// SUPERVISOR
// =============================================================================

/// A supervisor that runs entirely inside the current process.
///
/// Cloning is cheap; all clones observe the same recorded history. One instance stands
/// for one supervised process, so it enters the dispatcher at most once.
#[derive(Clone, Default)]
pub struct SimulatedSupervisor {
    shared: Arc<Shared>,
}

impl SimulatedSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `run_dispatcher` call fail, as if the process was started from a
    /// console instead of by the supervisor.
    pub fn refuse_dispatch(&self, reason: impl Into<String>) {
        self.shared.state().refuse_dispatch = Some(reason.into());
    }

    /// Makes control receiver registration fail.
    pub fn refuse_registration(&self, reason: impl Into<String>) {
        self.shared.state().refuse_registration = Some(reason.into());
    }

    /// Makes every publication of `state` fail.
    pub fn fail_publish(&self, state: ServiceState) {
        self.shared.state().failing_states.push(state);
    }

    /// A status handle that records into this supervisor without a dispatch loop.
    pub fn handle(&self) -> SimulatedHandle {
        SimulatedHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Delivers `signal` to the registered receiver and waits for it to be handled.
    ///
    /// Like the real supervisor, this returns only after the receiver has returned.
    pub fn send_control(&self, signal: ControlSignal) -> Result<Disposition, SupervisorError> {
        let sender = self
            .shared
            .inbox()
            .clone()
            .ok_or_else(|| SupervisorError::Unavailable("dispatcher is not running".into()))?;
        let (respond_to, response) = oneshot::channel();
        debug!(?signal, "Sending control");
        sender
            .blocking_send(Envelope::Control { signal, respond_to })
            .map_err(|_| SupervisorError::Unavailable("dispatcher stopped".into()))?;
        response.blocking_recv().map_err(|_| {
            SupervisorError::Unavailable("dispatcher stopped before handling the signal".into())
        })
    }

    /// Every status published so far, in order.
    pub fn reports(&self) -> Vec<StatusRecord> {
        self.shared.state().reports.clone()
    }

    /// States of every status published so far, in order.
    pub fn states(&self) -> Vec<ServiceState> {
        self.shared.state().reports.iter().map(|r| r.state).collect()
    }

    /// Statuses whose publication was made to fail.
    pub fn failed_publishes(&self) -> Vec<StatusRecord> {
        self.shared.state().failed_publishes.clone()
    }

    /// Number of successful control receiver registrations.
    pub fn registrations(&self) -> usize {
        self.shared.state().registrations
    }

    /// The fatal error passed to [`Supervisor::terminate`], if any.
    pub fn terminated(&self) -> Option<String> {
        self.shared.state().terminated.clone()
    }

    /// Blocks until the most recent report is in `state`, or `timeout` passes.
    pub fn wait_until(&self, state: ServiceState, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut guard = self.shared.state();
        loop {
            if guard.reports.last().map(|r| r.state) == Some(state) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            guard = self
                .shared
                .changed
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Waits for the main entry to either register a receiver or terminate.
    fn take_receiver(&self) -> Option<ControlReceiver> {
        let mut guard = self.shared.state();
        loop {
            if let Some(receiver) = guard.receiver.take() {
                return Some(receiver);
            }
            if guard.terminated.is_some() || guard.stopped {
                return None;
            }
            guard = self
                .shared
                .changed
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

impl Supervisor for SimulatedSupervisor {
    type Handle = SimulatedHandle;

    fn run_dispatcher(
        &self,
        identity: &ServiceIdentity,
        main: MainEntry,
    ) -> Result<(), SupervisorError> {
        self.shared.slot.claim(main)?;
        if let Some(reason) = self.shared.state().refuse_dispatch.take() {
            self.shared.slot.release();
            return Err(SupervisorError::Unavailable(reason));
        }
        let main = self
            .shared
            .slot
            .take_entry()
            .ok_or_else(|| SupervisorError::Unavailable("main entry already taken".into()))?;

        let (sender, mut inbox) = mpsc::channel(64);
        *self.shared.inbox() = Some(sender);
        info!(service = %identity, "Dispatcher started");

        let main_thread = thread::Builder::new()
            .name(format!("{identity}-main"))
            .spawn(main)
            .map_err(|e| SupervisorError::Unavailable(e.to_string()))?;

        if let Some(mut receiver) = self.take_receiver() {
            loop {
                let envelope = inbox.blocking_recv();
                // The wake-up is dropped when the inbox is full, so check the flag too.
                if self.shared.state().stopped {
                    break;
                }
                match envelope {
                    Some(Envelope::Control { signal, respond_to }) => {
                        let disposition = receiver(signal);
                        let _ = respond_to.send(disposition);
                    }
                    Some(Envelope::Stopped) | None => break,
                }
            }
        }

        // Later senders see a closed dispatcher, pending ones get their ack dropped.
        self.shared.inbox().take();
        inbox.close();
        if main_thread.join().is_err() {
            warn!(service = %identity, "Main entry panicked");
        }
        info!(service = %identity, "Dispatcher returned");
        Ok(())
    }

    fn register_control_receiver(
        &self,
        identity: &ServiceIdentity,
        receiver: ControlReceiver,
    ) -> Result<SimulatedHandle, SupervisorError> {
        let mut state = self.shared.state();
        if let Some(reason) = state.refuse_registration.clone() {
            return Err(SupervisorError::Registration(reason));
        }
        state.receiver = Some(receiver);
        state.registrations += 1;
        drop(state);
        self.shared.changed.notify_all();
        debug!(service = %identity, "Control receiver registered");
        Ok(self.handle())
    }

    fn terminate(&self, error: &ServiceError) {
        warn!(error = %error, "Process termination requested");
        self.shared.state().terminated = Some(error.to_string());
        self.shared.changed.notify_all();
    }
}

// =============================================================================
// STATUS HANDLE
// =============================================================================

/// Status handle issued by [`SimulatedSupervisor`].
#[derive(Clone)]
pub struct SimulatedHandle {
    shared: Arc<Shared>,
}

impl StatusPublisher for SimulatedHandle {
    fn publish(&self, status: &StatusRecord) -> Result<(), SupervisorError> {
        let mut state = self.shared.state();
        if state.failing_states.contains(&status.state) {
            state.failed_publishes.push(status.clone());
            return Err(SupervisorError::Publish(format!(
                "injected failure for state [{}]",
                status.state
            )));
        }
        state.reports.push(status.clone());
        let stopped = status.state == ServiceState::Stopped;
        if stopped {
            state.stopped = true;
        }
        drop(state);
        self.shared.changed.notify_all();

        if stopped {
            if let Some(sender) = self.shared.inbox().as_ref() {
                let _ = sender.try_send(Envelope::Stopped);
            }
        }
        Ok(())
    }
}
