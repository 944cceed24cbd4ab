//! # Control Dispatch
//!
//! Maps supervisor control signals onto transitions:
//!
//! | Signal | Pending | Target | Callback |
//! |--------|---------|--------|----------|
//! | Stop | StopPending | Stopped | stop |
//! | Shutdown | StopPending | Stopped | stop |
//! | Pause | PausePending | Paused | stop |
//! | Continue | ContinuePending | Running | start |
//!
//! Anything else is ignored; the supervisor also sends informational codes.

use crate::handler::Action;
use crate::lifecycle::context::LifecycleContext;
use crate::lifecycle::transition::run_transition;
use crate::model::{ControlSignal, Disposition, ServiceState};
use tracing::{debug, debug_span};

/// Pending state, target state and callback for `signal`, if it is acted on.
pub fn route(signal: ControlSignal) -> Option<(ServiceState, ServiceState, Action)> {
    match signal {
        ControlSignal::Stop | ControlSignal::Shutdown => {
            Some((ServiceState::StopPending, ServiceState::Stopped, Action::Stop))
        }
        ControlSignal::Pause => Some((ServiceState::PausePending, ServiceState::Paused, Action::Stop)),
        ControlSignal::Continue => Some((
            ServiceState::ContinuePending,
            ServiceState::Running,
            Action::Start,
        )),
        ControlSignal::Interrogate | ControlSignal::Other(_) => None,
    }
}

/// Handles one control signal. The caller holds the context lock.
pub fn on_control(ctx: &mut LifecycleContext, signal: ControlSignal) -> Disposition {
    let _span = debug_span!("control", ?signal).entered();
    match route(signal) {
        Some((pending, target, action)) => {
            run_transition(ctx, pending, target, action);
            Disposition::Handled
        }
        None => {
            debug!(code = signal.code(), "Control ignored");
            Disposition::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeOptions;
    use crate::handler::{CallbackError, ServiceHandler};
    use crate::supervisor::SimulatedSupervisor;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Calls(Arc<Mutex<Vec<&'static str>>>);

    impl ServiceHandler for Calls {
        fn start(&mut self) -> Result<(), CallbackError> {
            self.0.lock().unwrap().push("start");
            Ok(())
        }

        fn stop(&mut self) -> Result<(), CallbackError> {
            self.0.lock().unwrap().push("stop");
            Ok(())
        }
    }

    fn running(calls: &Calls) -> (SimulatedSupervisor, LifecycleContext) {
        let supervisor = SimulatedSupervisor::new();
        let mut ctx = LifecycleContext::new();
        ctx.initialize("foo", Box::new(calls.clone()), &RuntimeOptions::default())
            .unwrap();
        ctx.attach_handle(Box::new(supervisor.handle())).unwrap();
        (supervisor, ctx)
    }

    #[test]
    fn test_route_table() {
        use ServiceState::*;
        assert_eq!(route(ControlSignal::Stop), Some((StopPending, Stopped, Action::Stop)));
        assert_eq!(route(ControlSignal::Shutdown), Some((StopPending, Stopped, Action::Stop)));
        assert_eq!(route(ControlSignal::Pause), Some((PausePending, Paused, Action::Stop)));
        assert_eq!(
            route(ControlSignal::Continue),
            Some((ContinuePending, Running, Action::Start))
        );
        assert_eq!(route(ControlSignal::Interrogate), None);
        assert_eq!(route(ControlSignal::Other(0x20)), None);
    }

    #[test]
    fn test_each_signal_reports_pending_before_callback_and_target_after() {
        let calls = Calls::default();
        let (supervisor, mut ctx) = running(&calls);

        for signal in [ControlSignal::Pause, ControlSignal::Continue, ControlSignal::Shutdown] {
            assert_eq!(on_control(&mut ctx, signal), Disposition::Handled);
        }

        assert_eq!(
            supervisor.states(),
            vec![
                ServiceState::PausePending,
                ServiceState::Paused,
                ServiceState::ContinuePending,
                ServiceState::Running,
                ServiceState::StopPending,
                ServiceState::Stopped,
            ]
        );
        assert_eq!(*calls.0.lock().unwrap(), vec!["stop", "start", "stop"]);
    }

    #[test]
    fn test_ignored_signals_leave_no_trace() {
        let calls = Calls::default();
        let (supervisor, mut ctx) = running(&calls);

        assert_eq!(on_control(&mut ctx, ControlSignal::Interrogate), Disposition::Ignored);
        assert_eq!(on_control(&mut ctx, ControlSignal::Other(0x0f)), Disposition::Ignored);
        assert!(supervisor.reports().is_empty());
        assert!(calls.0.lock().unwrap().is_empty());
    }
}
