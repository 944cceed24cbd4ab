use crate::model::ServiceState;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Supervisor bit for "accepts stop".
pub const ACCEPT_STOP: u32 = 0x0000_0001;
/// Supervisor bit for "accepts pause and continue".
pub const ACCEPT_PAUSE_CONTINUE: u32 = 0x0000_0002;
/// Supervisor bit for "accepts shutdown".
pub const ACCEPT_SHUTDOWN: u32 = 0x0000_0004;

/// Exit code reported with every non-error status.
pub const EXIT_OK: u32 = 0;

/// The health report pushed to the supervisor.
///
/// The controls mask is fixed for the life of the service. Everything else is rewritten
/// by [`StatusRecord::advance`] on each report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub state: ServiceState,
    pub controls_accepted: u32,
    pub exit_code: u32,
    pub checkpoint: u32,
    pub wait_hint: Duration,
}

impl StatusRecord {
    pub fn new(wait_hint: Duration) -> Self {
        Self {
            state: ServiceState::StartPending,
            controls_accepted: ACCEPT_STOP | ACCEPT_SHUTDOWN | ACCEPT_PAUSE_CONTINUE,
            exit_code: EXIT_OK,
            checkpoint: 0,
            wait_hint,
        }
    }

    /// Moves the record to `state` and applies the checkpoint policy.
    ///
    /// Running and Stopped reset the checkpoint to zero; every other state bumps it so
    /// the supervisor sees progress and keeps waiting.
    pub fn advance(&mut self, state: ServiceState, exit_code: u32) {
        self.state = state;
        self.exit_code = exit_code;
        if state.is_at_rest() {
            self.checkpoint = 0;
        } else {
            self.checkpoint = self.checkpoint.wrapping_add(1);
        }
    }
}

impl Default for StatusRecord {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_reports_raise_checkpoint() {
        let mut status = StatusRecord::default();
        status.advance(ServiceState::StartPending, EXIT_OK);
        assert_eq!(status.checkpoint, 1);
        status.advance(ServiceState::StartPending, EXIT_OK);
        assert_eq!(status.checkpoint, 2);
    }

    #[test]
    fn test_rest_states_reset_checkpoint() {
        let mut status = StatusRecord::default();
        status.advance(ServiceState::StartPending, EXIT_OK);
        status.advance(ServiceState::Running, EXIT_OK);
        assert_eq!(status.checkpoint, 0);

        status.advance(ServiceState::StopPending, EXIT_OK);
        status.advance(ServiceState::Stopped, 1);
        assert_eq!(status.checkpoint, 0);
        assert_eq!(status.exit_code, 1);
    }

    #[test]
    fn test_paused_keeps_counting() {
        // Paused is not a zero-checkpoint state.
        let mut status = StatusRecord::default();
        status.advance(ServiceState::PausePending, EXIT_OK);
        status.advance(ServiceState::Paused, EXIT_OK);
        assert_eq!(status.checkpoint, 2);
        status.advance(ServiceState::ContinuePending, EXIT_OK);
        assert_eq!(status.checkpoint, 3);
    }

    #[test]
    fn test_controls_mask_is_fixed() {
        let mut status = StatusRecord::default();
        let mask = status.controls_accepted;
        assert_eq!(mask, ACCEPT_STOP | ACCEPT_SHUTDOWN | ACCEPT_PAUSE_CONTINUE);
        status.advance(ServiceState::Stopped, 2);
        assert_eq!(status.controls_accepted, mask);
    }
}
