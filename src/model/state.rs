use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state reported to the supervisor.
///
/// The numeric values returned by [`ServiceState::code`] are the ones the Service Control
/// Manager uses, so log lines carry the same codes operators see in `sc query`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceState {
    Stopped,
    StartPending,
    StopPending,
    Running,
    ContinuePending,
    PausePending,
    Paused,
}

impl ServiceState {
    /// Supervisor code for this state.
    pub fn code(self) -> u32 {
        match self {
            ServiceState::Stopped => 1,
            ServiceState::StartPending => 2,
            ServiceState::StopPending => 3,
            ServiceState::Running => 4,
            ServiceState::ContinuePending => 5,
            ServiceState::PausePending => 6,
            ServiceState::Paused => 7,
        }
    }

    /// `true` for the two states the supervisor requires a zero checkpoint for.
    pub fn is_at_rest(self) -> bool {
        matches!(self, ServiceState::Running | ServiceState::Stopped)
    }

    /// `true` for the transient states that carry a rising checkpoint.
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            ServiceState::StartPending
                | ServiceState::StopPending
                | ServiceState::ContinuePending
                | ServiceState::PausePending
        )
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A control request delivered by the supervisor to the running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlSignal {
    Stop,
    Pause,
    Continue,
    Interrogate,
    Shutdown,
    /// Any code the controller does not act on (device events, preshutdown, ...).
    Other(u32),
}

impl ControlSignal {
    /// Decodes a raw supervisor control code.
    pub fn from_raw(code: u32) -> Self {
        match code {
            1 => ControlSignal::Stop,
            2 => ControlSignal::Pause,
            3 => ControlSignal::Continue,
            4 => ControlSignal::Interrogate,
            5 => ControlSignal::Shutdown,
            other => ControlSignal::Other(other),
        }
    }

    /// Raw supervisor control code.
    pub fn code(self) -> u32 {
        match self {
            ControlSignal::Stop => 1,
            ControlSignal::Pause => 2,
            ControlSignal::Continue => 3,
            ControlSignal::Interrogate => 4,
            ControlSignal::Shutdown => 5,
            ControlSignal::Other(code) => code,
        }
    }
}

/// What the controller did with a control signal.
///
/// Platform adapters translate this into the supervisor's reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Handled,
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_and_pending_partition_all_states() {
        let all = [
            ServiceState::Stopped,
            ServiceState::StartPending,
            ServiceState::StopPending,
            ServiceState::Running,
            ServiceState::ContinuePending,
            ServiceState::PausePending,
            ServiceState::Paused,
        ];
        for state in all {
            assert!(!(state.is_at_rest() && state.is_pending()), "{state:?}");
        }
        // Paused is neither pending nor a zero-checkpoint rest state.
        assert!(!ServiceState::Paused.is_at_rest());
        assert!(!ServiceState::Paused.is_pending());
    }

    #[test]
    fn test_control_signal_raw_codes() {
        assert_eq!(ControlSignal::from_raw(1), ControlSignal::Stop);
        assert_eq!(ControlSignal::from_raw(5), ControlSignal::Shutdown);
        assert_eq!(ControlSignal::from_raw(0x40), ControlSignal::Other(0x40));
        assert_eq!(ControlSignal::Continue.code(), 3);
    }

    #[test]
    fn test_state_displays_supervisor_code() {
        assert_eq!(ServiceState::StartPending.to_string(), "2");
        assert_eq!(ServiceState::Running.to_string(), "4");
    }
}
