//! The per-process dispatcher slot.
//!
//! A process enters the supervisor's dispatch loop at most once, and the one-time
//! main entry has to be parked somewhere the supervisor thread can pick it up. The
//! slot owns both: a claim flag that stays set once a dispatcher was entered, and the
//! pending entry itself.

use crate::supervisor::{MainEntry, SupervisorError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// One dispatcher claim plus the parked main entry.
pub struct DispatchSlot {
    claimed: AtomicBool,
    entry: Mutex<Option<MainEntry>>,
}

impl DispatchSlot {
    pub const fn new() -> Self {
        Self {
            claimed: AtomicBool::new(false),
            entry: Mutex::new(None),
        }
    }

    /// Parks `main` for the supervisor. Fails with `AlreadyDispatched` if the slot was
    /// claimed before; the pending entry of the first claim is left untouched.
    pub fn claim(&self, main: MainEntry) -> Result<(), SupervisorError> {
        if self.claimed.swap(true, Ordering::SeqCst) {
            return Err(SupervisorError::AlreadyDispatched);
        }
        *self.entry.lock().unwrap_or_else(PoisonError::into_inner) = Some(main);
        Ok(())
    }

    /// Takes the parked entry; `None` if it was already taken or never parked.
    pub fn take_entry(&self) -> Option<MainEntry> {
        self.entry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Gives the claim back after the dispatcher could not be entered.
    pub fn release(&self) {
        self.take_entry();
        self.claimed.store(false, Ordering::SeqCst);
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::SeqCst)
    }
}

impl Default for DispatchSlot {
    fn default() -> Self {
        Self::new()
    }
}
