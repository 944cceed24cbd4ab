//! # Lifecycle Context
//!
//! The single record the controller shares between the supervisor's threads: identity,
//! callbacks, status record and status handle. It starts empty, is populated once by
//! [`LifecycleContext::initialize`] and is never reset.
//!
//! The context does no locking of its own. It is only reachable through the
//! [`SharedContext`] mutex, so holding a `&mut LifecycleContext` already means holding
//! the lock.

use crate::config::RuntimeOptions;
use crate::error::ServiceError;
use crate::handler::ServiceHandler;
use crate::model::{ServiceIdentity, StatusRecord};
use crate::supervisor::StatusPublisher;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// The process-wide context behind its lock.
pub type SharedContext = Arc<Mutex<LifecycleContext>>;

/// Locks `context`, recovering the guard if a previous holder panicked.
///
/// Callbacks run behind a panic boundary, so poisoning should not happen; if it does,
/// the controller keeps serving signals rather than wedging the service.
pub fn lock(context: &SharedContext) -> MutexGuard<'_, LifecycleContext> {
    context.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(super) struct Populated {
    pub(super) identity: ServiceIdentity,
    pub(super) handler: Box<dyn ServiceHandler>,
    pub(super) status: StatusRecord,
    pub(super) handle: Option<Box<dyn StatusPublisher>>,
}

/// Identity, callbacks and status of the one service this process runs.
#[derive(Default)]
pub struct LifecycleContext {
    pub(super) inner: Option<Populated>,
}

impl LifecycleContext {
    /// An empty, uninitialized context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a fresh empty context in its lock.
    pub fn shared() -> SharedContext {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.is_some()
    }

    /// Populates the context. Fails with `AlreadyStarted` if it was populated before,
    /// leaving the existing service untouched.
    pub fn initialize(
        &mut self,
        name: &str,
        handler: Box<dyn ServiceHandler>,
        options: &RuntimeOptions,
    ) -> Result<(), ServiceError> {
        if let Some(existing) = &self.inner {
            warn!(service = %existing.identity, requested = name, "Second start attempt rejected");
            return Err(ServiceError::AlreadyStarted);
        }
        self.inner = Some(Populated {
            identity: ServiceIdentity::new(name),
            handler,
            status: StatusRecord::new(options.wait_hint),
            handle: None,
        });
        debug!(service = name, "Lifecycle context initialized");
        Ok(())
    }

    /// Stores the supervisor-issued status handle. Callable once.
    pub fn attach_handle(&mut self, handle: Box<dyn StatusPublisher>) -> Result<(), ServiceError> {
        let inner = self.populated_mut()?;
        if inner.handle.is_some() {
            return Err(ServiceError::HandleAlreadyAttached);
        }
        inner.handle = Some(handle);
        Ok(())
    }

    pub fn has_handle(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.handle.is_some())
    }

    pub fn identity(&self) -> Result<&ServiceIdentity, ServiceError> {
        Ok(&self.populated()?.identity)
    }

    pub fn status(&self) -> Result<&StatusRecord, ServiceError> {
        Ok(&self.populated()?.status)
    }

    pub fn handler_mut(&mut self) -> Result<&mut dyn ServiceHandler, ServiceError> {
        Ok(self.populated_mut()?.handler.as_mut())
    }

    /// Sends `message` to the caller's log sink (or to tracing before initialization).
    pub fn log(&self, message: &str) {
        match &self.inner {
            Some(inner) => inner.handler.log(message),
            None => tracing::error!("{message}"),
        }
    }

    pub(super) fn populated(&self) -> Result<&Populated, ServiceError> {
        self.inner.as_ref().ok_or(ServiceError::NotInitialized)
    }

    pub(super) fn populated_mut(&mut self) -> Result<&mut Populated, ServiceError> {
        self.inner.as_mut().ok_or(ServiceError::NotInitialized)
    }
}
