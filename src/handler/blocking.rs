//! Async callbacks on the synchronous lifecycle contract.
//!
//! The supervisor protocol is synchronous: a transition is finished when the callback
//! returns. [`BlockingHandler`] keeps that guarantee for async code by blocking the
//! supervisor thread on its own tokio runtime until the future completes. The
//! controller's lock is held for the whole time, exactly as for a plain handler.
//!
//! The runtime outlives each callback, so tasks spawned from `start` (a listener, a
//! worker pool) keep running on it until the handler is dropped.

use crate::handler::{CallbackError, ServiceHandler};
use async_trait::async_trait;
use tokio::runtime::{Builder, Runtime};

/// Async variant of [`ServiceHandler`].
#[async_trait]
pub trait AsyncServiceHandler: Send + 'static {
    async fn start(&mut self) -> Result<(), CallbackError>;

    async fn stop(&mut self) -> Result<(), CallbackError>;

    fn log(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Drives an [`AsyncServiceHandler`] from the supervisor's thread.
pub struct BlockingHandler<H> {
    inner: H,
    runtime: Runtime,
}

impl<H: AsyncServiceHandler> BlockingHandler<H> {
    /// Wraps `inner` with a fresh multi-threaded runtime.
    pub fn new(inner: H) -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .enable_all()
            .thread_name("service-worker")
            .build()?;
        Ok(Self::with_runtime(inner, runtime))
    }

    /// Wraps `inner` with a caller-built runtime.
    pub fn with_runtime(inner: H, runtime: Runtime) -> Self {
        Self { inner, runtime }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: AsyncServiceHandler> ServiceHandler for BlockingHandler<H> {
    fn start(&mut self) -> Result<(), CallbackError> {
        self.runtime.block_on(self.inner.start())
    }

    fn stop(&mut self) -> Result<(), CallbackError> {
        self.runtime.block_on(self.inner.stop())
    }

    fn log(&self, message: &str) {
        self.inner.log(message)
    }
}
