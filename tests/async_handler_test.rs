use async_trait::async_trait;
use service_lifecycle::handler::CallbackError;
use service_lifecycle::{
    AsyncServiceHandler, BlockingHandler, ControlSignal, ServiceRuntime, ServiceState,
    SimulatedSupervisor,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Ticks in the background between start and stop.
struct Ticker {
    ticks: Arc<AtomicU32>,
    running: Option<(watch::Sender<bool>, JoinHandle<()>)>,
}

#[async_trait]
impl AsyncServiceHandler for Ticker {
    async fn start(&mut self) -> Result<(), CallbackError> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let ticks = Arc::clone(&self.ticks);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(5));
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        ticks.fetch_add(1, Ordering::SeqCst);
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });
        self.running = Some((shutdown_tx, task));
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), CallbackError> {
        let (shutdown_tx, task) = self.running.take().ok_or("ticker is not running")?;
        shutdown_tx.send(true)?;
        task.await?;
        Ok(())
    }
}

#[test]
fn test_async_handler_runs_between_start_and_stop() {
    let supervisor = SimulatedSupervisor::new();
    let runtime = ServiceRuntime::new(supervisor.clone());
    let ticks = Arc::new(AtomicU32::new(0));
    let handler = BlockingHandler::new(Ticker {
        ticks: Arc::clone(&ticks),
        running: None,
    })
    .unwrap();

    let service = {
        let runtime = runtime.clone();
        std::thread::spawn(move || runtime.run_and_wait("foo", handler))
    };
    assert!(supervisor.wait_until(ServiceState::Running, Duration::from_secs(5)));

    // The first interval tick fires immediately.
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while ticks.load(Ordering::SeqCst) == 0 && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(ticks.load(Ordering::SeqCst) > 0);

    supervisor.send_control(ControlSignal::Stop).unwrap();
    service.join().unwrap().unwrap();

    let stopped_at = ticks.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(ticks.load(Ordering::SeqCst), stopped_at);
    assert_eq!(supervisor.reports().pop().unwrap().exit_code, 0);
}

#[test]
fn test_async_stop_error_is_recognized_failure() {
    let supervisor = SimulatedSupervisor::new();
    let runtime = ServiceRuntime::new(supervisor.clone());
    let handler = BlockingHandler::new(Ticker {
        ticks: Arc::new(AtomicU32::new(0)),
        running: None,
    })
    .unwrap();

    let service = {
        let runtime = runtime.clone();
        std::thread::spawn(move || runtime.run_and_wait("foo", handler))
    };
    assert!(supervisor.wait_until(ServiceState::Running, Duration::from_secs(5)));

    // Pause stops the ticker; a second pause finds nothing to stop.
    supervisor.send_control(ControlSignal::Pause).unwrap();
    supervisor.send_control(ControlSignal::Pause).unwrap();
    service.join().unwrap().unwrap();

    let last = supervisor.reports().pop().unwrap();
    assert_eq!((last.state, last.exit_code), (ServiceState::Stopped, 1));
}
