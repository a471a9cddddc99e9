//! OS signal driven shutdown.
//!
//! Lives in its own test binary: the signal is delivered to the whole process.

#![cfg(unix)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use lifevisor::{
    BoxError, JobFn, JobRef, Orchestrator, Service, Signal, with_interrupt_signals,
    with_shutdown_timeout,
};

#[derive(Default)]
struct Server {
    released: Notify,
    stops: AtomicUsize,
}

#[async_trait]
impl Service for Server {
    fn name(&self) -> &str {
        "server"
    }

    async fn start(&self) -> Result<(), BoxError> {
        self.released.notified().await;
        Ok(())
    }

    async fn stop(&self, _ctx: CancellationToken) -> Result<(), BoxError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.released.notify_one();
        Ok(())
    }
}

#[tokio::test]
async fn subscribed_signal_triggers_clean_shutdown() {
    let ready = Arc::new(Notify::new());
    let cancelled = Arc::new(AtomicBool::new(false));
    let server = Arc::new(Server::default());

    let (r, c) = (ready.clone(), cancelled.clone());
    let job: JobRef = JobFn::arc("waiter", move |ctx: CancellationToken| {
        let (r, c) = (r.clone(), c.clone());
        async move {
            r.notify_one();
            ctx.cancelled().await;
            c.store(true, Ordering::SeqCst);
            Ok::<_, BoxError>(())
        }
    });

    let orc = Orchestrator::new([
        with_shutdown_timeout(Duration::from_secs(5)),
        with_interrupt_signals([Signal::User1]),
    ])
    .add_job(job)
    .add_service(server.clone());

    // Units are spawned after the listener is installed, so once the job runs
    // SIGUSR1 is already routed to the orchestrator.
    tokio::spawn(async move {
        ready.notified().await;
        // SAFETY: sending a signal to our own pid has no memory-safety implications.
        unsafe {
            libc::kill(libc::getpid(), libc::SIGUSR1);
        }
    });

    tokio::time::timeout(Duration::from_secs(10), orc.serve())
        .await
        .expect("serve did not return after SIGUSR1")
        .expect("clean shutdown");

    assert!(cancelled.load(Ordering::SeqCst));
    assert_eq!(server.stops.load(Ordering::SeqCst), 1);
}
