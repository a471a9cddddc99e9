//! # Example: serve
//!
//! One ticking job and one service, stopped by Ctrl-C (or SIGTERM) within a 3s deadline.
//!
//! Demonstrates how to:
//! - Define a job with [`JobFn`] that honors cancellation.
//! - Implement [`Service`] with a blocking `start` and a bounded `stop`.
//! - Configure the orchestrator with option mutators.
//!
//! ## Flow
//! ```text
//! Orchestrator::serve()
//!     ├─► job "ticker"     (ticks every 500ms until cancelled)
//!     ├─► service "http"   start() ... waits for stop
//!     ├─► Ctrl-C ─► trigger.cancel()
//!     ├─► ticker exits, http.stop(ctx) releases start()
//!     └─► Ok(())
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example serve
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use lifevisor::{
    BoxError, JobFn, JobRef, Orchestrator, Service, Signal, with_interrupt_signals,
    with_shutdown_timeout,
};

/// Stand-in for a real listener: runs until told to stop.
#[derive(Default)]
struct Http {
    closed: Notify,
}

#[async_trait]
impl Service for Http {
    fn name(&self) -> &str {
        "http"
    }

    async fn start(&self) -> Result<(), BoxError> {
        tracing::info!("http listening");
        self.closed.notified().await;
        Ok(())
    }

    async fn stop(&self, _ctx: CancellationToken) -> Result<(), BoxError> {
        // Simulated connection drain, well inside the 3s deadline.
        tokio::time::sleep(Duration::from_millis(300)).await;
        self.closed.notify_one();
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let ticker: JobRef = JobFn::arc("ticker", |ctx: CancellationToken| async move {
        let mut n = 0u64;
        loop {
            tokio::select! {
                _ = ctx.cancelled() => return Ok::<_, BoxError>(()),
                _ = tokio::time::sleep(Duration::from_millis(500)) => {
                    n += 1;
                    tracing::info!(tick = n, "ticker");
                }
            }
        }
    });

    let orc = Orchestrator::new([
        with_shutdown_timeout(Duration::from_secs(3)),
        with_interrupt_signals([Signal::Interrupt, Signal::Terminate]),
    ])
    .add_job(ticker)
    .add_service(std::sync::Arc::new(Http::default()));

    tracing::info!(
        jobs = orc.jobs_len(),
        services = orc.services_len(),
        timeout = ?orc.config().shutdown_timeout(),
        "press Ctrl-C to stop"
    );
    orc.serve().await?;
    Ok(())
}
