//! # Orchestrator: runs services and jobs, drives a bounded graceful shutdown.
//!
//! The [`Orchestrator`] owns the registered jobs and services plus the [`Config`].
//! [`Orchestrator::serve`] runs the whole coordination protocol and returns the first error.
//!
//! ## High-level architecture
//! ```text
//! Init:
//!   SignalListener::install(cfg.signals)    (fail fast → ServeError::Signal)
//!   gate = ErrorGate(trigger), stop_ctx = CancellationToken::new()
//!
//! Fan-out:
//!   Job[0..N]      ──► run_job(job, trigger.child_token())
//!   Service[0..M]  ──► run_starter(svc) ──(oneshot StartOutcome)──► run_stopper(svc)
//!
//! Wait-for-trigger:
//!   select! { trigger.cancelled()  ◄── gate.commit(..) / ShutdownHandle::shutdown()
//!             signals.recv()       ──► trigger.cancel()
//!             pool.join_next()     (reap finished units) }
//!
//! Bounded drain:
//!   shutdown_timeout = None    ─► wait for all units
//!   shutdown_timeout = Some(d) ─► wait up to d
//!                                 └─ elapsed: stop_ctx.cancel()
//!                                             gate.commit(ShutdownTimeout { stuck })
//!                                             abort remaining units
//!
//! Terminal:
//!   gate.take() ─► Some(err) → Err(err) / None → Ok(())
//! ```
//!
//! ## Rules
//! - `serve` consumes the orchestrator: one run per instance.
//! - Units still running past the deadline are aborted at their next `.await` when `serve`
//!   returns; code stuck in a blocking call cannot be interrupted and leaks until it returns.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use lifevisor::{BoxError, JobFn, JobRef, Orchestrator, with_shutdown_timeout};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ticker: JobRef = JobFn::arc("ticker", |ctx: CancellationToken| async move {
//!         while !ctx.is_cancelled() {
//!             tokio::time::sleep(Duration::from_millis(10)).await;
//!         }
//!         Ok::<_, BoxError>(())
//!     });
//!
//!     let orc = Orchestrator::new([with_shutdown_timeout(Duration::from_secs(1))])
//!         .add_job(ticker);
//!
//!     let handle = orc.shutdown_handle();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_millis(50)).await;
//!         handle.shutdown();
//!     });
//!
//!     orc.serve().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::{sync::oneshot, time};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{Config, ConfigOption};
use crate::core::{
    gate::ErrorGate,
    shutdown::SignalListener,
    units::{self, Units},
};
use crate::error::ServeError;
use crate::jobs::JobRef;
use crate::services::ServiceRef;

/// Collects jobs and services and handles their lifecycle.
pub struct Orchestrator {
    cfg: Config,
    jobs: Vec<JobRef>,
    services: Vec<ServiceRef>,
    trigger: CancellationToken,
}

impl Orchestrator {
    /// Creates an orchestrator from option mutators (see [`Config::from_options`]).
    pub fn new<I>(opts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<ConfigOption>>,
    {
        Self::with_config(Config::from_options(opts))
    }

    /// Creates an orchestrator from a ready config.
    pub fn with_config(cfg: Config) -> Self {
        Self {
            cfg,
            jobs: Vec::new(),
            services: Vec::new(),
            trigger: CancellationToken::new(),
        }
    }

    /// Registers services; `None` entries are ignored.
    pub fn add_services<I>(mut self, services: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<ServiceRef>>,
    {
        self.services
            .extend(services.into_iter().filter_map(Into::into));
        self
    }

    /// Registers jobs; `None` entries are ignored.
    pub fn add_jobs<I>(mut self, jobs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<JobRef>>,
    {
        self.jobs.extend(jobs.into_iter().filter_map(Into::into));
        self
    }

    /// Registers a single service.
    pub fn add_service(self, service: ServiceRef) -> Self {
        self.add_services([service])
    }

    /// Registers a single job.
    pub fn add_job(self, job: JobRef) -> Self {
        self.add_jobs([job])
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Number of registered jobs.
    pub fn jobs_len(&self) -> usize {
        self.jobs.len()
    }

    /// Number of registered services.
    pub fn services_len(&self) -> usize {
        self.services.len()
    }

    /// Returns a handle that triggers shutdown exactly like a subscribed OS signal.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            trigger: self.trigger.clone(),
        }
    }

    /// Starts every job and service and blocks until shutdown completes.
    ///
    /// Returns the first error seen across startup, execution and shutdown, or `Ok(())`
    /// for a clean signal-triggered shutdown.
    ///
    /// # Errors
    /// - [`ServeError::Signal`] if the signal listener cannot be installed (nothing is started);
    /// - [`ServeError::Job`], [`ServeError::ServiceStart`], [`ServeError::ServiceStop`],
    ///   [`ServeError::Panicked`] for the first component failure;
    /// - [`ServeError::ShutdownTimeout`] if draining overran the configured deadline
    ///   and nothing failed earlier.
    pub async fn serve(self) -> Result<(), ServeError> {
        info!(
            jobs = self.jobs_len(),
            services = self.services_len(),
            signals = ?self.config().signals(),
            timeout = ?self.config().shutdown_timeout(),
            "orchestrator starting"
        );

        let Self {
            cfg,
            jobs,
            services,
            trigger,
        } = self;

        let mut signals = SignalListener::install(cfg.signals())?;
        let gate = Arc::new(ErrorGate::new(trigger.clone()));
        let stop_ctx = CancellationToken::new();
        let mut pool = Units::default();

        for job in jobs {
            let label = units::job_label(&job);
            let ctx = trigger.child_token();
            pool.spawn(label, units::run_job(job, ctx, Arc::clone(&gate)));
        }

        for svc in services {
            let (tx, rx) = oneshot::channel();
            pool.spawn(
                units::start_label(&svc),
                units::run_starter(Arc::clone(&svc), tx),
            );
            pool.spawn(
                units::stop_label(&svc),
                units::run_stopper(
                    svc,
                    rx,
                    trigger.clone(),
                    stop_ctx.clone(),
                    Arc::clone(&gate),
                ),
            );
        }

        loop {
            tokio::select! {
                _ = trigger.cancelled() => break,
                sig = signals.recv() => {
                    info!(signal = ?sig, "shutdown signal received");
                    trigger.cancel();
                    break;
                }
                Some(()) = pool.join_next() => {}
            }
        }
        drop(signals);

        info!(running = pool.len(), "shutdown requested, draining units");
        Self::drain(&cfg, &mut pool, &stop_ctx, &gate).await;

        match gate.take() {
            Some(err) => {
                warn!(label = err.as_label(), error = %err, "orchestrator stopped with error");
                Err(err)
            }
            None => {
                info!("orchestrator stopped");
                Ok(())
            }
        }
    }

    /// Waits for all units, bounded by the configured shutdown timeout.
    async fn drain(
        cfg: &Config,
        pool: &mut Units,
        stop_ctx: &CancellationToken,
        gate: &ErrorGate,
    ) {
        let Some(timeout) = cfg.shutdown_timeout() else {
            pool.drain().await;
            return;
        };

        if time::timeout(timeout, pool.drain()).await.is_err() {
            stop_ctx.cancel();
            let stuck = pool.stuck();
            warn!(?timeout, ?stuck, "shutdown timeout exceeded");
            gate.commit(ServeError::ShutdownTimeout { timeout, stuck });
            pool.abort_all();
        }
    }
}

/// Cloneable handle that requests shutdown of a serving [`Orchestrator`].
#[derive(Clone, Debug)]
pub struct ShutdownHandle {
    trigger: CancellationToken,
}

impl ShutdownHandle {
    /// Requests shutdown. Idempotent; may be called before `serve` starts.
    pub fn shutdown(&self) {
        self.trigger.cancel();
    }

    /// Returns true once shutdown was requested (by any source).
    pub fn is_shutdown(&self) -> bool {
        self.trigger.is_cancelled()
    }
}
