//! # lifevisor
//!
//! **Lifevisor** is a process lifecycle orchestrator for Tokio applications.
//!
//! It starts a set of long-running services and jobs concurrently, watches for an OS
//! signal or any component failure, and drives a coordinated, time-bounded shutdown of
//! everything still running.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │     Job      │   │   Service    │   │   Service    │
//!     │ (run(ctx))   │   │(start / stop)│   │(start / stop)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Orchestrator::serve()                                            │
//! │  - SignalListener (configured OS signals)                         │
//! │  - trigger (CancellationToken, "shutdown requested")              │
//! │  - ErrorGate (first error wins, fires trigger)                    │
//! │  - Units (JoinSet of job / starter / stopper tasks)               │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     job unit          starter ──(outcome)──► stopper
//!        │                  │                  │
//!        │ Err ─► gate      │ Err ─► stopper   │ start failed ─► gate, no stop
//!        │                  │                  │ trigger      ─► stop(stop_ctx)
//!        ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bounded drain: wait for all units, at most `shutdown_timeout`     │
//! │  elapsed ─► ServeError::ShutdownTimeout { stuck }                 │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Orchestrator::new(options) ──► add_jobs / add_services ──► serve()
//!
//! serve():
//!   ├─► install signal listener           (Err → ServeError::Signal, nothing started)
//!   ├─► spawn one unit per job, two per service
//!   ├─► wait for trigger:
//!   │       ├─ OS signal
//!   │       ├─ ShutdownHandle::shutdown()
//!   │       └─ first failure committed to the gate
//!   ├─► drain units (bounded by shutdown_timeout)
//!   └─► return first error, or Ok(())
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / traits                         |
//! |-------------------|-------------------------------------------------------------|--------------------------------------------|
//! | **Orchestration** | Register components and run the coordinated lifecycle.      | [`Orchestrator`], [`ShutdownHandle`]       |
//! | **Jobs**          | Cancelable units of work, as traits or closures.            | [`Job`], [`JobFn`], [`JobRef`]             |
//! | **Services**      | Start/stop controlled components, as traits or closures.    | [`Service`], [`ServiceFn`], [`ServiceRef`] |
//! | **Configuration** | Shutdown deadline and trigger signals via option mutators.  | [`Config`], [`ConfigOption`], [`Signal`]   |
//! | **Errors**        | Typed first-error result, with a shutdown-timeout sentinel. | [`ServeError`], [`BoxError`]               |
//!
//! ## Diagnostics
//! The crate emits [`tracing`] events at lifecycle points and never installs a subscriber.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use lifevisor::{
//!     BoxError, JobFn, JobRef, Orchestrator, ServiceFn, ServiceRef, Signal,
//!     with_interrupt_signals, with_shutdown_timeout,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stopped = CancellationToken::new();
//!     let (run, halt) = (stopped.clone(), stopped.clone());
//!
//!     let server: ServiceRef = ServiceFn::arc(
//!         "server",
//!         move || {
//!             let run = run.clone();
//!             async move { run.cancelled().await; Ok::<_, BoxError>(()) }
//!         },
//!         move |_ctx: CancellationToken| {
//!             let halt = halt.clone();
//!             async move { halt.cancel(); Ok::<_, BoxError>(()) }
//!         },
//!     );
//!
//!     let failing: JobRef = JobFn::arc("migrations", |_ctx: CancellationToken| async {
//!         Err::<(), BoxError>("database unreachable".into())
//!     });
//!
//!     let err = Orchestrator::new([
//!         with_shutdown_timeout(Duration::from_secs(5)),
//!         with_interrupt_signals([Signal::Interrupt, Signal::Terminate]),
//!     ])
//!     .add_services([server])
//!     .add_jobs([failing])
//!     .serve()
//!     .await
//!     .unwrap_err();
//!
//!     assert_eq!(err.as_label(), "job_failed");
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod jobs;
mod services;

// ---- Public re-exports ----

pub use config::{
    Config, ConfigOption, DEFAULT_SIGNALS, with_interrupt_signals, with_shutdown_timeout,
};
pub use crate::core::{Orchestrator, ShutdownHandle, Signal};
pub use error::{BoxError, ServeError};
pub use jobs::{Job, JobFn, JobRef};
pub use services::{Service, ServiceFn, ServiceRef};
