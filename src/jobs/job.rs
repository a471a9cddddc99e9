//! # Job abstraction.
//!
//! A job is a unit of work that runs for the orchestrator's whole lifetime or completes early.
//! It receives a [`CancellationToken`] that is cancelled as soon as shutdown is triggered
//! and should exit promptly once it fires.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::BoxError;

/// Shared handle to a job.
pub type JobRef = Arc<dyn Job>;

/// # Asynchronous, cancelable unit of work.
///
/// A `Job` is invoked exactly once per `serve` run, concurrently with every other job and service.
///
/// - Returning `Ok(())` ends the job quietly; other units keep running.
/// - Returning `Err(_)` triggers shutdown of everything else.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use lifevisor::{BoxError, Job};
///
/// struct Ticker;
///
/// #[async_trait]
/// impl Job for Ticker {
///     fn name(&self) -> &str { "ticker" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), BoxError> {
///         ctx.cancelled().await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Job: Send + Sync + 'static {
    /// Returns a stable, human-readable job name.
    fn name(&self) -> &str;

    /// Runs the job until completion or cancellation.
    async fn run(&self, ctx: CancellationToken) -> Result<(), BoxError>;
}
