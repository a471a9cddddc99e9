//! # Service abstraction.
//!
//! A service is a long-running component controlled by two calls:
//! - [`Service::start`] blocks for the service's whole run;
//! - [`Service::stop`] asks it to terminate, bounded by the shutdown deadline.
//!
//! ## Lifecycle
//! ```text
//! Registered ─► Starting ─► Running ─► Stopping ─► Stopped
//!                   └─► StartFailed (stop is never called)
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::BoxError;

/// Shared handle to a service.
pub type ServiceRef = Arc<dyn Service>;

/// # Start/stop controlled component.
///
/// `start` and `stop` are called from different tasks, so `stop` must be able to
/// make a running `start` return (e.g. by signalling through shared state).
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio::sync::Notify;
/// use tokio_util::sync::CancellationToken;
/// use lifevisor::{BoxError, Service};
///
/// #[derive(Default)]
/// struct Server { done: Notify }
///
/// #[async_trait]
/// impl Service for Server {
///     fn name(&self) -> &str { "server" }
///
///     async fn start(&self) -> Result<(), BoxError> {
///         self.done.notified().await;
///         Ok(())
///     }
///
///     async fn stop(&self, _ctx: CancellationToken) -> Result<(), BoxError> {
///         self.done.notify_one();
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Returns a stable, human-readable service name.
    fn name(&self) -> &str;

    /// Runs the service; returns when it stops or fails.
    ///
    /// An error here means the service never started: shutdown is triggered and
    /// [`stop`](Service::stop) is not called.
    async fn start(&self) -> Result<(), BoxError>;

    /// Requests graceful termination.
    ///
    /// `ctx` is cancelled when the shutdown deadline elapses, immediately before
    /// the pending `stop` future is dropped. It marks an abandoned stop: work that
    /// must outlive the deadline (e.g. a spawned cleanup task) can watch it, but the
    /// `stop` call itself gets no further chance to return. It is never cancelled if
    /// no deadline is configured.
    async fn stop(&self, ctx: CancellationToken) -> Result<(), BoxError>;
}
