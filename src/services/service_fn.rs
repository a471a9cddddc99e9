//! # Closure-backed service (`ServiceFn`)
//!
//! [`ServiceFn`] turns a start closure and a stop closure into a [`Service`].
//! Shared state between the two (a shutdown flag, a `Notify`, a server handle)
//! is captured explicitly through `Arc<...>`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio::sync::Notify;
//! use tokio_util::sync::CancellationToken;
//! use lifevisor::{BoxError, ServiceFn, ServiceRef};
//!
//! let done = Arc::new(Notify::new());
//! let (d1, d2) = (done.clone(), done);
//!
//! let svc: ServiceRef = ServiceFn::arc(
//!     "server",
//!     move || {
//!         let d = d1.clone();
//!         async move { d.notified().await; Ok::<_, BoxError>(()) }
//!     },
//!     move |_ctx: CancellationToken| {
//!         let d = d2.clone();
//!         async move { d.notify_one(); Ok::<_, BoxError>(()) }
//!     },
//! );
//! assert_eq!(svc.name(), "server");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::BoxError;
use crate::services::service::Service;

/// Service built from a start and a stop closure.
#[derive(Debug)]
pub struct ServiceFn<S, T> {
    name: Cow<'static, str>,
    start: S,
    stop: T,
}

impl<S, T> ServiceFn<S, T> {
    /// Creates a new closure-backed service.
    pub fn new(name: impl Into<Cow<'static, str>>, start: S, stop: T) -> Self {
        Self {
            name: name.into(),
            start,
            stop,
        }
    }

    /// Creates the service and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, start: S, stop: T) -> Arc<Self> {
        Arc::new(Self::new(name, start, stop))
    }
}

#[async_trait]
impl<S, SFut, T, TFut> Service for ServiceFn<S, T>
where
    S: Fn() -> SFut + Send + Sync + 'static,
    SFut: Future<Output = Result<(), BoxError>> + Send + 'static,
    T: Fn(CancellationToken) -> TFut + Send + Sync + 'static,
    TFut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self) -> Result<(), BoxError> {
        (self.start)().await
    }

    async fn stop(&self, ctx: CancellationToken) -> Result<(), BoxError> {
        (self.stop)(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_start_and_stop_call_their_closures() {
        let stops = Arc::new(AtomicUsize::new(0));
        let s = stops.clone();
        let svc = ServiceFn::new(
            "svc",
            || async { Err::<(), BoxError>("bind failed".into()) },
            move |_ctx: CancellationToken| {
                let s = s.clone();
                async move {
                    s.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), BoxError>(())
                }
            },
        );

        assert_eq!(svc.start().await.unwrap_err().to_string(), "bind failed");
        svc.stop(CancellationToken::new()).await.unwrap();
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }
}
