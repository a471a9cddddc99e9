//! # Concurrent units spawned by `serve`.
//!
//! One unit per job, two per service:
//! ```text
//! job unit:     job.run(child_of(trigger)) ──Err──► gate.commit(Job)
//!
//! starter:      svc.start() ──► StartOutcome ──(oneshot)──┐
//!                                                         ▼
//! stopper:      select! { biased;
//!                 outcome  ─► Failed(e)  ─► gate.commit(e), exit (no stop)
//!                          ─► Returned   ─► wait for trigger, then stop
//!                 trigger  ─► svc.stop(stop_ctx) ──Err──► gate.commit(ServiceStop)
//!               }
//! ```
//!
//! ## Rules
//! - The starter never commits: a start failure is routed through the stopper so
//!   that it decides, in one place, whether `stop` is called at all.
//! - `stop` is never invoked before the trigger fires.
//! - Panics inside `run`/`start`/`stop` are caught and turned into [`ServeError::Panicked`].
//! - [`Units`] remembers which units are still running, for the shutdown-timeout report.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::gate::ErrorGate;
use crate::error::ServeError;
use crate::jobs::JobRef;
use crate::services::ServiceRef;

/// Result of a service's `start` call, handed from starter to stopper.
pub enum StartOutcome {
    /// `start` returned `Ok`: the service ran and left on its own.
    Returned,
    /// `start` failed or panicked: the service must not be stopped.
    Failed(ServeError),
}

/// Runs one job and commits its failure, if any.
pub async fn run_job(job: JobRef, ctx: CancellationToken, gate: Arc<ErrorGate>) {
    let label = job_label(&job);
    debug!(unit = %label, "job running");

    match guarded(&label, job.run(ctx)).await {
        Ok(Ok(())) => debug!(unit = %label, "job finished"),
        Ok(Err(source)) => {
            warn!(unit = %label, error = %source, "job failed");
            gate.commit(ServeError::Job {
                job: job.name().to_string(),
                source,
            });
        }
        Err(panicked) => {
            warn!(unit = %label, error = %panicked, "job panicked");
            gate.commit(panicked);
        }
    }
}

/// Runs `start` and reports the outcome to the paired stopper.
pub async fn run_starter(svc: ServiceRef, outcome: oneshot::Sender<StartOutcome>) {
    let label = start_label(&svc);
    debug!(unit = %label, "service starting");

    let res = match guarded(&label, svc.start()).await {
        Ok(Ok(())) => StartOutcome::Returned,
        Ok(Err(source)) => StartOutcome::Failed(ServeError::ServiceStart {
            service: svc.name().to_string(),
            source,
        }),
        Err(panicked) => StartOutcome::Failed(panicked),
    };

    if outcome.send(res).is_err() {
        debug!(unit = %label, "start outcome dropped, service already stopped");
    }
}

/// Waits for shutdown or a start failure, then stops the service if it started.
pub async fn run_stopper(
    svc: ServiceRef,
    mut outcome: oneshot::Receiver<StartOutcome>,
    trigger: CancellationToken,
    stop_ctx: CancellationToken,
    gate: Arc<ErrorGate>,
) {
    let label = stop_label(&svc);

    let settled = tokio::select! {
        biased;
        res = &mut outcome => Some(res),
        _ = trigger.cancelled() => None,
    };
    let start_settled = settled.is_some();

    if let Some(res) = settled {
        match res {
            Ok(StartOutcome::Failed(err)) => {
                warn!(unit = %label, error = %err, "service failed to start, skipping stop");
                gate.commit(err);
                return;
            }
            Ok(StartOutcome::Returned) | Err(_) => {
                debug!(unit = %label, "service start returned before shutdown");
                trigger.cancelled().await;
            }
        }
    }

    debug!(unit = %label, "service stopping");
    match guarded(&label, svc.stop(stop_ctx)).await {
        Ok(Ok(())) => debug!(unit = %label, "service stopped"),
        Ok(Err(source)) => {
            warn!(unit = %label, error = %source, "service failed to stop");
            gate.commit(ServeError::ServiceStop {
                service: svc.name().to_string(),
                source,
            });
        }
        Err(panicked) => {
            warn!(unit = %label, error = %panicked, "service stop panicked");
            gate.commit(panicked);
        }
    }

    if !start_settled && let Ok(StartOutcome::Failed(err)) = outcome.try_recv() {
        debug!(unit = %label, error = %err, "start error after stop discarded");
    }
}

/// Spawned units of one `serve` run, with their labels.
#[derive(Default)]
pub struct Units {
    set: JoinSet<usize>,
    running: Vec<Option<String>>,
}

impl Units {
    /// Spawns `fut` as a unit named `label`.
    pub fn spawn<F>(&mut self, label: String, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let idx = self.running.len();
        self.running.push(Some(label));
        self.set.spawn(async move {
            fut.await;
            idx
        });
    }

    /// Number of units still running.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Waits for the next unit to finish; `None` once all are done.
    pub async fn join_next(&mut self) -> Option<()> {
        let res = self.set.join_next().await?;
        self.reap(res);
        Some(())
    }

    /// Waits for every unit to finish.
    pub async fn drain(&mut self) {
        while self.join_next().await.is_some() {}
    }

    /// Labels of units still running, in spawn order.
    pub fn stuck(&self) -> Vec<String> {
        self.running.iter().flatten().cloned().collect()
    }

    /// Aborts every unit still running at its next `.await`.
    pub fn abort_all(&mut self) {
        self.set.abort_all();
    }

    fn reap(&mut self, res: Result<usize, JoinError>) {
        match res {
            Ok(idx) => {
                if let Some(slot) = self.running.get_mut(idx) {
                    *slot = None;
                }
            }
            Err(e) => warn!(error = %e, "unit terminated abnormally"),
        }
    }
}

pub fn job_label(job: &JobRef) -> String {
    format!("job:{}", job.name())
}

pub fn start_label(svc: &ServiceRef) -> String {
    format!("start:{}", svc.name())
}

pub fn stop_label(svc: &ServiceRef) -> String {
    format!("stop:{}", svc.name())
}

/// Runs `fut`, converting a panic into [`ServeError::Panicked`].
async fn guarded<F: Future>(label: &str, fut: F) -> Result<F::Output, ServeError> {
    AssertUnwindSafe(fut)
        .catch_unwind()
        .await
        .map_err(|panic_err| ServeError::Panicked {
            unit: label.to_string(),
            info: panic_info(&*panic_err),
        })
}

fn panic_info(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_panic_info_extracts_strings() {
        assert_eq!(panic_info(&"static"), "static");
        assert_eq!(panic_info(&String::from("owned")), "owned");
        assert_eq!(panic_info(&42_u8), "unknown panic");
    }

    #[tokio::test]
    async fn test_guarded_catches_panic() {
        let res: Result<(), ServeError> = guarded("job:x", async {
            panic!("kaboom");
        })
        .await;
        match res {
            Err(ServeError::Panicked { unit, info }) => {
                assert_eq!(unit, "job:x");
                assert_eq!(info, "kaboom");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_units_report_stuck_labels() {
        let mut units = Units::default();
        units.spawn("fast".into(), async {});
        units.spawn("slow".into(), std::future::pending());

        let res = tokio::time::timeout(Duration::from_millis(50), units.drain()).await;
        assert!(res.is_err());
        assert_eq!(units.stuck(), vec!["slow".to_string()]);
        assert_eq!(units.len(), 1);
        units.abort_all();
    }
}
