//! # First-error-wins gate.
//!
//! [`ErrorGate`] is the single result cell shared by every unit of one `serve` run.
//!
//! ## Rules
//! - The first [`commit`](ErrorGate::commit) stores its error; later ones are dropped.
//! - The winner is decided and stored under one lock, so a losing commit always
//!   finds an error already in place.
//! - Once [`take`](ErrorGate::take)n, the gate stays sealed.
//! - Every commit, winning or not, cancels the termination trigger (idempotent).

use std::sync::{Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ServeError;

/// Contents of the gate.
#[derive(Debug)]
enum Slot {
    Empty,
    Set(ServeError),
    Taken,
}

/// Single-assignment error cell tied to the termination trigger.
pub struct ErrorGate {
    slot: Mutex<Slot>,
    trigger: CancellationToken,
}

impl ErrorGate {
    /// Creates an empty gate that fires `trigger` on commit.
    pub fn new(trigger: CancellationToken) -> Self {
        Self {
            slot: Mutex::new(Slot::Empty),
            trigger,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Records `err` if no error was committed yet, then fires the trigger.
    ///
    /// Returns `true` if this call won the gate.
    pub fn commit(&self, err: ServeError) -> bool {
        let won = {
            let mut slot = self.lock();
            if matches!(*slot, Slot::Empty) {
                debug!(label = err.as_label(), error = %err, "first error committed");
                *slot = Slot::Set(err);
                true
            } else {
                debug!(label = err.as_label(), error = %err, "error discarded, gate already committed");
                false
            }
        };
        self.trigger.cancel();
        won
    }

    /// Takes the committed error, leaving the gate sealed.
    pub fn take(&self) -> Option<ServeError> {
        match std::mem::replace(&mut *self.lock(), Slot::Taken) {
            Slot::Set(err) => Some(err),
            Slot::Empty | Slot::Taken => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn job_err(name: &str) -> ServeError {
        ServeError::Job {
            job: name.into(),
            source: "boom".into(),
        }
    }

    #[test]
    fn test_first_commit_wins() {
        let trigger = CancellationToken::new();
        let gate = ErrorGate::new(trigger.clone());

        assert!(gate.commit(job_err("a")));
        assert!(!gate.commit(job_err("b")));
        assert!(trigger.is_cancelled());

        match gate.take() {
            Some(ServeError::Job { job, .. }) => assert_eq!(job, "a"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(gate.take().is_none());
    }

    #[test]
    fn test_commit_after_take_is_dropped() {
        let gate = ErrorGate::new(CancellationToken::new());
        gate.commit(job_err("a"));
        gate.take();
        assert!(!gate.commit(job_err("late")));
        assert!(gate.take().is_none());
    }

    #[test]
    fn test_losing_commit_sees_stored_error() {
        let gate = Arc::new(ErrorGate::new(CancellationToken::new()));

        let held = gate.lock();
        let g = gate.clone();
        let writer = std::thread::spawn(move || g.commit(job_err("first")));
        std::thread::sleep(std::time::Duration::from_millis(50));
        assert!(!writer.is_finished(), "commit must wait for the slot");
        drop(held);

        assert!(writer.join().unwrap());
        let timeout = ServeError::ShutdownTimeout {
            timeout: std::time::Duration::from_millis(10),
            stuck: vec!["stop:x".into()],
        };
        assert!(!gate.commit(timeout));
        match gate.take() {
            Some(ServeError::Job { job, .. }) => assert_eq!(job, "first"),
            other => panic!("losing commit left the gate empty: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_commits_store_exactly_one() {
        let gate = Arc::new(ErrorGate::new(CancellationToken::new()));
        let mut handles = Vec::new();
        for i in 0..32 {
            let g = gate.clone();
            handles.push(tokio::spawn(async move { g.commit(job_err(&i.to_string())) }));
        }

        let mut winners = 0;
        for h in handles {
            if h.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert!(gate.take().is_some());
    }
}
