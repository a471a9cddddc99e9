//! Error types used by the orchestrator.
//!
//! - [`ServeError`]: the single error returned by [`Orchestrator::serve`](crate::Orchestrator::serve).
//! - [`BoxError`]: the error type jobs and services return.
//!
//! [`ServeError`] provides helper methods (`as_label`, `as_message`) for logging/metrics,
//! and [`ServeError::is_shutdown_timeout`] to tell "something failed" apart from
//! "something failed to stop in time".

use std::time::Duration;
use thiserror::Error;

/// Error type returned by user components ([`Job`](crate::Job), [`Service`](crate::Service)).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced by a `serve` run.
///
/// Only the first error committed during one run is ever returned;
/// the original component error is kept as the [`source`](std::error::Error::source).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServeError {
    /// A job returned an error while running.
    #[error("job {job:?} failed: {source}")]
    Job {
        /// Name of the failed job.
        job: String,
        /// Error returned by the job.
        #[source]
        source: BoxError,
    },

    /// `Service::start` returned an error; `Service::stop` was not called.
    #[error("service {service:?} failed to start: {source}")]
    ServiceStart {
        /// Name of the failed service.
        service: String,
        /// Error returned by `start`.
        #[source]
        source: BoxError,
    },

    /// `Service::stop` returned an error during shutdown.
    #[error("service {service:?} failed to stop: {source}")]
    ServiceStop {
        /// Name of the failed service.
        service: String,
        /// Error returned by `stop`.
        #[source]
        source: BoxError,
    },

    /// Shutdown deadline elapsed before every unit finished.
    #[error("shutdown timeout {timeout:?} exceeded; stuck: {stuck:?}")]
    ShutdownTimeout {
        /// The configured shutdown deadline.
        timeout: Duration,
        /// Units still running when the deadline elapsed.
        stuck: Vec<String>,
    },

    /// A job, `start` or `stop` panicked.
    #[error("{unit} panicked: {info}")]
    Panicked {
        /// Label of the panicked unit (e.g. `job:worker`, `start:http`).
        unit: String,
        /// Panic payload, if it was a string.
        info: String,
    },

    /// OS signal listener could not be installed.
    #[error("failed to install signal listener: {0}")]
    Signal(#[from] std::io::Error),
}

impl ServeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use lifevisor::ServeError;
    /// use std::time::Duration;
    ///
    /// let err = ServeError::ShutdownTimeout { timeout: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "shutdown_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ServeError::Job { .. } => "job_failed",
            ServeError::ServiceStart { .. } => "service_start_failed",
            ServeError::ServiceStop { .. } => "service_stop_failed",
            ServeError::ShutdownTimeout { .. } => "shutdown_timeout",
            ServeError::Panicked { .. } => "unit_panicked",
            ServeError::Signal(_) => "signal_listener",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ServeError::Job { job, source } => format!("job={job} error: {source}"),
            ServeError::ServiceStart { service, source } => {
                format!("service={service} start error: {source}")
            }
            ServeError::ServiceStop { service, source } => {
                format!("service={service} stop error: {source}")
            }
            ServeError::ShutdownTimeout { timeout, stuck } => {
                format!("timeout exceeded after {timeout:?}; stuck units={stuck:?}")
            }
            ServeError::Panicked { unit, info } => format!("unit={unit} panic: {info}"),
            ServeError::Signal(e) => format!("signal listener: {e}"),
        }
    }

    /// Indicates whether this is the shutdown-timeout sentinel.
    ///
    /// # Example
    /// ```
    /// use lifevisor::ServeError;
    /// use std::time::Duration;
    ///
    /// let err = ServeError::ShutdownTimeout { timeout: Duration::from_secs(1), stuck: vec![] };
    /// assert!(err.is_shutdown_timeout());
    /// ```
    pub fn is_shutdown_timeout(&self) -> bool {
        matches!(self, ServeError::ShutdownTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn test_source_is_component_error() {
        let err = ServeError::Job {
            job: "worker".into(),
            source: Box::new(Boom),
        };
        let src = err.source().expect("source");
        assert!(src.downcast_ref::<Boom>().is_some());
        assert_eq!(err.to_string(), "job \"worker\" failed: boom");
    }

    #[test]
    fn test_labels_are_stable() {
        let start = ServeError::ServiceStart {
            service: "http".into(),
            source: "bind".into(),
        };
        assert_eq!(start.as_label(), "service_start_failed");
        assert!(!start.is_shutdown_timeout());

        let panicked = ServeError::Panicked {
            unit: "job:x".into(),
            info: "oops".into(),
        };
        assert_eq!(panicked.as_label(), "unit_panicked");
        assert_eq!(panicked.as_message(), "unit=job:x panic: oops");
    }

    #[test]
    fn test_signal_from_io() {
        let err: ServeError = std::io::Error::other("no signals").into();
        assert_eq!(err.as_label(), "signal_listener");
    }
}
