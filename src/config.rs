//! # Orchestrator configuration.
//!
//! Provides [`Config`] and the option mutators used to build it.
//!
//! A config is built in one pass:
//! 1. start from a zero value (no deadline, no signals);
//! 2. apply each [`ConfigOption`] left to right;
//! 3. fill defaults for whatever is still unset.
//!
//! ## Option semantics
//! - [`with_shutdown_timeout`]: scalar, later options overwrite earlier ones; `0s` is ignored.
//! - [`with_interrupt_signals`]: set-valued, appends; an empty list is ignored.
//!
//! ## Defaults
//! - `shutdown_timeout = None` (drain waits indefinitely)
//! - `signals = [Interrupt, Terminate]` (only if no option added any)
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use lifevisor::{Config, Signal, with_interrupt_signals, with_shutdown_timeout};
//!
//! let cfg = Config::from_options([
//!     with_shutdown_timeout(Duration::from_secs(5)),
//!     with_interrupt_signals([Signal::Hangup]),
//! ]);
//! assert_eq!(cfg.shutdown_timeout(), Some(Duration::from_secs(5)));
//! assert_eq!(cfg.signals(), &[Signal::Hangup]);
//! ```

use std::fmt;
use std::time::Duration;

use crate::core::Signal;

/// Signals that trigger shutdown when no option sets any.
pub const DEFAULT_SIGNALS: [Signal; 2] = [Signal::Interrupt, Signal::Terminate];

/// Orchestrator settings, immutable once the orchestrator is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    shutdown_timeout: Option<Duration>,
    signals: Vec<Signal>,
}

impl Config {
    /// Builds a config from option mutators applied in order, then fills defaults.
    ///
    /// Items may be [`ConfigOption`] or `Option<ConfigOption>`; `None` entries are skipped.
    pub fn from_options<I>(opts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<ConfigOption>>,
    {
        let mut cfg = Self {
            shutdown_timeout: None,
            signals: Vec::new(),
        };
        for opt in opts.into_iter().filter_map(Into::into) {
            opt.apply(&mut cfg);
        }
        cfg.fill_defaults();
        cfg
    }

    /// Maximum time allowed to drain all units after shutdown is triggered.
    ///
    /// - `None` → wait indefinitely
    /// - `Some(d)` → give up after `d` with [`ServeError::ShutdownTimeout`](crate::ServeError::ShutdownTimeout)
    #[inline]
    pub fn shutdown_timeout(&self) -> Option<Duration> {
        self.shutdown_timeout
    }

    /// OS signals that trigger shutdown, in registration order.
    #[inline]
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    fn fill_defaults(&mut self) {
        if self.signals.is_empty() {
            self.signals.extend(DEFAULT_SIGNALS);
        }
    }
}

impl Default for Config {
    /// Same as `Config::from_options` with no options.
    fn default() -> Self {
        Self::from_options(std::iter::empty::<ConfigOption>())
    }
}

/// A validated mutator applied to a [`Config`] under construction.
///
/// Built by [`with_shutdown_timeout`] and [`with_interrupt_signals`], or by
/// [`ConfigOption::new`] for custom setups.
pub struct ConfigOption(Box<dyn FnOnce(&mut Config) + Send>);

impl ConfigOption {
    /// Wraps an arbitrary mutator.
    pub fn new(f: impl FnOnce(&mut Config) + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    fn apply(self, cfg: &mut Config) {
        (self.0)(cfg)
    }
}

impl fmt::Debug for ConfigOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfigOption")
    }
}

/// Sets the shutdown deadline. A zero duration is ignored (no deadline).
pub fn with_shutdown_timeout(timeout: Duration) -> ConfigOption {
    ConfigOption::new(move |cfg| {
        if timeout > Duration::ZERO {
            cfg.shutdown_timeout = Some(timeout);
        }
    })
}

/// Adds signals that trigger shutdown. An empty list is ignored.
///
/// When no option adds any signal, [`DEFAULT_SIGNALS`] are used.
pub fn with_interrupt_signals(signals: impl IntoIterator<Item = Signal>) -> ConfigOption {
    let signals: Vec<Signal> = signals.into_iter().collect();
    ConfigOption::new(move |cfg| {
        if !signals.is_empty() {
            cfg.signals.extend(signals);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_options() {
        let cfg = Config::from_options(Vec::<ConfigOption>::new());
        assert_eq!(cfg.shutdown_timeout(), None);
        assert_eq!(cfg.signals(), &DEFAULT_SIGNALS);
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_zero_timeout_ignored() {
        let cfg = Config::from_options([with_shutdown_timeout(Duration::ZERO)]);
        assert_eq!(cfg.shutdown_timeout(), None);
    }

    #[test]
    fn test_later_timeout_overwrites() {
        let cfg = Config::from_options([
            with_shutdown_timeout(Duration::from_secs(1)),
            with_shutdown_timeout(Duration::ZERO),
            with_shutdown_timeout(Duration::from_secs(3)),
        ]);
        assert_eq!(cfg.shutdown_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_signals_append_and_skip_defaults() {
        let cfg = Config::from_options([
            with_interrupt_signals([Signal::User1]),
            with_interrupt_signals([]),
            with_interrupt_signals([Signal::Hangup, Signal::Quit]),
        ]);
        assert_eq!(
            cfg.signals(),
            &[Signal::User1, Signal::Hangup, Signal::Quit]
        );
    }

    #[test]
    fn test_empty_signal_list_falls_back_to_defaults() {
        let cfg = Config::from_options([with_interrupt_signals([])]);
        assert_eq!(cfg.signals(), &DEFAULT_SIGNALS);
    }

    #[test]
    fn test_none_options_skipped() {
        let cfg = Config::from_options([
            None,
            Some(with_shutdown_timeout(Duration::from_millis(250))),
            None,
        ]);
        assert_eq!(cfg.shutdown_timeout(), Some(Duration::from_millis(250)));
    }
}
