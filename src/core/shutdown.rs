//! # Cross-platform OS signal handling.
//!
//! Provides [`SignalListener`], a scoped subscription to the configured [`Signal`]s.
//! It is created at the start of `serve` and dropped on every exit path.
//!
//! ## Signals
//! **Unix platforms:** every [`Signal`] variant maps to its `SIGxxx` counterpart.
//!
//! **Windows platforms:** only [`Signal::Interrupt`] is honored, via [`tokio::signal::ctrl_c`];
//! other variants are ignored.
//!
//! ## Notes
//! Tokio keeps its process-wide handler installed after the listener is dropped,
//! so a signal arriving later is swallowed rather than killing the process.

/// OS signal that can trigger shutdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// `SIGINT` / Ctrl-C.
    Interrupt,
    /// `SIGTERM` (default kill signal, used by systemd/Kubernetes).
    Terminate,
    /// `SIGQUIT`.
    Quit,
    /// `SIGHUP`.
    Hangup,
    /// `SIGUSR1`.
    User1,
    /// `SIGUSR2`.
    User2,
}

#[cfg(unix)]
impl Signal {
    fn kind(self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind;

        match self {
            Signal::Interrupt => SignalKind::interrupt(),
            Signal::Terminate => SignalKind::terminate(),
            Signal::Quit => SignalKind::quit(),
            Signal::Hangup => SignalKind::hangup(),
            Signal::User1 => SignalKind::user_defined1(),
            Signal::User2 => SignalKind::user_defined2(),
        }
    }
}

/// Live subscription to a set of OS signals.
#[cfg(unix)]
pub struct SignalListener {
    streams: Vec<(Signal, tokio::signal::unix::Signal)>,
}

#[cfg(unix)]
impl SignalListener {
    /// Registers a listener for each distinct signal.
    ///
    /// Returns `Err` if any registration fails; nothing stays subscribed in that case.
    pub fn install(signals: &[Signal]) -> std::io::Result<Self> {
        let mut streams: Vec<(Signal, tokio::signal::unix::Signal)> =
            Vec::with_capacity(signals.len());
        for &sig in signals {
            if streams.iter().any(|(s, _)| *s == sig) {
                continue;
            }
            streams.push((sig, tokio::signal::unix::signal(sig.kind())?));
        }
        Ok(Self { streams })
    }

    /// Completes with the first subscribed signal received.
    ///
    /// Never completes if the listener has no signals.
    pub async fn recv(&mut self) -> Signal {
        if self.streams.is_empty() {
            return std::future::pending().await;
        }

        let waits = self.streams.iter_mut().map(|(sig, stream)| {
            let sig = *sig;
            Box::pin(async move {
                if stream.recv().await.is_none() {
                    std::future::pending::<()>().await;
                }
                sig
            })
        });
        let (sig, _, _) = futures::future::select_all(waits).await;
        sig
    }
}

/// Live subscription to a set of OS signals.
#[cfg(not(unix))]
pub struct SignalListener {
    ctrl_c: bool,
}

#[cfg(not(unix))]
impl SignalListener {
    /// Registers interest in Ctrl-C if [`Signal::Interrupt`] is requested.
    pub fn install(signals: &[Signal]) -> std::io::Result<Self> {
        Ok(Self {
            ctrl_c: signals.contains(&Signal::Interrupt),
        })
    }

    /// Completes when Ctrl-C is received.
    pub async fn recv(&mut self) -> Signal {
        if self.ctrl_c && tokio::signal::ctrl_c().await.is_ok() {
            return Signal::Interrupt;
        }
        std::future::pending().await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_install_dedups_signals() {
        let listener =
            SignalListener::install(&[Signal::Hangup, Signal::Hangup, Signal::Quit]).unwrap();
        assert_eq!(listener.streams.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_listener_never_fires() {
        let mut listener = SignalListener::install(&[]).unwrap();
        let res = tokio::time::timeout(Duration::from_millis(20), listener.recv()).await;
        assert!(res.is_err());
    }
}
