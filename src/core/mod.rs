//! Runtime core: coordination and lifecycle.
//!
//! The public API from this module is [`Orchestrator`] (plus [`ShutdownHandle`] and [`Signal`]),
//! which starts jobs and services, waits for a shutdown trigger and drains everything under a deadline.
//!
//! Internal modules:
//! - [`orchestrator`]: registration and the `serve` protocol;
//! - [`units`]: job unit, service starter/stopper pair, unit bookkeeping;
//! - [`gate`]: first-error-wins result cell;
//! - [`shutdown`]: cross-platform OS signal subscription.

mod gate;
mod orchestrator;
mod shutdown;
mod units;

pub use orchestrator::{Orchestrator, ShutdownHandle};
pub use shutdown::Signal;
