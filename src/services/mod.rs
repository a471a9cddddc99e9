//! # Service abstractions.
//!
//! This module provides the service-related types:
//! - [`Service`] - trait for start/stop controlled components
//! - [`ServiceFn`] - service built from a start and a stop closure
//! - [`ServiceRef`] - shared reference to a service (`Arc<dyn Service>`)

mod service;
mod service_fn;

pub use service::{Service, ServiceRef};
pub use service_fn::ServiceFn;
