//! Shared service types.

mod health;

pub use health::{ServiceHealth, ServiceStatus};
