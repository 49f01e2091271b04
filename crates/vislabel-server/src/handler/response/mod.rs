//! Response types for HTTP handlers.

mod errors;
mod monitors;

pub use errors::ErrorResponse;
pub use monitors::MonitorStatus;
