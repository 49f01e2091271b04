//! Request types for HTTP handlers.

mod labels;

pub use labels::*;
