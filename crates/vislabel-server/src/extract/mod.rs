//! Request extractors with consistent JSON error responses.
//!
//! - [`Json`] - JSON body deserialization
//! - [`Query`] - query string deserialization
//! - [`RawBody`] - raw request body bytes
//!
//! Every rejection is converted into the handler [`Error`] type, so malformed
//! requests answer with the same body shape as detection failures.
//!
//! [`Error`]: crate::handler::Error

pub mod reject;

pub use crate::extract::reject::{Json, Query, RawBody};
