//! Drop-in replacements for the axum extractors that reject with
//! [`Error`](crate::handler::Error).

pub mod enhanced_bytes;
pub mod enhanced_json;
pub mod enhanced_query;

pub use self::enhanced_bytes::RawBody;
pub use self::enhanced_json::Json;
pub use self::enhanced_query::Query;
