//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Observability: request ids and trace spans
//! - Recovery: timeouts and panics turned into JSON errors
//! - Security: body size limit and response hardening headers
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use vislabel_server::middleware::{
//!     RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt, SecurityConfig,
//! };
//!
//! let app = routes()
//!     .with_state(state)
//!     .with_security(&SecurityConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod observability;
mod recovery;
mod security;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{DEFAULT_MAX_BODY_SIZE, RouterSecurityExt, SecurityConfig};
