//! # API Shared
//!
//! Shared utilities and definitions for the RX APIs.
//!
//! Contains:
//! - Wire types with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//! - Bearer credential parsing
//!
//! Used by `api-rest` and the `rx-run` binary.

pub mod auth;
pub mod dto;
pub mod health;

pub use auth::{bearer_token, AuthHeaderError};
pub use dto::*;
pub use health::HealthService;
