//! # API Shared
//!
//! Shared wire types for MedPlat APIs.
//!
//! Contains:
//! - JSON request/response types with OpenAPI schemas (`wire` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and by anything that talks to it.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
