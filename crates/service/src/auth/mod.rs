//! Auth module: three-layer architecture (domain, repository, service).
//!
//! This module centralizes registration and login business logic under the
//! service crate. Serviceability gating happens in the caller, which checks
//! the supplied coordinates against the service area before registering.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod seaorm;
pub mod service;

pub use service::AuthService;
