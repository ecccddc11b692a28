//! Service-area module: the geodesic gate for registration and delivery.
//!
//! Three-layer layout (domain, store, service) mirroring the auth module.
//! The resolver re-reads the settings store on every check and falls back
//! to process environment variables when the store cannot be read.

pub mod domain;
pub mod env_file;
pub mod errors;
pub mod seaorm;
pub mod service;
pub mod store;

pub use service::ServiceAreaService;
