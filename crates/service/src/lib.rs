//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod auth;
pub mod errors;
pub mod feedback_service;
pub mod geo;
pub mod menu_service;
pub mod order_service;
pub mod pagination;
pub mod runtime;
pub mod service_area;
#[cfg(test)]
pub mod test_support;
pub mod user_service;
