//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `spotter-server`.

pub mod analyze;
pub mod general;
pub mod models;
pub mod upload;

// Re-export all handlers so the router can reach them under `handlers::`.
pub use analyze::*;
pub use general::*;
pub use models::*;
pub use upload::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState};
