//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validated JSON extractor
//! - `modules`: per-resource DTOs and handlers, plus request id and metrics middleware
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;
pub mod state;

pub use router::{create_api_router, ApiDoc};
pub use state::AppState;
