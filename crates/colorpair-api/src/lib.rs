//! Axum HTTP API server.
//!
//! This crate provides:
//! - `POST /analyze-image`: garment image in, five pairing colors out
//! - Liveness/readiness probes and Prometheus metrics
//! - CORS, request IDs, and security headers

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use handlers::AnalyzeResponse;
pub use routes::create_router;
pub use state::AppState;
