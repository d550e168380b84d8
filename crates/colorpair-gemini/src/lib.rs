//! Gemini client for garment color analysis.
//!
//! This crate provides a thin client over the Gemini `generateContent`
//! endpoint that sends one prompt plus one inline image and returns the
//! model's text. The [`ColorAdvisor`] trait is what the HTTP layer depends
//! on, so handlers can be exercised without network access.

pub mod advisor;
pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use advisor::ColorAdvisor;
pub use client::{GeminiClient, GeminiConfig};
pub use error::{GeminiError, GeminiResult};
pub use prompt::build_color_prompt;
pub use types::InlineImage;
