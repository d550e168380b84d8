//! Shared data models for the ColorPair backend.
//!
//! This crate provides:
//! - The `ColorSuggestion` record returned to clients
//! - The garment type submitted with an image
//! - Normalization of raw AI text into exactly five suggestions

pub mod garment;
pub mod normalize;
pub mod suggestion;

// Re-export common types
pub use garment::GarmentType;
pub use normalize::{
    extract_json_array, format_suggestion, normalize_reply, normalize_suggestions,
    pad_and_truncate, parse_ai_response, NormalizeError, NormalizedReply,
};
pub use suggestion::{ColorSuggestion, SUGGESTION_COUNT};
