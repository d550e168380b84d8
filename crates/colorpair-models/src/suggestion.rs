//! Color suggestion model.

use std::sync::LazyLock;

use regex_lite::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of suggestions returned for every analyzed garment.
pub const SUGGESTION_COUNT: usize = 5;

/// Name used when the model omits `ColorName`.
pub const DEFAULT_COLOR_NAME: &str = "Unknown Color";

/// Hex code used when the model omits `hexCode`.
pub const DEFAULT_HEX_CODE: &str = "#000000";

/// Description used when the model omits `description`.
pub const DEFAULT_DESCRIPTION: &str = "No description available";

const FILLER_COLOR_NAME: &str = "Neutral Gray";
const FILLER_HEX_CODE: &str = "#808080";
const FILLER_DESCRIPTION: &str = "A versatile neutral color";

static HEX_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex pattern"));

/// A single color that pairs with the analyzed garment.
///
/// Wire keys follow the format the frontend already consumes
/// (`ColorName`, `hexCode`, `description`). Values are kept exactly as the
/// model sent them, so a non-string value is echoed back as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColorSuggestion {
    /// Short human-readable label, e.g. "Navy Blue"
    #[serde(rename = "ColorName")]
    pub color_name: Value,

    /// Expected to be `#RRGGBB`, but not enforced
    #[serde(rename = "hexCode")]
    pub hex_code: Value,

    /// Why the color works with the garment
    pub description: Value,
}

impl ColorSuggestion {
    /// Create a new suggestion.
    pub fn new(
        color_name: impl Into<Value>,
        hex_code: impl Into<Value>,
        description: impl Into<Value>,
    ) -> Self {
        Self {
            color_name: color_name.into(),
            hex_code: hex_code.into(),
            description: description.into(),
        }
    }

    /// The neutral record appended when the model returns fewer than
    /// [`SUGGESTION_COUNT`] suggestions.
    pub fn filler() -> Self {
        Self::new(FILLER_COLOR_NAME, FILLER_HEX_CODE, FILLER_DESCRIPTION)
    }

    /// Whether `hex_code` is a string that looks like `#RRGGBB`.
    pub fn has_valid_hex(&self) -> bool {
        self.hex_code
            .as_str()
            .is_some_and(|hex| HEX_CODE_PATTERN.is_match(hex))
    }
}

impl Default for ColorSuggestion {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR_NAME, DEFAULT_HEX_CODE, DEFAULT_DESCRIPTION)
    }
}
