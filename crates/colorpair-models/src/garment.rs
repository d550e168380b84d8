//! Garment type submitted alongside an image.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which part of an outfit the uploaded image shows.
///
/// The form field is free text. `top` and `bottom` are the expected values,
/// anything else is kept as-is and still forwarded to the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GarmentType {
    /// Worn on the upper body
    Top,
    /// Worn on the lower body
    Bottom,
    /// Unrecognized label, preserved verbatim
    Other(String),
}

impl GarmentType {
    /// Label used when describing the garment to the model.
    pub fn as_str(&self) -> &str {
        match self {
            GarmentType::Top => "top",
            GarmentType::Bottom => "bottom",
            GarmentType::Other(label) => label,
        }
    }

    /// Whether the label was one of the expected values.
    pub fn is_known(&self) -> bool {
        !matches!(self, GarmentType::Other(_))
    }
}

impl fmt::Display for GarmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GarmentType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "top" => GarmentType::Top,
            "bottom" => GarmentType::Bottom,
            _ => GarmentType::Other(s.to_string()),
        })
    }
}

impl From<&str> for GarmentType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(garment) => garment,
            Err(never) => match never {},
        }
    }
}
