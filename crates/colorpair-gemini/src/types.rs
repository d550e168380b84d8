//! Gemini `generateContent` request/response types.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// Image bytes sent inline with a prompt.
#[derive(Debug, Clone)]
pub struct InlineImage {
    /// Declared MIME type, e.g. `image/jpeg`
    pub mime_type: String,
    /// Raw (not yet encoded) image bytes
    pub data: Vec<u8>,
}

impl InlineImage {
    /// Create a new inline image.
    pub fn new(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Size of the raw image in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no image bytes were uploaded.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn to_part(&self) -> Part {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: self.mime_type.clone(),
                data: general_purpose::STANDARD.encode(&self.data),
            },
        }
    }
}

/// Gemini API request.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub content: Option<ResponseContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    pub fn first_text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Explanation for a response without text.
    pub fn empty_reason(&self) -> String {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return format!("prompt blocked ({})", reason);
        }
        match self.candidates.first() {
            None => "no candidates".to_string(),
            Some(c) => match c.finish_reason.as_deref() {
                Some(reason) => format!("finish reason {}", reason),
                None => "candidate has no text".to_string(),
            },
        }
    }
}
