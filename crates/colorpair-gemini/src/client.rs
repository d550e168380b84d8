//! Gemini HTTP client.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{GeminiError, GeminiResult};
use crate::types::{Content, GenerateContentRequest, GenerateContentResponse, InlineImage, Part};

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Public Generative Language API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for the Gemini client.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API credential, sent as `x-goog-api-key`
    pub api_key: String,
    /// Model name, e.g. `gemini-1.5-flash`
    pub model: String,
    /// API root without trailing slash
    pub base_url: String,
    /// Client-side timeout; `None` waits for the API indefinitely
    pub timeout: Option<Duration>,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Config with default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Create config from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; an empty value counts as missing.
    pub fn from_env() -> GeminiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> GeminiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(GeminiError::MissingApiKey)?;

        Ok(Self {
            api_key,
            model: lookup("GEMINI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup("GEMINI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: lookup("GEMINI_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
        })
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(GeminiError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> GeminiResult<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Configured model name.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a prompt plus one inline image and return the model's text.
    ///
    /// A single attempt is made; failures are returned to the caller as-is.
    pub async fn generate(&self, prompt: &str, image: &InlineImage) -> GeminiResult<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    image.to_part(),
                ],
            }],
        };

        debug!(
            model = %self.config.model,
            mime_type = %image.mime_type,
            image_bytes = image.len(),
            "Sending generateContent request"
        );
        let start = Instant::now();

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::Network(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "Gemini API returned an error status");
            return Err(GeminiError::Api { status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeminiError::Network(e.without_url()))?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GeminiError::InvalidResponse(e.to_string()))?;

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Gemini response received"
        );

        parsed
            .first_text()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| GeminiError::EmptyResponse(parsed.empty_reason()))
    }
}
