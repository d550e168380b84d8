//! Application state.

use std::sync::Arc;

use colorpair_gemini::{ColorAdvisor, GeminiClient, GeminiConfig, GeminiResult};

use crate::config::ApiConfig;

/// Shared application state.
///
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub advisor: Arc<dyn ColorAdvisor>,
}

impl AppState {
    /// Create application state around an existing advisor.
    pub fn new(config: ApiConfig, advisor: Arc<dyn ColorAdvisor>) -> Self {
        Self { config, advisor }
    }

    /// Create application state backed by a Gemini client.
    pub fn with_gemini(config: ApiConfig, gemini: GeminiConfig) -> GeminiResult<Self> {
        let client = GeminiClient::new(gemini)?;
        Ok(Self::new(config, Arc::new(client)))
    }
}
