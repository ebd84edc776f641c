//! Configuration for the OpenAI chat client.

use std::time::Duration;

/// Base URL of the public OpenAI API.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Chat model used when none is configured.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4.1-nano";

/// Connection settings for [`OpenAIChatClient`](super::OpenAIChatClient).
#[derive(Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: String,
    pub organization_id: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl OpenAIConfig {
    /// Settings for the public OpenAI API.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            organization_id: None,
            base_url: None,
            timeout: None,
        }
    }

    /// Settings for an OpenAI-compatible server (vLLM, Ollama, proxies).
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::new(api_key, model).with_base_url(base_url)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// Per-request timeout; without one requests may hang indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The API base this configuration points at.
    pub fn api_base(&self) -> &str {
        self.base_url.as_deref().unwrap_or(OPENAI_API_BASE)
    }
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("organization_id", &self.organization_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
