//! OpenAI chat-completion client.

use async_openai::Client;
use async_openai::config::OpenAIConfig as AsyncOpenAIConfig;
use async_openai::types::CreateChatCompletionRequestArgs;
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::config::OpenAIConfig;
use super::convert;
use crate::error::{ModelError, Result};
use crate::message::ChatMessage;
use crate::model::ChatModel;

const PROVIDER: &str = "openai";

/// Chat client for the OpenAI API and OpenAI-compatible servers.
pub struct OpenAIChatClient {
    client: Client<AsyncOpenAIConfig>,
    model: String,
}

impl OpenAIChatClient {
    /// Create a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Config`] when the API key or model is empty, or
    /// when the HTTP client cannot be built.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ModelError::Config("OpenAI API key must not be empty".to_string()));
        }
        if config.model.trim().is_empty() {
            return Err(ModelError::Config("chat model name must not be empty".to_string()));
        }

        let mut openai_config =
            AsyncOpenAIConfig::new().with_api_key(&config.api_key).with_api_base(config.api_base());
        if let Some(org_id) = &config.organization_id {
            openai_config = openai_config.with_org_id(org_id);
        }

        let mut client = Client::with_config(openai_config);
        if let Some(timeout) = config.timeout {
            let http = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| ModelError::Config(format!("failed to build HTTP client: {e}")))?;
            client = client.with_http_client(http);
        }

        Ok(Self { client, model: config.model })
    }

    /// Create a client for an OpenAI-compatible API.
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        Self::new(OpenAIConfig::compatible(api_key, base_url, model))
    }
}

#[async_trait]
impl ChatModel for OpenAIChatClient {
    fn name(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(model = %self.model, messages = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let provider_error =
            |message: String| ModelError::Provider { provider: PROVIDER.to_string(), message };

        let request_messages = messages
            .iter()
            .map(convert::to_request_message)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| provider_error(format!("failed to build message: {e}")))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(request_messages)
            .build()
            .map_err(|e| provider_error(format!("failed to build request: {e}")))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| provider_error(format!("OpenAI API error: {e}")))?;

        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion finished"
            );
        }

        convert::first_choice_text(&response)
            .ok_or_else(|| ModelError::EmptyResponse { provider: PROVIDER.to_string() })
    }
}
