//! OpenAI chat-completion provider.

use async_trait::async_trait;
use flowdeck_common::{FlowdeckError, FlowdeckResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::provider::{ChatMessage, ChatProvider, ChatRole, Completion, GenerateOptions};

/// OpenAI API endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API request message
#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

/// OpenAI API request
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// OpenAI API response choice message
#[derive(Debug, Deserialize)]
struct OpenAiChoiceMessage {
    content: Option<String>,
}

/// OpenAI API response choice
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

/// OpenAI API response
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    model: String,
}

/// OpenAI API error
#[derive(Debug, Deserialize)]
struct OpenAiError {
    message: String,
}

/// OpenAI API error response
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiError,
}

/// OpenAI chat-completion provider.
pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiProvider {
    /// Create a new provider. An empty key leaves it unconfigured.
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            client: Client::new(),
            api_key: (!api_key.is_empty()).then_some(api_key),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Set a custom endpoint URL (useful for proxies and tests).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn convert_messages(messages: &[ChatMessage]) -> Vec<OpenAiMessage> {
        messages
            .iter()
            .map(|msg| OpenAiMessage {
                role: match msg.role {
                    ChatRole::System => "system".to_string(),
                    ChatRole::User => "user".to_string(),
                    ChatRole::Assistant => "assistant".to_string(),
                },
                content: msg.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: &GenerateOptions,
    ) -> FlowdeckResult<Completion> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| FlowdeckError::gateway("OPENAI_API_KEY not set"))?;

        let request = OpenAiRequest {
            model: model.to_string(),
            messages: Self::convert_messages(messages),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request)
            .send()
            .await
            .map_err(|e| FlowdeckError::gateway(format!("OpenAI API request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FlowdeckError::gateway(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            // Prefer the structured error envelope when it parses
            if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(&body) {
                return Err(FlowdeckError::gateway(format!(
                    "OpenAI API error: {}",
                    error_response.error.message
                )));
            }
            return Err(FlowdeckError::gateway(format!(
                "OpenAI API error ({status}): {body}"
            )));
        }

        let api_response: OpenAiResponse = serde_json::from_str(&body)
            .map_err(|e| FlowdeckError::gateway(format!("failed to parse response: {e}")))?;

        let text = api_response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(Completion {
            text,
            model: api_response.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        let provider = OpenAiProvider::new("sk-test");
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_empty_key_is_unconfigured() {
        assert!(!OpenAiProvider::new("").is_configured());
        assert!(OpenAiProvider::new("sk-test").is_configured());
    }

    #[test]
    fn test_message_conversion() {
        let messages = vec![
            ChatMessage::system("You are a prioritization expert"),
            ChatMessage::user("Rank these"),
        ];
        let converted = OpenAiProvider::convert_messages(&messages);
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[1].role, "user");
    }
}
