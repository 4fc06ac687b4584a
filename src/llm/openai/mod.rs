
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatMessage, ChatModel, Role};
use crate::config::ProviderConfig;
use crate::provider::ApiClient;
use crate::{PdfChatError, Result};

const CHAT_ENDPOINT: &str = "chat/completions";

/// Client for an OpenAI-compatible `/chat/completions` endpoint
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    client: ApiClient,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiChat {
    #[inline]
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = ApiClient::new(config)?;
        Ok(Self::with_client(client, config))
    }

    #[inline]
    pub fn with_client(client: ApiClient, config: &ProviderConfig) -> Self {
        Self {
            client,
            model: config.chat_model.clone(),
            temperature: config.temperature,
        }
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ChatModel for OpenAiChat {
    #[inline]
    fn complete(&self, messages: &[ChatMessage]) -> Result<ChatMessage> {
        debug!(
            "Requesting completion from {} with {} messages",
            self.model,
            messages.len()
        );

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let response: ChatResponse = self.client.post_json(CHAT_ENDPOINT, &request)?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                PdfChatError::Generation(format!("Model {} returned an empty response", self.model))
            })?;

        debug!("Received completion of {} characters", content.len());

        Ok(ChatMessage {
            role: Role::Assistant,
            content,
        })
    }
}
