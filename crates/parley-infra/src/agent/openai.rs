//! OpenAI-compatible agent runtime.
//!
//! One implementation serves any provider speaking the chat completions
//! protocol via a configurable base URL. Uses [`async_openai`] for
//! type-safe request/response handling; every invocation is bounded by the
//! configured timeout so a stuck provider fails the converse call instead
//! of hanging it.

use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use async_openai::Client;

use parley_core::agent::AgentRuntime;
use parley_types::config::AgentConfig;
use parley_types::error::AgentError;
use parley_types::thread::ThreadId;
use parley_types::turn::{Turn, TurnRole};

/// Agent runtime over an OpenAI-compatible chat completions API.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiCompatibleRuntime {
    client: Client<OpenAIConfig>,
    model: String,
    system_prompt: Option<String>,
    temperature: f32,
    timeout: Duration,
}

impl OpenAiCompatibleRuntime {
    /// Create a runtime from the gateway agent configuration.
    pub fn new(cfg: &AgentConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&cfg.api_key)
            .with_api_base(&cfg.base_url);

        Self {
            client: Client::with_config(openai_config),
            model: cfg.model.clone(),
            system_prompt: cfg.system_prompt.clone(),
            temperature: cfg.temperature,
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }

    fn build_request(&self, history: &[Turn], user_text: &str) -> CreateChatCompletionRequest {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        if let Some(ref system) = self.system_prompt {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(system.clone()),
                    name: None,
                },
            ));
        }

        for turn in history {
            let msg = match turn.role {
                TurnRole::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(
                            turn.content.clone(),
                        ),
                        name: None,
                    },
                ),
                TurnRole::Assistant => {
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(
                        ChatCompletionRequestAssistantMessage {
                            content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                                turn.content.clone(),
                            )),
                            refusal: None,
                            name: None,
                            audio: None,
                            tool_calls: None,
                            function_call: None,
                        },
                    )
                }
                // The facade slices context at the last reset marker, so
                // markers never reach the provider; skip any stray one.
                TurnRole::Reset => continue,
            };
            messages.push(msg);
        }

        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(user_text.to_string()),
                name: None,
            },
        ));

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(self.temperature),
            ..Default::default()
        }
    }
}

impl AgentRuntime for OpenAiCompatibleRuntime {
    async fn reply(
        &self,
        _thread: &ThreadId,
        history: &[Turn],
        user_text: &str,
    ) -> Result<String, AgentError> {
        let request = self.build_request(history, user_text);

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| AgentError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| AgentError::Provider(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(AgentError::EmptyReply);
        }
        Ok(content)
    }
}
