//! OpenAI-compatible reply generator.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, llama.cpp server, and any
//! endpoint exposing `/chat/completions`.
//!
//! The profile travels in the system message as `[KNOWLEDGE]`, after the
//! configured instruction. Dialog history has no stored roles, so roles are
//! assigned from the newest message backwards: the newest is always the
//! user's, and turns alternate before it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use smalltalk_core::error::ReplyError;
use smalltalk_core::reply::ReplyGenerator;
use tracing::{debug, warn};

pub struct OpenAiCompatReply {
    base_url: String,
    api_key: String,
    model: String,
    instruction: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiCompatReply {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            instruction: String::new(),
            temperature: 0.9,
            max_tokens: 64,
            client,
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn system_prompt(&self, profile: &str) -> String {
        match (self.instruction.is_empty(), profile.is_empty()) {
            (_, true) => self.instruction.clone(),
            (true, false) => format!("[KNOWLEDGE] {profile}"),
            (false, false) => format!("{} [KNOWLEDGE] {profile}", self.instruction),
        }
    }

    fn to_api_messages<'a>(system: &'a str, messages: &'a [String]) -> Vec<ApiMessage<'a>> {
        let mut api_messages = Vec::with_capacity(messages.len() + 1);
        if !system.is_empty() {
            api_messages.push(ApiMessage {
                role: "system",
                content: system,
            });
        }

        let newest = messages.len().saturating_sub(1);
        api_messages.extend(messages.iter().enumerate().map(|(i, content)| ApiMessage {
            role: if (newest - i) % 2 == 0 { "user" } else { "assistant" },
            content,
        }));
        api_messages
    }
}

#[async_trait]
impl ReplyGenerator for OpenAiCompatReply {
    fn name(&self) -> &str {
        "openai_compat"
    }

    async fn reply(&self, profile: &str, messages: &[String]) -> Result<String, ReplyError> {
        if messages.is_empty() {
            return Err(ReplyError::EmptyContext);
        }

        let url = format!("{}/chat/completions", self.base_url);
        let system = self.system_prompt(profile);

        let body = serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(&system, messages),
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        });

        debug!(model = %self.model, context_len = messages.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReplyError::Timeout(e.to_string())
                } else {
                    ReplyError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ReplyError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ReplyError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Reply backend returned error");
            return Err(ReplyError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ReplyError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let text = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ReplyError::EmptyReply);
        }

        Ok(text)
    }
}

// --- Wire types ---

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ApiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
