use std::collections::HashMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible LLM provider
pub struct OpenAIProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    headers: HashMap<String, String>,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        headers: HashMap<String, String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            model,
            temperature,
            max_tokens,
            headers,
        }
    }

    /// Single-shot completion: one system message, one user message,
    /// returns the assistant reply text
    pub async fn complete(&self, system: &str, user: &str) -> anyhow::Result<String> {
        trace!(
            "Request: model={}, system_len={}, user_len={}",
            self.model,
            system.len(),
            user.len()
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        let response = builder
            .json(&request)
            .send()
            .await
            .context("request to LLM endpoint failed")?
            .error_for_status()
            .context("LLM endpoint returned an error status")?;

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("LLM endpoint returned a non-JSON body")?;
        trace!("Response has {} choices", chat_response.choices.len());

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .context("LLM response contained no choices")?;
        choice
            .message
            .content
            .context("LLM response message had no content")
    }
}
