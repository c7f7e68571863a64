//! OpenAI-compatible chat completions client.
//! Any endpoint that speaks `/chat/completions` works; the base URL is configurable.

use super::scrub::sanitize_api_error;
use super::traits::{CompletionFuture, ModelClient};
use crate::error::LlmError;
use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER_NAME: &str = "OpenAI";

pub struct OpenAiChatClient {
    model: String,
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    /// Pre-computed chat completions URL (avoids `format!` per request).
    cached_chat_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiChatClient {
    pub fn new(base_url: &str, model: &str, api_key: Option<&str>) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let cached_chat_url = if base_url.ends_with("chat/completions") {
            base_url.to_string()
        } else {
            format!("{base_url}/chat/completions")
        };

        Self {
            model: model.to_string(),
            cached_auth_header: api_key
                .filter(|k| !k.is_empty())
                .map(|k| format!("Bearer {k}")),
            cached_chat_url,
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn chat_url(&self) -> &str {
        &self.cached_chat_url
    }

    async fn complete(
        &self,
        prompt: &str,
        max_output_tokens: u32,
        temperature: f64,
    ) -> anyhow::Result<String> {
        let auth_header =
            self.cached_auth_header
                .as_ref()
                .ok_or_else(|| LlmError::MissingApiKey {
                    provider: PROVIDER_NAME.into(),
                })?;

        let request = ChatRequest {
            model: &self.model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            max_tokens: max_output_tokens,
            temperature,
        };

        let response = self
            .client
            .post(self.chat_url())
            .header("Authorization", auth_header)
            .json(&request)
            .send()
            .await
            .context("OpenAI request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
            return Err(LlmError::Request {
                provider: PROVIDER_NAME.into(),
                message: format!("({status}) {}", sanitize_api_error(&body)),
            }
            .into());
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("OpenAI response JSON decode failed")?;

        extract_text(chat_response)
    }
}

fn extract_text(chat_response: ChatResponse) -> anyhow::Result<String> {
    chat_response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            LlmError::EmptyResponse {
                provider: PROVIDER_NAME.into(),
            }
            .into()
        })
}

impl ModelClient for OpenAiChatClient {
    fn name(&self) -> &str {
        "openai"
    }

    fn invoke<'a>(
        &'a self,
        prompt: &'a str,
        max_output_tokens: u32,
        temperature: f64,
    ) -> CompletionFuture<'a> {
        Box::pin(self.complete(prompt, max_output_tokens, temperature))
    }
}
