//! OpenAI-compatible provider (OpenAI, Groq)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::llm::{LLMError, LLMMessage, LLMProvider, LLMResponse, LLMResult, LLMUsage, LLM};

/// Chat-completions client for any OpenAI-compatible endpoint
pub struct OpenAiCompatibleProvider {
    name: String,
    api_key: String,
    api_base: String,
    client: Client,
    model: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(provider: LLMProvider, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base(provider.name(), provider.api_base(), api_key, model)
    }

    /// Point at a custom base url (self-hosted gateways, tests)
    pub fn with_base(
        name: impl Into<String>,
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            name: name.into(),
            api_key: api_key.into(),
            api_base: api_base.into(),
            client,
            model: model.into(),
        }
    }

    fn base_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// API request structure
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<LLMMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[async_trait]
impl LLM for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(
        &self,
        messages: Vec<LLMMessage>,
        model: Option<&str>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> LLMResult<LLMResponse> {
        if self.api_key.trim().is_empty() {
            return Err(LLMError::MissingApiKey);
        }
        let model = model.unwrap_or(&self.model);

        let request = ChatRequest {
            model: model.to_string(),
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(self.base_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.without_url().to_string()))?;

        if response.status().as_u16() == 429 {
            return Err(LLMError::RateLimited);
        }

        if !response.status().is_success() {
            return Err(LLMError::ApiError { status: response.status().as_u16() });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::ParseError("No choices in response".to_string()))?;

        let usage = chat_response.usage.map(|u| LLMUsage {
            prompt_tokens: Some(u.prompt_tokens),
            completion_tokens: Some(u.completion_tokens),
            total_tokens: Some(u.total_tokens),
        });

        Ok(LLMResponse {
            content: choice.message.content.unwrap_or_default(),
            model: model.to_string(),
            usage,
            finish_reason: choice.finish_reason,
        })
    }
}
