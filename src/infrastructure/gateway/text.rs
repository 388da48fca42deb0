//! Text generation on top of an LLM provider

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::traits::TextGenerator;
use crate::infrastructure::llm::{LLMMessage, LLM};

/// Reply used whenever generation fails or comes back empty
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't generate a response.";

pub struct LlmTextGenerator {
    llm: Arc<dyn LLM>,
    system_prompt: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl LlmTextGenerator {
    pub fn new(llm: Arc<dyn LLM>) -> Self {
        Self {
            llm,
            system_prompt: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: Option<u32>) -> Self {
        self.temperature = Some(temperature);
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl TextGenerator for LlmTextGenerator {
    async fn generate(&self, prompt: &str) -> String {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(LLMMessage::system(system.as_str()));
        }
        messages.push(LLMMessage::user(prompt));

        match self.llm.chat(messages, None, self.temperature, self.max_tokens).await {
            Ok(response) if !response.content.trim().is_empty() => response.content,
            Ok(_) => {
                tracing::warn!(provider = self.llm.name(), "Empty completion, using fallback");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                tracing::warn!(provider = self.llm.name(), error = %e, "Text generation failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::{LLMError, LLMResponse, LLMResult};
    use std::sync::Mutex;

    struct ScriptedLlm {
        reply: Option<String>,
        seen: Mutex<Vec<LLMMessage>>,
    }

    #[async_trait]
    impl LLM for ScriptedLlm {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn chat(
            &self,
            messages: Vec<LLMMessage>,
            _model: Option<&str>,
            _temperature: Option<f32>,
            _max_tokens: Option<u32>,
        ) -> LLMResult<LLMResponse> {
            self.seen.lock().unwrap().extend(messages);
            match &self.reply {
                Some(content) => Ok(LLMResponse {
                    content: content.clone(),
                    model: "scripted".to_string(),
                    usage: None,
                    finish_reason: Some("stop".to_string()),
                }),
                None => Err(LLMError::ApiError { status: 500 }),
            }
        }
    }

    fn scripted(reply: Option<&str>) -> Arc<ScriptedLlm> {
        Arc::new(ScriptedLlm {
            reply: reply.map(str::to_string),
            seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn system_prompt_precedes_user_prompt() {
        let llm = scripted(Some("Rules!"));
        let text = LlmTextGenerator::new(llm.clone()).with_system_prompt(Some("be brief".to_string()));

        assert_eq!(text.generate("explain").await, "Rules!");
        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen[0].role, "system");
        assert_eq!(seen[1].role, "user");
        assert_eq!(seen[1].content, "explain");
    }

    #[tokio::test]
    async fn failure_returns_fallback() {
        let text = LlmTextGenerator::new(scripted(None));
        assert_eq!(text.generate("explain").await, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn blank_completion_returns_fallback() {
        let text = LlmTextGenerator::new(scripted(Some("   ")));
        assert_eq!(text.generate("explain").await, FALLBACK_REPLY);
    }
}
