//! LLM Configuration

use serde::{Deserialize, Serialize};

/// LLM Provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    #[default]
    OpenAi,
    Groq,
}

impl LLMProvider {
    /// Chat-completions base url of the provider
    pub fn api_base(&self) -> &'static str {
        match self {
            LLMProvider::OpenAi => "https://api.openai.com/v1",
            LLMProvider::Groq => "https://api.groq.com/openai/v1",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LLMProvider::OpenAi => "openai",
            LLMProvider::Groq => "groq",
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAi),
            "groq" => Ok(LLMProvider::Groq),
            other => Err(format!("unknown LLM provider: {}", other)),
        }
    }
}

/// LLM Configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LLMConfig {
    /// Default provider
    pub provider: LLMProvider,

    /// Provider-specific API keys
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,

    /// Default model for each provider
    pub openai_model: Option<String>,
    pub groq_model: Option<String>,

    /// Default settings
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::OpenAi,
            openai_api_key: None,
            groq_api_key: None,
            openai_model: Some("gpt-3.5-turbo".to_string()),
            groq_model: Some("llama-3.1-8b-instant".to_string()),
            temperature: 0.7,
            max_tokens: Some(512),
            system_prompt: Some(
                "You are a helpful game assistant for Squabble. Keep responses concise and engaging."
                    .to_string(),
            ),
        }
    }
}

impl LLMConfig {
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            self.groq_api_key = Some(key);
        }
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            match provider.parse() {
                Ok(p) => self.provider = p,
                Err(e) => tracing::warn!("Ignoring LLM_PROVIDER: {}", e),
            }
        }
        if let Ok(prompt) = std::env::var("LLM_SYSTEM_PROMPT") {
            self.system_prompt = Some(prompt);
        }
        if let Ok(temp) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(t) = temp.parse() {
                self.temperature = t;
            }
        }
    }

    /// Get API key for a provider
    pub fn api_key(&self, provider: LLMProvider) -> Option<&str> {
        match provider {
            LLMProvider::OpenAi => self.openai_api_key.as_deref(),
            LLMProvider::Groq => self.groq_api_key.as_deref(),
        }
        .filter(|k| !k.trim().is_empty())
    }

    /// Get model for a provider
    pub fn model(&self, provider: LLMProvider) -> &str {
        match provider {
            LLMProvider::OpenAi => self.openai_model.as_deref().unwrap_or("gpt-3.5-turbo"),
            LLMProvider::Groq => self.groq_model.as_deref().unwrap_or("llama-3.1-8b-instant"),
        }
    }
}
