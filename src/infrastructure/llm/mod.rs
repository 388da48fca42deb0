//! LLM integration - OpenAI-compatible chat completions

pub mod config;
pub mod providers;
pub mod traits;

pub use config::{LLMConfig, LLMProvider};
pub use providers::OpenAiCompatibleProvider;
pub use traits::{LLMError, LLMMessage, LLMResponse, LLMResult, LLMUsage, LLM};
