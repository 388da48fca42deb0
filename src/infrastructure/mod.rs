//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Gateway: Game service, identity directory and text generation clients
//! - LLM: Chat-completion providers
//! - HTTP: Administrative ingress
//! - Adapters: Protocol client implementations

pub mod adapters;
pub mod config;
pub mod gateway;
pub mod http;
pub mod llm;
