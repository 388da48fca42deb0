use async_trait::async_trait;
use std::collections::HashMap;

use crate::application::errors::GatewayError;
use crate::domain::entities::{CreateGameRequest, GameSession, LeaderboardSnapshot, SocialProfile};

/// Game backend - system of record for games and standings
#[async_trait]
pub trait GameService: Send + Sync {
    /// Base url used to build public game links
    fn base_url(&self) -> &str;

    async fn create_game(&self, request: &CreateGameRequest) -> Result<GameSession, GatewayError>;

    async fn latest_game(&self) -> Result<GameSession, GatewayError>;

    async fn leaderboard(&self, conversation_id: &str) -> Result<LeaderboardSnapshot, GatewayError>;
}

/// Social-identity directory: blockchain address -> profiles
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Upper bound on addresses accepted per call
    fn max_batch(&self) -> usize;

    /// Keys of the returned map are lowercased addresses.
    /// Addresses without a profile are absent from the map.
    async fn users_by_addresses(
        &self,
        addresses: &[String],
    ) -> Result<HashMap<String, Vec<SocialProfile>>, GatewayError>;
}

/// Single-turn text generation. Never fails: errors collapse into a fallback reply.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> String;
}
