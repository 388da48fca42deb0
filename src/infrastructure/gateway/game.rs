//! Game service client

use async_trait::async_trait;
use reqwest::Client;

use super::{http_client, network_error, read_json};
use crate::application::errors::{BotError, GatewayError, Service};
use crate::domain::entities::{CreateGameRequest, GameSession, LeaderboardSnapshot};
use crate::domain::traits::GameService;

const SERVICE: Service = Service::GameService;

/// HTTP client for the game backend's `/api` endpoints
pub struct HttpGameService {
    client: Client,
    base_url: String,
    secret: String,
}

impl HttpGameService {
    pub fn new(
        base_url: impl Into<String>,
        secret: impl Into<String>,
        timeout_seconds: u64,
    ) -> Result<Self, BotError> {
        let base_url: String = base_url.into();
        Ok(Self {
            client: http_client(timeout_seconds)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret: secret.into().trim().to_string(),
        })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint)
    }
}

fn invalid(reason: &str) -> GatewayError {
    GatewayError::InvalidInput {
        service: SERVICE,
        reason: reason.to_string(),
    }
}

#[async_trait]
impl GameService for HttpGameService {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn create_game(&self, request: &CreateGameRequest) -> Result<GameSession, GatewayError> {
        if request.conversation_id.trim().is_empty() {
            return Err(invalid("conversation id is empty"));
        }
        if request.bet_amount.trim().is_empty() {
            return Err(invalid("bet amount is empty"));
        }

        tracing::debug!(
            conversation_id = %request.conversation_id,
            players = request.fids_or_usernames.len(),
            "POST create-game"
        );
        let response = self
            .client
            .post(self.api_url("create-game"))
            .header("authorization", &self.secret)
            .json(request)
            .send()
            .await
            .map_err(|e| network_error(SERVICE, e))?;

        read_json(SERVICE, response).await
    }

    async fn latest_game(&self) -> Result<GameSession, GatewayError> {
        let response = self
            .client
            .get(self.api_url("get-game"))
            .header("authorization", &self.secret)
            .send()
            .await
            .map_err(|e| network_error(SERVICE, e))?;

        read_json(SERVICE, response).await
    }

    async fn leaderboard(&self, conversation_id: &str) -> Result<LeaderboardSnapshot, GatewayError> {
        if conversation_id.trim().is_empty() {
            return Err(invalid("conversation id is empty"));
        }

        let response = self
            .client
            .get(self.api_url("leaderboard"))
            .query(&[("conversationId", conversation_id)])
            .header("authorization", &self.secret)
            .send()
            .await
            .map_err(|e| network_error(SERVICE, e))?;

        read_json(SERVICE, response).await
    }
}
