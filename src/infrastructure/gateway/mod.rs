//! External service gateway - Typed wrappers over the remote HTTP services
//!
//! Every call follows the same shape: validate input, send with the auth
//! header, map non-success statuses to `GatewayError::Remote`, then parse the
//! body strictly. No retries happen here.

pub mod directory;
pub mod game;
pub mod text;

pub use directory::NeynarDirectory;
pub use game::HttpGameService;
pub use text::{LlmTextGenerator, FALLBACK_REPLY};

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::application::errors::{BotError, GatewayError, Service};

/// Build a client with a per-request timeout
pub(crate) fn http_client(timeout_seconds: u64) -> Result<Client, BotError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| BotError::Network(format!("Failed to build HTTP client: {}", e)))
}

/// Transport failure; the url is stripped so query strings never reach logs
pub(crate) fn network_error(service: Service, err: reqwest::Error) -> GatewayError {
    GatewayError::Network {
        service,
        reason: err.without_url().to_string(),
    }
}

/// Check the status and decode the JSON body into `T`
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: Service,
    response: Response,
) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        return Err(GatewayError::Remote {
            service,
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(|e| network_error(service, e))?;
    serde_json::from_slice(&body).map_err(|e| GatewayError::Malformed {
        service,
        reason: e.to_string(),
    })
}
