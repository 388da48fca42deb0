//! Social-identity directory client (Neynar bulk-by-address)

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;

use super::{http_client, network_error, read_json};
use crate::application::errors::{BotError, GatewayError, Service};
use crate::application::services::identity::MAX_IDENTITY_BATCH;
use crate::domain::entities::SocialProfile;
use crate::domain::traits::IdentityDirectory;

const SERVICE: Service = Service::IdentityDirectory;
const BULK_BY_ADDRESS: &str = "v2/farcaster/user/bulk-by-address";

pub struct NeynarDirectory {
    client: Client,
    base_url: String,
    api_key: String,
    max_batch: usize,
}

impl NeynarDirectory {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_seconds: u64,
    ) -> Result<Self, BotError> {
        let base_url: String = base_url.into();
        Ok(Self {
            client: http_client(timeout_seconds)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            max_batch: MAX_IDENTITY_BATCH,
        })
    }

    /// Lower the per-call cap (never above the directory's own limit)
    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch.clamp(1, MAX_IDENTITY_BATCH);
        self
    }
}

#[async_trait]
impl IdentityDirectory for NeynarDirectory {
    fn max_batch(&self) -> usize {
        self.max_batch
    }

    async fn users_by_addresses(
        &self,
        addresses: &[String],
    ) -> Result<HashMap<String, Vec<SocialProfile>>, GatewayError> {
        if addresses.is_empty() {
            return Ok(HashMap::new());
        }
        if addresses.len() > self.max_batch {
            return Err(GatewayError::TooManyIdentities {
                requested: addresses.len(),
                max: self.max_batch,
            });
        }

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, BULK_BY_ADDRESS))
            .query(&[("addresses", addresses.join(","))])
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| network_error(SERVICE, e))?;

        let profiles: HashMap<String, Vec<SocialProfile>> = read_json(SERVICE, response).await?;
        tracing::debug!(requested = addresses.len(), found = profiles.len(), "Directory lookup");

        Ok(profiles
            .into_iter()
            .map(|(address, profiles)| (address.to_lowercase(), profiles))
            .collect())
    }
}
