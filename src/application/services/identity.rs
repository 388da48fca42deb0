//! Identity resolution - inbox ids to addresses and social handles
//!
//! Two batched hops: the protocol client maps inbox ids to recovery
//! addresses, the directory maps addresses to profiles. Nothing is cached.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::application::errors::IdentityError;
use crate::domain::entities::SenderIdentity;
use crate::domain::traits::{IdentityDirectory, MessagingClient};

/// Documented ceiling of the social-identity directory
pub const MAX_IDENTITY_BATCH: usize = 350;

/// External identity of one inbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub address: String,
    pub handle: Option<String>,
}

/// Resolves protocol inbox ids to external identities
pub struct IdentityResolver {
    client: Arc<dyn MessagingClient>,
    directory: Arc<dyn IdentityDirectory>,
}

impl IdentityResolver {
    pub fn new(client: Arc<dyn MessagingClient>, directory: Arc<dyn IdentityDirectory>) -> Self {
        Self { client, directory }
    }

    fn max_batch(&self) -> usize {
        self.directory.max_batch().min(MAX_IDENTITY_BATCH)
    }

    /// Resolve a set of inbox ids in one batch per upstream.
    ///
    /// Inboxes without a known address are absent from the result. Sets
    /// larger than the batch ceiling are rejected before any call is made.
    pub async fn resolve(
        &self,
        inbox_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, ResolvedIdentity>, IdentityError> {
        let max = self.max_batch();
        if inbox_ids.len() > max {
            return Err(IdentityError::TooManyIdentities { requested: inbox_ids.len(), max });
        }
        if inbox_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let addresses = self.lookup_addresses(inbox_ids).await?;
        if addresses.is_empty() {
            return Ok(HashMap::new());
        }
        let handles = self.lookup_handles(addresses.values()).await?;

        Ok(addresses
            .into_iter()
            .map(|(inbox_id, address)| {
                let handle = handles.get(&address.to_lowercase()).cloned();
                (inbox_id, ResolvedIdentity { address, handle })
            })
            .collect())
    }

    /// Best-effort sender resolution; failures degrade to unknown, never raise
    pub async fn resolve_sender(&self, inbox_id: &str) -> SenderIdentity {
        let ids = BTreeSet::from([inbox_id.to_string()]);
        let address = match self.lookup_addresses(&ids).await {
            Ok(mut found) => found.remove(inbox_id),
            Err(e) => {
                tracing::warn!(inbox_id, error = %e, "Sender inbox state lookup failed");
                None
            }
        };

        let Some(address) = address else {
            return SenderIdentity::unresolved(inbox_id);
        };

        let handle = match self.lookup_handles(std::iter::once(&address)).await {
            Ok(mut handles) => handles.remove(&address.to_lowercase()),
            Err(e) => {
                tracing::warn!(inbox_id, error = %e, "Sender directory lookup failed");
                None
            }
        };

        SenderIdentity {
            inbox_id: inbox_id.to_string(),
            address: Some(address),
            handle,
        }
    }

    async fn lookup_addresses(
        &self,
        inbox_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, String>, IdentityError> {
        let ids: Vec<String> = inbox_ids.iter().cloned().collect();
        let states = self
            .client
            .inbox_states(&ids)
            .await
            .map_err(|e| IdentityError::Protocol(e.to_string()))?;

        Ok(states
            .into_iter()
            .filter(|state| inbox_ids.contains(&state.inbox_id))
            .filter_map(|state| state.external_address.map(|address| (state.inbox_id, address)))
            .collect())
    }

    /// Lowercased address -> first profile's username
    async fn lookup_handles<'a>(
        &self,
        addresses: impl Iterator<Item = &'a String>,
    ) -> Result<HashMap<String, String>, IdentityError> {
        let mut unique: Vec<String> = addresses.map(|a| a.to_lowercase()).collect();
        unique.sort();
        unique.dedup();

        let profiles = self.directory.users_by_addresses(&unique).await?;
        Ok(profiles
            .into_iter()
            .filter_map(|(address, profiles)| {
                profiles.into_iter().next().map(|p| (address.to_lowercase(), p.username))
            })
            .collect())
    }
}
