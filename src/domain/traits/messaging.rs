use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::{InboundMessage, MemberIdentity};

/// Messaging protocol client - the only contract the dispatcher needs.
///
/// Connection setup, key management and local persistence stay behind this
/// trait.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// The bot's own inbox id
    fn inbox_id(&self) -> &str;

    /// Open the ordered stream of all inbound messages.
    ///
    /// The receiver yields `None` only when the transport shuts down.
    async fn stream_all_messages(&self) -> Result<mpsc::Receiver<InboundMessage>, BotError>;

    /// Look up a conversation; `None` when it is not synced locally yet
    async fn conversation(&self, id: &str) -> Result<Option<Arc<dyn Conversation>>, BotError>;

    /// Batched inbox state lookup (inbox id -> recovery address)
    async fn inbox_states(&self, inbox_ids: &[String]) -> Result<Vec<MemberIdentity>, BotError>;
}

/// A conversation handle owned by the protocol client
#[async_trait]
pub trait Conversation: Send + Sync {
    fn id(&self) -> &str;

    async fn members(&self) -> Result<Vec<MemberIdentity>, BotError>;

    async fn send(&self, text: &str) -> Result<(), BotError>;
}
