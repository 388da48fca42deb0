//! Stream dispatcher - Consumes the inbound message stream one message at a time

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::sync::mpsc;

use super::dedup::RecentIds;
use super::parser::CommandParser;
use super::router::CommandRouter;
use crate::application::errors::BotError;
use crate::application::services::identity::IdentityResolver;
use crate::domain::entities::{InboundMessage, SenderIdentity};
use crate::domain::traits::MessagingClient;

/// Default number of message ids remembered for de-duplication
pub const DEFAULT_DEDUP_WINDOW: usize = 1024;

/// What happened to a single inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Sent by the bot itself
    OwnMessage,
    /// Reaction, receipt, membership change, ...
    NotText,
    /// Id already processed
    Duplicate,
    /// Conversation not synced locally (yet)
    ConversationMissing,
    /// Plain chat text
    NotACommand,
    /// Command for some other consumer of the sigil
    ForeignCommand,
    /// Reply sent
    Handled,
    /// Handler or reply failed; logged and dropped
    Failed,
}

/// Counters returned when the stream ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub received: usize,
    pub handled: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DispatchStats {
    fn record(&mut self, outcome: Outcome) {
        self.received += 1;
        match outcome {
            Outcome::Handled => self.handled += 1,
            Outcome::Failed => self.failed += 1,
            _ => self.skipped += 1,
        }
    }
}

/// Single consumer of the inbound stream.
///
/// Message N+1 is not looked at until message N's handler, including all its
/// remote calls and the reply, has finished.
pub struct StreamDispatcher {
    client: Arc<dyn MessagingClient>,
    parser: CommandParser,
    router: CommandRouter,
    resolver: Arc<IdentityResolver>,
    recent: RecentIds,
}

impl StreamDispatcher {
    pub fn new(
        client: Arc<dyn MessagingClient>,
        parser: CommandParser,
        router: CommandRouter,
        resolver: Arc<IdentityResolver>,
    ) -> Self {
        Self {
            client,
            parser,
            router,
            resolver,
            recent: RecentIds::new(DEFAULT_DEDUP_WINDOW),
        }
    }

    pub fn with_dedup_window(mut self, capacity: usize) -> Self {
        self.recent = RecentIds::new(capacity);
        self
    }

    /// Consume the stream until the transport closes it
    pub async fn run(&mut self, mut stream: mpsc::Receiver<InboundMessage>) -> DispatchStats {
        let mut stats = DispatchStats::default();
        tracing::info!("Waiting for messages...");

        while let Some(message) = stream.recv().await {
            let outcome = self.process(message).await;
            stats.record(outcome);
        }

        tracing::info!(
            received = stats.received,
            handled = stats.handled,
            failed = stats.failed,
            "Message stream closed"
        );
        stats
    }

    /// Filter, resolve and dispatch one message. Never panics or errors out.
    pub async fn process(&mut self, message: InboundMessage) -> Outcome {
        if message.is_from(self.client.inbox_id()) {
            return Outcome::OwnMessage;
        }
        if !message.content_type.is_text() {
            tracing::debug!(
                message_id = %message.id,
                content_type = message.content_type.as_str(),
                "Skipping non-text message"
            );
            return Outcome::NotText;
        }
        if self.recent.contains(&message.id) {
            tracing::debug!(message_id = %message.id, "Skipping duplicate message");
            return Outcome::Duplicate;
        }

        let conversation = match self.client.conversation(&message.conversation_id).await {
            Ok(Some(conversation)) => conversation,
            Ok(None) => {
                tracing::info!(
                    message_id = %message.id,
                    error = %BotError::ConversationNotFound(message.conversation_id.clone()),
                    "Skipping message"
                );
                return Outcome::ConversationMissing;
            }
            Err(e) => {
                tracing::warn!(
                    conversation_id = %message.conversation_id,
                    error = %e,
                    "Conversation lookup failed, skipping"
                );
                return Outcome::ConversationMissing;
            }
        };

        let Some(text) = message.decoded_text() else {
            return Outcome::NotACommand;
        };
        if !self.parser.is_command(text) {
            return Outcome::NotACommand;
        }
        let Some(command) = self.parser.parse(text) else {
            tracing::debug!(message_id = %message.id, "Ignoring command for another consumer");
            return Outcome::ForeignCommand;
        };

        // Ids enter the window only after the conversation resolved
        self.recent.insert(&message.id);

        tracing::info!(
            conversation_id = %message.conversation_id,
            message_id = %message.id,
            command = command.name(),
            "Dispatching command"
        );

        let resolver = &self.resolver;
        let router = &self.router;
        let sender_inbox_id = message.sender_inbox_id.as_str();
        let handled = AssertUnwindSafe(async move {
            let sender = if command.uses_sender() {
                resolver.resolve_sender(sender_inbox_id).await
            } else {
                SenderIdentity::unresolved(sender_inbox_id)
            };
            tracing::debug!(sender = %sender, "Sender resolved");
            router.dispatch(conversation.as_ref(), &sender, command).await
        })
        .catch_unwind()
        .await;

        match handled {
            Ok(Ok(())) => Outcome::Handled,
            Ok(Err(e)) => {
                tracing::error!(
                    conversation_id = %message.conversation_id,
                    message_id = %message.id,
                    error = %e,
                    "Failed to send reply"
                );
                Outcome::Failed
            }
            Err(_) => {
                tracing::error!(
                    conversation_id = %message.conversation_id,
                    message_id = %message.id,
                    "Command handler panicked"
                );
                Outcome::Failed
            }
        }
    }
}
