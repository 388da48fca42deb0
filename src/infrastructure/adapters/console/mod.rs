//! Console adapter for development/testing
//!
//! Every stdin line becomes a text message from a single local user in the
//! `console` conversation; replies are printed to stdout.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::{InboundMessage, MemberIdentity};
use crate::domain::traits::{Conversation, MessagingClient};

pub const CONSOLE_CONVERSATION: &str = "console";
const CONSOLE_USER: &str = "console-user";

/// Local protocol client for running the bot without a network
pub struct ConsoleClient {
    inbox_id: String,
    user: MemberIdentity,
    conversation: Arc<ConsoleConversation>,
}

struct ConsoleConversation {
    members: Vec<MemberIdentity>,
}

impl ConsoleClient {
    pub fn new(bot_inbox_id: impl Into<String>) -> Self {
        let inbox_id = bot_inbox_id.into();
        let user = MemberIdentity::new(CONSOLE_USER);
        let conversation = Arc::new(ConsoleConversation {
            members: vec![MemberIdentity::new(inbox_id.clone()), user.clone()],
        });
        Self {
            inbox_id,
            user,
            conversation,
        }
    }

    /// Give the console user a wallet address so identity lookups have input
    pub fn with_user_address(mut self, address: impl Into<String>) -> Self {
        self.user = self.user.with_address(address);
        self.conversation = Arc::new(ConsoleConversation {
            members: vec![MemberIdentity::new(self.inbox_id.clone()), self.user.clone()],
        });
        self
    }
}

#[async_trait]
impl MessagingClient for ConsoleClient {
    fn inbox_id(&self) -> &str {
        &self.inbox_id
    }

    async fn stream_all_messages(&self) -> Result<mpsc::Receiver<InboundMessage>, BotError> {
        let (tx, rx) = mpsc::channel(16);
        let sender = self.user.inbox_id.clone();

        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) if line.trim().is_empty() => continue,
                    Ok(Some(line)) => {
                        let message = InboundMessage::text(CONSOLE_CONVERSATION, sender.as_str(), line.trim());
                        if tx.send(message).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
            tracing::info!("Console input closed");
        });

        Ok(rx)
    }

    async fn conversation(&self, id: &str) -> Result<Option<Arc<dyn Conversation>>, BotError> {
        if id == CONSOLE_CONVERSATION {
            Ok(Some(self.conversation.clone() as Arc<dyn Conversation>))
        } else {
            Ok(None)
        }
    }

    async fn inbox_states(&self, inbox_ids: &[String]) -> Result<Vec<MemberIdentity>, BotError> {
        Ok(self
            .conversation
            .members
            .iter()
            .filter(|m| inbox_ids.contains(&m.inbox_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Conversation for ConsoleConversation {
    fn id(&self) -> &str {
        CONSOLE_CONVERSATION
    }

    async fn members(&self) -> Result<Vec<MemberIdentity>, BotError> {
        Ok(self.members.clone())
    }

    async fn send(&self, text: &str) -> Result<(), BotError> {
        println!("[BOT] {}", text);
        Ok(())
    }
}
