//! Command router - One handler per command variant, exactly one reply each

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::application::errors::{BotError, CommandError, GatewayError};
use crate::application::services::identity::IdentityResolver;
use crate::application::services::leaderboard;
use crate::domain::entities::{Command, CreateGameRequest, SenderIdentity};
use crate::domain::traits::{Conversation, GameService, TextGenerator};

const RULES_PROMPT: &str = "Generate a concise and engaging explanation of the Squabble game rules. \
Include that players take turns making moves and the goal is to capture the most territory. \
Also mention that players can use /squabble start to begin a new game and /squabble leaderboard to see current standings.";

const STATIC_RULES: &str = "📜 Squabble Rules\n\
Players take turns making moves; the goal is to capture the most territory.\n\
Use /squabble start [betAmount] to begin a new game and /squabble leaderboard to see current standings.";

const START_FAILED: &str = "❌ Failed to create game. Please try again.";
const LATEST_FAILED: &str = "❌ Failed to fetch latest game. Please try again.";
const LEADERBOARD_FAILED: &str = "❌ Failed to fetch leaderboard. Please try again.";

/// Routes parsed commands to their handlers and sends the single reply
pub struct CommandRouter {
    games: Arc<dyn GameService>,
    text: Option<Arc<dyn TextGenerator>>,
    resolver: Arc<IdentityResolver>,
    bot_inbox_id: String,
    invocation: String,
}

impl CommandRouter {
    pub fn new(
        games: Arc<dyn GameService>,
        resolver: Arc<IdentityResolver>,
        bot_inbox_id: impl Into<String>,
    ) -> Self {
        Self {
            games,
            text: None,
            resolver,
            bot_inbox_id: bot_inbox_id.into(),
            invocation: "/squabble".to_string(),
        }
    }

    /// Use a text generator for the rules explanation
    pub fn with_text_generator(mut self, text: Arc<dyn TextGenerator>) -> Self {
        self.text = Some(text);
        self
    }

    /// Sigil + keyword shown in usage texts
    pub fn with_invocation(mut self, sigil: &str, keyword: &str) -> Self {
        self.invocation = format!("{}{}", sigil, keyword);
        self
    }

    /// Handle a command and send exactly one reply to the conversation
    pub async fn dispatch(
        &self,
        conversation: &dyn Conversation,
        sender: &SenderIdentity,
        command: Command,
    ) -> Result<(), BotError> {
        let reply = self.reply_for(conversation, sender, &command).await;
        tracing::debug!(
            conversation_id = conversation.id(),
            command = command.name(),
            "Sending reply ({} chars)",
            reply.len()
        );
        conversation.send(&reply).await
    }

    /// Compute the reply text. Remote failures become apologies here.
    pub async fn reply_for(
        &self,
        conversation: &dyn Conversation,
        sender: &SenderIdentity,
        command: &Command,
    ) -> String {
        let result = match command {
            Command::Help => Ok(self.help().await),
            Command::StartGame { bet_amount } => self.start_game(conversation, sender, bet_amount).await,
            Command::Leaderboard => self.leaderboard(conversation).await,
            Command::Latest => self.latest().await,
            Command::Unknown(raw) => Ok(self.usage(raw)),
        };

        result.unwrap_or_else(|e| {
            let gateway = e.gateway();
            tracing::error!(
                conversation_id = conversation.id(),
                command = command.name(),
                service = gateway.and_then(GatewayError::service).map(|s| s.as_str()),
                status = gateway.and_then(GatewayError::status),
                error = %e,
                "Command failed"
            );
            failure_reply(command).to_string()
        })
    }

    async fn help(&self) -> String {
        match &self.text {
            Some(text) => text.generate(RULES_PROMPT).await,
            None => STATIC_RULES.to_string(),
        }
    }

    async fn start_game(
        &self,
        conversation: &dyn Conversation,
        sender: &SenderIdentity,
        bet_amount: &str,
    ) -> Result<String, CommandError> {
        let members = conversation.members().await?;
        let inbox_ids: BTreeSet<String> = members
            .into_iter()
            .map(|m| m.inbox_id)
            .filter(|id| !id.eq_ignore_ascii_case(&self.bot_inbox_id))
            .collect();
        tracing::debug!(conversation_id = conversation.id(), members = inbox_ids.len(), "Resolving players");

        let identities = self.resolver.resolve(&inbox_ids).await?;
        let players: Vec<String> = inbox_ids
            .iter()
            .filter_map(|id| identities.get(id))
            .filter_map(|identity| identity.handle.clone())
            .collect();

        let request = CreateGameRequest {
            fids_or_usernames: players,
            bet_amount: bet_amount.to_string(),
            creator_address: sender.address_or_unknown().to_string(),
            creator_fid: sender.handle_or_unknown().to_string(),
            conversation_id: conversation.id().to_string(),
        };
        let game = self.games.create_game(&request).await?;
        tracing::info!(conversation_id = conversation.id(), game_id = %game.id, "Game created");

        Ok(format!(
            "🎮 Game created! You can play here: {}\nGood luck! 🍀",
            game.url(self.games.base_url())
        ))
    }

    async fn leaderboard(&self, conversation: &dyn Conversation) -> Result<String, CommandError> {
        let snapshot = self.games.leaderboard(conversation.id()).await?;
        Ok(leaderboard::format_snapshot(snapshot))
    }

    async fn latest(&self) -> Result<String, CommandError> {
        let game = self.games.latest_game().await?;
        Ok(format!(
            "🎮 Latest Game:\nYou can view it here: {}",
            game.url(self.games.base_url())
        ))
    }

    fn usage(&self, raw: &str) -> String {
        let list = format!(
            "🎮 Available Squabble Commands:\n\
             • {0} help - Show game rules and instructions\n\
             • {0} start [betAmount] - Start a new game (optional bet amount)\n\
             • {0} leaderboard - View current standings\n\
             • {0} latest - View the latest game details",
            self.invocation
        );
        if raw.is_empty() {
            list
        } else {
            format!("❌ Unknown command: {}\n\n{}", raw, list)
        }
    }
}

fn failure_reply(command: &Command) -> &'static str {
    match command {
        Command::StartGame { .. } => START_FAILED,
        Command::Latest => LATEST_FAILED,
        Command::Leaderboard => LEADERBOARD_FAILED,
        // Help and usage never fail
        Command::Help | Command::Unknown(_) => "❌ Something went wrong. Please try again.",
    }
}
