/// Bet amount used when `start` is given no argument
pub const DEFAULT_BET_AMOUNT: &str = "0";

/// A parsed bot command.
///
/// Fully determined by the message text: the same text always yields the same
/// command, independent of conversation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Explain the game rules
    Help,
    /// Create a new game for the conversation members
    StartGame { bet_amount: String },
    /// Show the conversation's standings
    Leaderboard,
    /// Show the most recent game
    Latest,
    /// Bare base command (empty) or unrecognised sub-command
    Unknown(String),
}

impl Command {
    pub fn start(bet_amount: Option<&str>) -> Self {
        Command::StartGame {
            bet_amount: bet_amount.unwrap_or(DEFAULT_BET_AMOUNT).to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Command::Help => "help",
            Command::StartGame { .. } => "start",
            Command::Leaderboard => "leaderboard",
            Command::Latest => "latest",
            Command::Unknown(_) => "unknown",
        }
    }

    /// Whether the handler reads the sender's external identity
    pub fn uses_sender(&self) -> bool {
        matches!(self, Command::StartGame { .. })
    }
}
