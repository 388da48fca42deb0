//! Domain entities - Values flowing through the dispatch engine

pub mod command;
pub mod game;
pub mod identity;
pub mod message;

pub use command::{Command, DEFAULT_BET_AMOUNT};
pub use game::{CreateGameRequest, GameSession, LeaderboardSnapshot, PlayerStanding};
pub use identity::{MemberIdentity, SenderIdentity, SocialProfile, UNKNOWN_IDENTITY};
pub use message::{ContentType, InboundMessage};
