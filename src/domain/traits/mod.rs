//! Domain traits - Abstractions for infrastructure implementations

pub mod messaging;
pub mod services;

pub use messaging::{Conversation, MessagingClient};
pub use services::{GameService, IdentityDirectory, TextGenerator};
