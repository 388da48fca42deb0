//! Application services - Identity resolution and leaderboard formatting

pub mod identity;
pub mod leaderboard;

pub use identity::{IdentityResolver, ResolvedIdentity, MAX_IDENTITY_BATCH};
