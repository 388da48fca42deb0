//! Application layer - Dispatch engine
//!
//! This layer contains:
//! - Messaging: stream dispatcher, command parser and router
//! - Services: identity resolution, leaderboard formatting
//! - Errors: the error taxonomy shared by all layers

pub mod errors;
pub mod messaging;
pub mod services;
