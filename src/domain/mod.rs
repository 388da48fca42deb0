//! Domain layer - Core types with no network dependencies
//!
//! This layer contains:
//! - Entities: Inbound messages, commands, identities, game records
//! - Traits: Abstractions over the protocol client and remote services

pub mod entities;
pub mod traits;
