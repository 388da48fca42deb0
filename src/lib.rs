//! Squabble chat bot: consumes a messaging stream, dispatches `/squabble`
//! commands and brokers them to the game service.

pub mod application;
pub mod domain;
pub mod infrastructure;
