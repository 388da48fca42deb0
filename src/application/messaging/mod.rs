//! Message handling - Stream consumption, parsing and command routing

pub mod dedup;
pub mod dispatcher;
pub mod parser;
pub mod router;

pub use dispatcher::{DispatchStats, Outcome, StreamDispatcher};
pub use parser::CommandParser;
pub use router::CommandRouter;
