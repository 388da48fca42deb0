//! Application layer errors

use std::fmt;
use thiserror::Error;

/// Upstream service named in gateway errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    GameService,
    IdentityDirectory,
    TextGenerator,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::GameService => "game-service",
            Service::IdentityDirectory => "identity-directory",
            Service::TextGenerator => "text-generator",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Transport not ready: protocol client is not initialized")]
    TransportNotReady,

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Remote service call errors
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Any non-success HTTP status
    #[error("{service} responded with status {status}")]
    Remote { service: Service, status: u16 },

    /// Body did not match the expected shape
    #[error("{service} returned a malformed response: {reason}")]
    Malformed { service: Service, reason: String },

    #[error("{service} request failed: {reason}")]
    Network { service: Service, reason: String },

    #[error("{service} rejected input: {reason}")]
    InvalidInput { service: Service, reason: String },

    #[error("Too many identities: {requested} requested, at most {max} per call")]
    TooManyIdentities { requested: usize, max: usize },
}

impl GatewayError {
    pub fn service(&self) -> Option<Service> {
        match self {
            GatewayError::Remote { service, .. }
            | GatewayError::Malformed { service, .. }
            | GatewayError::Network { service, .. }
            | GatewayError::InvalidInput { service, .. } => Some(*service),
            GatewayError::TooManyIdentities { .. } => Some(Service::IdentityDirectory),
        }
    }

    /// HTTP status for `Remote` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Identity resolution errors
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Too many identities: {requested} requested, at most {max} per call")]
    TooManyIdentities { requested: usize, max: usize },

    #[error("Inbox state lookup failed: {0}")]
    Protocol(String),

    #[error(transparent)]
    Directory(#[from] GatewayError),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Conversation error: {0}")]
    Conversation(#[from] BotError),

    #[error("Identity resolution failed: {0}")]
    Identity(#[from] IdentityError),

    #[error("Remote call failed: {0}")]
    Gateway(#[from] GatewayError),
}

impl CommandError {
    /// The remote call behind this failure, if any
    pub fn gateway(&self) -> Option<&GatewayError> {
        match self {
            CommandError::Gateway(e) | CommandError::Identity(IdentityError::Directory(e)) => Some(e),
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_names_service_and_status() {
        let err = GatewayError::Remote { service: Service::GameService, status: 503 };
        assert_eq!(err.to_string(), "game-service responded with status 503");
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.service(), Some(Service::GameService));
    }

    #[test]
    fn identity_error_wraps_directory_failure() {
        let err: IdentityError = GatewayError::Remote { service: Service::IdentityDirectory, status: 401 }.into();
        assert_eq!(err.to_string(), "identity-directory responded with status 401");
    }

    #[test]
    fn command_error_exposes_remote_call() {
        let direct: CommandError = GatewayError::Remote { service: Service::GameService, status: 500 }.into();
        assert_eq!(direct.gateway().and_then(GatewayError::status), Some(500));

        let nested: CommandError = IdentityError::Directory(GatewayError::Remote {
            service: Service::IdentityDirectory,
            status: 429,
        })
        .into();
        assert_eq!(nested.gateway().and_then(GatewayError::service), Some(Service::IdentityDirectory));

        let local: CommandError = IdentityError::TooManyIdentities { requested: 351, max: 350 }.into();
        assert!(local.gateway().is_none());
    }
}
