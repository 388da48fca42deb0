use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel rendered wherever an identity could not be resolved
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// A conversation member as reported by the protocol client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberIdentity {
    pub inbox_id: String,
    /// Recovery address of the inbox, if the protocol knows one
    pub external_address: Option<String>,
    /// Carried for completeness; the dispatch engine never reads it
    pub installation_ids: Vec<String>,
}

impl MemberIdentity {
    pub fn new(inbox_id: impl Into<String>) -> Self {
        Self {
            inbox_id: inbox_id.into(),
            external_address: None,
            installation_ids: Vec::new(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.external_address = Some(address.into());
        self
    }
}

/// Social-platform profile returned by the identity directory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SocialProfile {
    pub fid: u64,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub pfp_url: Option<String>,
    #[serde(default)]
    pub custody_address: Option<String>,
    #[serde(default)]
    pub verifications: Vec<String>,
}

/// Best-effort identity of a message sender.
///
/// Built fresh for every command; never cached across messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    pub inbox_id: String,
    pub address: Option<String>,
    pub handle: Option<String>,
}

impl SenderIdentity {
    pub fn unresolved(inbox_id: impl Into<String>) -> Self {
        Self {
            inbox_id: inbox_id.into(),
            address: None,
            handle: None,
        }
    }

    pub fn address_or_unknown(&self) -> &str {
        self.address.as_deref().unwrap_or(UNKNOWN_IDENTITY)
    }

    pub fn handle_or_unknown(&self) -> &str {
        self.handle.as_deref().unwrap_or(UNKNOWN_IDENTITY)
    }
}

impl fmt::Display for SenderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.handle, &self.address) {
            (Some(handle), _) => write!(f, "@{}", handle),
            (None, Some(address)) => write!(f, "{}", address),
            (None, None) => write!(f, "{}", self.inbox_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_display_prefers_handle_then_address() {
        let mut sender = SenderIdentity::unresolved("inbox-1");
        assert_eq!(sender.to_string(), "inbox-1");
        assert_eq!(sender.address_or_unknown(), UNKNOWN_IDENTITY);

        sender.address = Some("0xA11CE".to_string());
        assert_eq!(sender.to_string(), "0xA11CE");

        sender.handle = Some("alice".to_string());
        assert_eq!(sender.to_string(), "@alice");
        assert_eq!(sender.handle_or_unknown(), "alice");
    }
}
