use chrono::{DateTime, Utc};

/// Protocol-level content type of an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Reaction,
    Reply,
    ReadReceipt,
    Attachment,
    GroupUpdated,
    Other(String),
}

impl ContentType {
    /// Map a protocol type id (`"text"`, `"reaction"`, ...) to a content type
    pub fn from_type_id(type_id: &str) -> Self {
        match type_id {
            "text" => ContentType::Text,
            "reaction" => ContentType::Reaction,
            "reply" => ContentType::Reply,
            "readReceipt" => ContentType::ReadReceipt,
            "attachment" | "remoteStaticAttachment" => ContentType::Attachment,
            "group_updated" => ContentType::GroupUpdated,
            other => ContentType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Text => "text",
            ContentType::Reaction => "reaction",
            ContentType::Reply => "reply",
            ContentType::ReadReceipt => "readReceipt",
            ContentType::Attachment => "attachment",
            ContentType::GroupUpdated => "group_updated",
            ContentType::Other(s) => s,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ContentType::Text)
    }
}

/// A message yielded by the protocol stream. Consumed once, never retained.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    pub conversation_id: String,
    pub sender_inbox_id: String,
    pub content_type: ContentType,
    pub content: Vec<u8>,
    pub sent_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(
        conversation_id: impl Into<String>,
        sender_inbox_id: impl Into<String>,
        content_type: ContentType,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.into(),
            sender_inbox_id: sender_inbox_id.into(),
            content_type,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }

    /// Plain text message helper
    pub fn text(
        conversation_id: impl Into<String>,
        sender_inbox_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(conversation_id, sender_inbox_id, ContentType::Text, text.into().into_bytes())
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Decoded text body, `None` when the payload is not valid UTF-8
    pub fn decoded_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    /// Case-insensitive sender comparison against an inbox id
    pub fn is_from(&self, inbox_id: &str) -> bool {
        self.sender_inbox_id.eq_ignore_ascii_case(inbox_id)
    }
}
