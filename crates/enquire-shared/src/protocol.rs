use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::PREVIEW_CHARS;
use crate::types::InquiryCategory;

/// Messages pushed from the server to notification sockets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once, right after the socket is accepted
    ConnectionEstablished { message: String },

    /// A new inquiry was stored
    NewContact { data: NotificationPayload },

    /// Refreshed pending/total counters
    CountUpdate { data: InquiryCounts },

    /// Answer to a client ping
    Pong { message: String },
}

impl ServerMessage {
    pub fn connection_established() -> Self {
        Self::ConnectionEstablished {
            message: "Connected to admin notifications".to_string(),
        }
    }

    pub fn pong() -> Self {
        Self::Pong {
            message: "Connection alive".to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Messages a notification socket may send. Anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
}

impl ClientMessage {
    /// `None` for malformed JSON or unknown message types.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InquiryCounts {
    pub pending_count: u64,
    pub total_count: u64,
}

/// Summary of a freshly created inquiry as shown in the staff live feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub inquiry_id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub category_label: String,
    pub created_at: String,
    pub message_preview: String,
    pub pending_count: u64,
    pub total_count: u64,
}

impl NotificationPayload {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        inquiry_id: i64,
        name: &str,
        email: &str,
        subject: &str,
        category: InquiryCategory,
        created_at: DateTime<Utc>,
        message: &str,
        counts: InquiryCounts,
    ) -> Self {
        Self {
            inquiry_id,
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            category_label: category.label().to_string(),
            created_at: created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            message_preview: preview(message),
            pending_count: counts.pending_count,
            total_count: counts.total_count,
        }
    }
}

/// First `PREVIEW_CHARS` characters, with an ellipsis only when cut.
pub fn preview(message: &str) -> String {
    if message.chars().count() <= PREVIEW_CHARS {
        return message.to_string();
    }
    let mut cut: String = message.chars().take(PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}
