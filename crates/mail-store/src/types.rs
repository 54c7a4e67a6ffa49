//! Message-store response types.
//!
//! The store speaks camelCase JSON with MIME-structured payloads whose
//! byte content is base64url-encoded.

use serde::Deserialize;

/// Label carried by messages the account itself sent.
pub const OUTGOING_LABEL: &str = "SENT";

/// A conversation and its message list, in chronological order.
#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    /// Thread identifier.
    pub id: String,
    /// Messages, oldest first.
    #[serde(default)]
    pub messages: Vec<MessageMeta>,
}

/// A message reference inside a thread listing.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageMeta {
    /// Message identifier.
    pub id: String,
    /// Labels, including the outgoing/sent marker.
    #[serde(default, rename = "labelIds")]
    pub label_ids: Vec<String>,
}

impl MessageMeta {
    /// Whether this message was sent by the account itself.
    pub fn is_outgoing(&self) -> bool {
        self.label_ids.iter().any(|label| label == OUTGOING_LABEL)
    }
}

/// A full message with its MIME payload tree.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Message identifier.
    pub id: String,
    /// Root payload part.
    pub payload: Option<MessagePart>,
}

/// One MIME part of a message payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagePart {
    /// MIME type, e.g. "text/plain" or "text/html".
    #[serde(default, rename = "mimeType")]
    pub mime_type: String,
    /// Part body, when present.
    pub body: Option<PartBody>,
    /// Nested parts for multipart messages.
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

impl MessagePart {
    /// Depth-first search for the first part with the given MIME type that
    /// carries data.
    pub fn find_part(&self, mime_type: &str) -> Option<&MessagePart> {
        if self.mime_type == mime_type && self.body.as_ref().is_some_and(|b| b.data.is_some()) {
            return Some(self);
        }
        self.parts.iter().find_map(|part| part.find_part(mime_type))
    }
}

/// Encoded bytes of one part.
#[derive(Debug, Clone, Deserialize)]
pub struct PartBody {
    /// base64url-encoded content, absent for container parts.
    pub data: Option<String>,
}
