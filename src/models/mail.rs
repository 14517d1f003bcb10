//! Internal mail models.

use serde::{Deserialize, Serialize};

/// A mail attachment. `data` is an opaque data-URI string produced by the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    pub size: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub data: String,
}

/// An internal mail message. Messages are stored newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMessage {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_role: Option<String>,
    pub recipient_id: String,
    pub recipient_name: String,
    pub subject: String,
    pub body: String,
    pub date: String,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

/// Fields supplied when sending a message; the editor fills in the id, the
/// date and the unread flag.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailDraft {
    pub sender_id: String,
    pub sender_name: String,
    #[serde(default)]
    pub sender_role: Option<String>,
    pub recipient_id: String,
    pub recipient_name: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}
