//! Internal mail editor. Messages are prepended so the newest appears
//! first. Recipient lookup goes through the staff editor's directory query,
//! never through the staff cache key directly.

use crate::errors::AppError;
use crate::mirror::{docs, RemoteMirror};
use crate::models::{new_id, DirectoryEntry, MailDraft, MailMessage};
use crate::store::keys;

use super::collection::{CollectionEditor, RemoteAddress};
use super::staff::StaffEditor;

const REMOTE: RemoteAddress = RemoteAddress {
    collection: docs::DATA_COLLECTION,
    document_id: docs::MAIL_MESSAGES,
};

/// Editor for the internal mailbox.
#[derive(Debug, Clone)]
pub struct MailEditor {
    inner: CollectionEditor<MailMessage>,
}

impl MailEditor {
    pub fn load(mirror: RemoteMirror) -> Self {
        let inner = CollectionEditor::load(mirror, keys::MAIL, Some(REMOTE), &[], Vec::new());
        Self { inner }
    }

    pub fn messages(&self) -> &[MailMessage] {
        self.inner.items()
    }

    /// Manual pull-to-sync against the cloud snapshot.
    pub async fn sync(&mut self) -> Result<bool, AppError> {
        self.inner.sync().await
    }

    /// Addressable recipients, taken from the staff directory.
    pub fn recipients(&self, staff: &StaffEditor) -> Vec<DirectoryEntry> {
        staff.directory_entries()
    }

    pub fn send(&mut self, draft: MailDraft) -> Result<MailMessage, AppError> {
        if draft.subject.trim().is_empty() {
            return Err(AppError::Validation("Mail subject is required".to_string()));
        }
        if draft.recipient_id.trim().is_empty() {
            return Err(AppError::Validation("Mail recipient is required".to_string()));
        }
        let message = MailMessage {
            id: new_id("mail"),
            sender_id: draft.sender_id,
            sender_name: draft.sender_name,
            sender_role: draft.sender_role,
            recipient_id: draft.recipient_id,
            recipient_name: draft.recipient_name,
            subject: draft.subject.trim().to_string(),
            body: draft.body,
            date: chrono::Utc::now().to_rfc3339(),
            is_read: false,
            attachments: draft.attachments,
        };
        let sent = message.clone();
        self.inner.mutate(|list| list.insert(0, message))?;
        Ok(sent)
    }

    pub fn mark_read(&mut self, id: &str) -> Result<(), AppError> {
        if !self.inner.items().iter().any(|m| m.id == id) {
            return Err(AppError::NotFound(format!("Message {} not found", id)));
        }
        let id = id.to_string();
        self.inner.mutate(|list| {
            for message in list.iter_mut() {
                if message.id == id {
                    message.is_read = true;
                    break;
                }
            }
        })
    }

    pub fn delete(&mut self, id: &str) -> Result<(), AppError> {
        if !self.inner.items().iter().any(|m| m.id == id) {
            return Err(AppError::NotFound(format!("Message {} not found", id)));
        }
        let id = id.to_string();
        self.inner.mutate(|list| list.retain(|m| m.id != id))
    }

    /// Messages addressed to the given user, newest first.
    pub fn inbox(&self, user_id: &str) -> Vec<&MailMessage> {
        self.inner
            .items()
            .iter()
            .filter(|m| m.recipient_id == user_id)
            .collect()
    }

    /// Messages sent by the given user, newest first.
    pub fn sent(&self, user_id: &str) -> Vec<&MailMessage> {
        self.inner
            .items()
            .iter()
            .filter(|m| m.sender_id == user_id)
            .collect()
    }

    pub fn unread_count(&self, user_id: &str) -> usize {
        self.inner
            .items()
            .iter()
            .filter(|m| m.recipient_id == user_id && !m.is_read)
            .count()
    }
}
