//! News feed editor. Announcements are prepended so the newest appears
//! first; the feed is a heavy collection synced by explicit user action.

use crate::errors::AppError;
use crate::mirror::{docs, RemoteMirror};
use crate::models::{new_id, Announcement};
use crate::store::keys;

use super::collection::{CollectionEditor, RemoteAddress};

const REMOTE: RemoteAddress = RemoteAddress {
    collection: docs::DATA_COLLECTION,
    document_id: docs::NEWS_FEED,
};

/// Fields supplied when posting an announcement.
#[derive(Debug, Clone)]
pub struct AnnouncementDraft {
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub is_urgent: bool,
    pub link: Option<String>,
}

/// Editor for the announcement feed.
#[derive(Debug, Clone)]
pub struct FeedEditor {
    inner: CollectionEditor<Announcement>,
}

impl FeedEditor {
    pub fn load(mirror: RemoteMirror) -> Self {
        let inner = CollectionEditor::load(mirror, keys::NEWS, Some(REMOTE), &[], Vec::new());
        Self { inner }
    }

    pub fn announcements(&self) -> &[Announcement] {
        self.inner.items()
    }

    /// Replace the whole feed (used after a validated bulk import, e.g. the
    /// assistant's news retrieval).
    pub fn replace_all(&mut self, announcements: Vec<Announcement>) -> Result<(), AppError> {
        self.inner.replace_all(announcements)
    }

    /// Manual pull-to-sync against the cloud snapshot.
    pub async fn sync(&mut self) -> Result<bool, AppError> {
        self.inner.sync().await
    }

    pub fn post(&mut self, draft: AnnouncementDraft) -> Result<Announcement, AppError> {
        if draft.title.trim().is_empty() {
            return Err(AppError::Validation(
                "Announcement title is required".to_string(),
            ));
        }
        let announcement = Announcement {
            id: new_id("news"),
            title: draft.title.trim().to_string(),
            content: draft.content,
            author: draft.author,
            date: chrono::Utc::now().to_rfc3339(),
            category: draft.category,
            is_urgent: draft.is_urgent.then_some(true),
            link: draft.link,
        };
        let created = announcement.clone();
        self.inner.mutate(|list| list.insert(0, announcement))?;
        Ok(created)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), AppError> {
        if !self.inner.items().iter().any(|a| a.id == id) {
            return Err(AppError::NotFound(format!("Announcement {} not found", id)));
        }
        let id = id.to_string();
        self.inner.mutate(|list| list.retain(|a| a.id != id))
    }

    /// Linear filter over title and content.
    pub fn search(&self, query: &str) -> Vec<&Announcement> {
        let needle = query.trim();
        self.inner
            .items()
            .iter()
            .filter(|a| {
                needle.is_empty() || a.title.contains(needle) || a.content.contains(needle)
            })
            .collect()
    }
}
