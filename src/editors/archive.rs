//! Memo archive and administrative form catalog editors. Both collections
//! are local-only: they are small, rarely shared and restored via backup.

use crate::errors::AppError;
use crate::mirror::RemoteMirror;
use crate::models::{new_id, AdminForm, Memo, MemoCategory};
use crate::store::keys;

use super::collection::CollectionEditor;

/// Fields supplied when archiving a memo.
#[derive(Debug, Clone)]
pub struct MemoDraft {
    pub title: String,
    pub reference: String,
    pub date: String,
    pub category: MemoCategory,
    pub file_url: Option<String>,
}

/// Editor for the official memo archive.
#[derive(Debug, Clone)]
pub struct MemoEditor {
    inner: CollectionEditor<Memo>,
}

impl MemoEditor {
    pub fn load(mirror: RemoteMirror) -> Self {
        let inner = CollectionEditor::load(mirror, keys::MEMOS, None, &[], Vec::new());
        Self { inner }
    }

    pub fn memos(&self) -> &[Memo] {
        self.inner.items()
    }

    pub fn add_memo(&mut self, draft: MemoDraft) -> Result<Memo, AppError> {
        if draft.title.trim().is_empty() {
            return Err(AppError::Validation("Memo title is required".to_string()));
        }
        let memo = Memo {
            id: new_id("memo"),
            title: draft.title.trim().to_string(),
            reference: draft.reference,
            date: draft.date,
            category: draft.category,
            file_url: draft.file_url,
        };
        let created = memo.clone();
        self.inner.mutate(|list| list.push(memo))?;
        Ok(created)
    }

    pub fn delete_memo(&mut self, id: &str) -> Result<(), AppError> {
        if !self.inner.items().iter().any(|m| m.id == id) {
            return Err(AppError::NotFound(format!("Memo {} not found", id)));
        }
        let id = id.to_string();
        self.inner.mutate(|list| list.retain(|m| m.id != id))
    }

    /// Linear filter by category and free text over title/reference.
    pub fn search(&self, category: Option<MemoCategory>, query: &str) -> Vec<&Memo> {
        let needle = query.trim();
        self.inner
            .items()
            .iter()
            .filter(|memo| category.map_or(true, |c| memo.category == c))
            .filter(|memo| {
                needle.is_empty()
                    || memo.title.contains(needle)
                    || memo.reference.contains(needle)
            })
            .collect()
    }
}

/// Fields supplied when publishing a form.
#[derive(Debug, Clone)]
pub struct FormDraft {
    pub title: String,
    pub category: String,
    pub size: String,
    pub file_data: Option<String>,
    pub file_name: Option<String>,
}

/// Editor for the downloadable form catalog.
#[derive(Debug, Clone)]
pub struct FormsEditor {
    inner: CollectionEditor<AdminForm>,
}

impl FormsEditor {
    pub fn load(mirror: RemoteMirror) -> Self {
        let inner = CollectionEditor::load(mirror, keys::FORMS, None, &[], Vec::new());
        Self { inner }
    }

    pub fn forms(&self) -> &[AdminForm] {
        self.inner.items()
    }

    pub fn add_form(&mut self, draft: FormDraft) -> Result<AdminForm, AppError> {
        if draft.title.trim().is_empty() {
            return Err(AppError::Validation("Form title is required".to_string()));
        }
        let form = AdminForm {
            id: new_id("form"),
            title: draft.title.trim().to_string(),
            category: draft.category,
            size: draft.size,
            file_data: draft.file_data,
            file_name: draft.file_name,
        };
        let created = form.clone();
        self.inner.mutate(|list| list.push(form))?;
        Ok(created)
    }

    pub fn delete_form(&mut self, id: &str) -> Result<(), AppError> {
        if !self.inner.items().iter().any(|f| f.id == id) {
            return Err(AppError::NotFound(format!("Form {} not found", id)));
        }
        let id = id.to_string();
        self.inner.mutate(|list| list.retain(|f| f.id != id))
    }

    pub fn by_category(&self, category: &str) -> Vec<&AdminForm> {
        self.inner
            .items()
            .iter()
            .filter(|f| f.category == category)
            .collect()
    }
}
