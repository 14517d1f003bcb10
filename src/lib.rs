//! Portal Data Core
//!
//! Local-first data layer for the provincial education directorate portal:
//! a synchronous JSON cache, a best-effort remote mirror, per-feature domain
//! editors, CSV import/export, whole-store backup and an AI assistant client.

pub mod assistant;
pub mod auth;
pub mod backup;
pub mod config;
pub mod editors;
pub mod errors;
pub mod importing;
pub mod mirror;
pub mod models;
pub mod store;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::Assistant;
use crate::config::Config;
use crate::editors::{
    FeedEditor, FormsEditor, MailEditor, MemoEditor, RegistryEditor, SettingsEditor, StaffEditor,
    TickerEditor,
};
use crate::errors::AppError;
use crate::mirror::RemoteMirror;
use crate::store::CacheStore;

/// Top-level handle wiring the cache and the mirror together. Editors are
/// loaded from it on demand, each carrying its own mirror clone.
#[derive(Debug, Clone)]
pub struct Portal {
    cache: CacheStore,
    mirror: RemoteMirror,
    assistant: Assistant,
}

impl Portal {
    /// Open the local cache and connect the mirror per the configuration.
    pub fn open(config: &Config) -> Result<Self, AppError> {
        let cache = CacheStore::open(&config.data_dir)?;
        let mirror = RemoteMirror::new(cache.clone(), config);
        let assistant = Assistant::new(config);

        if mirror.is_remote_configured() {
            tracing::info!("Remote mirror enabled");
        } else {
            tracing::info!("Remote mirror disabled, running on the local cache only");
        }

        Ok(Self {
            cache,
            mirror,
            assistant,
        })
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn mirror(&self) -> &RemoteMirror {
        &self.mirror
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    pub fn staff(&self) -> StaffEditor {
        StaffEditor::load(self.mirror.clone())
    }

    pub fn registry(&self) -> RegistryEditor {
        RegistryEditor::load(self.mirror.clone())
    }

    pub fn memos(&self) -> MemoEditor {
        MemoEditor::load(self.mirror.clone())
    }

    pub fn forms(&self) -> FormsEditor {
        FormsEditor::load(self.mirror.clone())
    }

    pub fn feed(&self) -> FeedEditor {
        FeedEditor::load(self.mirror.clone())
    }

    pub fn mail(&self) -> MailEditor {
        MailEditor::load(self.mirror.clone())
    }

    pub fn settings(&self) -> SettingsEditor {
        SettingsEditor::load(self.mirror.clone())
    }

    pub fn ticker(&self) -> TickerEditor {
        TickerEditor::load(self.mirror.clone())
    }
}

/// Initialize logging from `RUST_LOG`, falling back to the configured level.
pub fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
