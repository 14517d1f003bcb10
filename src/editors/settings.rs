//! Singleton editors: global settings and the ticker banner.
//!
//! Unlike the heavy collections, these are small documents whose freshness
//! matters immediately (a password change must reach every session without a
//! manual action), so they ride the mirror's live subscription path.

use crate::errors::AppError;
use crate::mirror::{docs, RemoteMirror, Subscription};
use crate::models::{AppSettings, UserRole};
use crate::store::keys;

/// Default ticker message shown before any has been published.
pub const DEFAULT_TICKER: &str =
    "مرحباً بكم في المنصة الرسمية للمديرية الإقليمية - تواصل، تدبير، تميز.";

/// Editor for the shared settings singleton.
#[derive(Debug, Clone)]
pub struct SettingsEditor {
    mirror: RemoteMirror,
    settings: AppSettings,
}

impl SettingsEditor {
    /// Load settings from the cache, seeding the hardcoded defaults on
    /// first boot.
    pub fn load(mirror: RemoteMirror) -> Self {
        let settings = match mirror.cache().get_as::<AppSettings>(keys::SETTINGS) {
            Some(settings) => settings,
            None => {
                let defaults = AppSettings::default();
                if let Err(err) = mirror.cache().set_as(keys::SETTINGS, &defaults) {
                    tracing::warn!("Failed to persist default settings: {}", err);
                }
                defaults
            }
        };
        Self { mirror, settings }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Replace the settings singleton. Admin only.
    pub fn update(&mut self, mut settings: AppSettings, role: UserRole) -> Result<(), AppError> {
        if !role.is_admin() {
            return Err(AppError::Unauthorized(
                "Only an admin can change settings".to_string(),
            ));
        }
        settings.last_updated = chrono::Utc::now().to_rfc3339();
        self.settings = settings;

        self.mirror.cache().set_as(keys::SETTINGS, &self.settings)?;
        let snapshot = serde_json::to_value(&self.settings)?;
        self.mirror
            .save(docs::CONFIG_COLLECTION, docs::GLOBAL_SETTINGS, &snapshot)
    }

    /// Live subscription to remote settings changes. The callback also fires
    /// synchronously with the mirrored local copy if one exists.
    pub fn watch<F>(&self, callback: F) -> Subscription
    where
        F: Fn(AppSettings) + Send + Sync + 'static,
    {
        self.mirror.subscribe(
            docs::CONFIG_COLLECTION,
            docs::GLOBAL_SETTINGS,
            move |value| match serde_json::from_value(value) {
                Ok(settings) => callback(settings),
                Err(err) => tracing::warn!("Ignoring malformed settings snapshot: {}", err),
            },
        )
    }

    /// Fold a remotely delivered snapshot into the working copy.
    pub fn apply_remote(&mut self, settings: AppSettings) {
        self.settings = settings;
    }
}

/// Editor for the scrolling ticker messages.
#[derive(Debug, Clone)]
pub struct TickerEditor {
    mirror: RemoteMirror,
    messages: Vec<String>,
}

impl TickerEditor {
    pub fn load(mirror: RemoteMirror) -> Self {
        let messages = mirror
            .cache()
            .get_as::<Vec<String>>(keys::TICKER)
            .unwrap_or_default();
        Self { mirror, messages }
    }

    /// Messages to display; falls back to the default banner when none are
    /// published.
    pub fn messages(&self) -> Vec<String> {
        if self.messages.is_empty() {
            vec![DEFAULT_TICKER.to_string()]
        } else {
            self.messages.clone()
        }
    }

    /// Replace the ticker messages. Admin only.
    pub fn update(&mut self, messages: Vec<String>, role: UserRole) -> Result<(), AppError> {
        if !role.is_admin() {
            return Err(AppError::Unauthorized(
                "Only an admin can change the ticker".to_string(),
            ));
        }
        self.messages = messages;
        self.mirror.cache().set_as(keys::TICKER, &self.messages)?;
        let snapshot = serde_json::to_value(&self.messages)?;
        self.mirror
            .save(docs::CONFIG_COLLECTION, docs::TICKER_NEWS, &snapshot)
    }

    /// Live subscription to remote ticker changes.
    pub fn watch<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Vec<String>) + Send + Sync + 'static,
    {
        self.mirror.subscribe(
            docs::CONFIG_COLLECTION,
            docs::TICKER_NEWS,
            move |value| match serde_json::from_value(value) {
                Ok(messages) => callback(messages),
                Err(err) => tracing::warn!("Ignoring malformed ticker snapshot: {}", err),
            },
        )
    }

    /// Fold a remotely delivered snapshot into the working copy.
    pub fn apply_remote(&mut self, messages: Vec<String>) {
        self.messages = messages;
    }
}
