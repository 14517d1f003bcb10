//! Generic collection editor: the lifecycle every feature shares.
//!
//! An editor owns the in-memory working copy of one feature's collection.
//! Reads always come from the working copy; every mutation produces a new
//! full snapshot that is persisted through the cache and, when the feature
//! has a remote address, pushed through the mirror. There are no partial
//! updates.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::mirror::RemoteMirror;

/// Remote address of a feature snapshot. Features without one are
/// local-only (memos, forms).
#[derive(Debug, Clone, Copy)]
pub struct RemoteAddress {
    pub collection: &'static str,
    pub document_id: &'static str,
}

/// A load-time rewrite of a raw snapshot, applied oldest-first before
/// deserialization. Replaces inline conditional patches at read sites.
pub type Migration = fn(Value) -> Value;

/// In-memory working copy of one feature collection plus its persistence
/// plumbing.
#[derive(Debug, Clone)]
pub struct CollectionEditor<T> {
    cache_key: &'static str,
    remote: Option<RemoteAddress>,
    migrations: &'static [Migration],
    mirror: RemoteMirror,
    items: Vec<T>,
}

impl<T> CollectionEditor<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    /// Load the collection: cached snapshot if present (run through the
    /// migration chain), otherwise the seed dataset, which is persisted so
    /// the next load sees it.
    pub fn load(
        mirror: RemoteMirror,
        cache_key: &'static str,
        remote: Option<RemoteAddress>,
        migrations: &'static [Migration],
        seed: Vec<T>,
    ) -> Self {
        let mut editor = Self {
            cache_key,
            remote,
            migrations,
            mirror,
            items: Vec::new(),
        };

        match editor.cached_snapshot() {
            Some(items) => editor.items = items,
            None => {
                editor.items = seed;
                if let Err(err) = editor.persist_cache() {
                    tracing::warn!("Failed to persist seed for {:?}: {}", cache_key, err);
                }
            }
        }
        editor
    }

    /// The current working copy.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace the whole collection and persist the new snapshot.
    pub fn replace_all(&mut self, items: Vec<T>) -> Result<(), AppError> {
        self.items = items;
        self.persist()
    }

    /// Apply a mutation to a structural copy of the collection, commit it as
    /// the new working copy and persist.
    ///
    /// On a storage failure the mutated copy is kept in memory; the session
    /// loses nothing, the change is just not durable until retried.
    pub fn mutate<F>(&mut self, apply: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Vec<T>),
    {
        let mut next = self.items.clone();
        apply(&mut next);
        self.items = next;
        self.persist()
    }

    /// Manual pull-to-sync: fetch the remote snapshot once and replace both
    /// the working copy and the cache with it.
    ///
    /// Returns `Ok(false)` for local-only collections. A missing or
    /// malformed remote snapshot surfaces as `AppError::Remote`; the
    /// working copy is untouched in that case.
    pub async fn sync(&mut self) -> Result<bool, AppError> {
        let Some(remote) = self.remote else {
            return Ok(false);
        };

        match self
            .mirror
            .fetch_once(remote.collection, remote.document_id)
            .await
        {
            Some(raw) => {
                let migrated = self.run_migrations(raw);
                let items: Vec<T> = serde_json::from_value(migrated).map_err(|err| {
                    AppError::Remote(format!(
                        "Cloud snapshot for {}/{} has an unexpected shape: {}",
                        remote.collection, remote.document_id, err
                    ))
                })?;
                self.items = items;
                self.persist_cache()?;
                Ok(true)
            }
            None => Err(AppError::Remote(format!(
                "No cloud snapshot reachable for {}/{}",
                remote.collection, remote.document_id
            ))),
        }
    }

    fn cached_snapshot(&self) -> Option<Vec<T>> {
        let raw = self.mirror.cache().get(self.cache_key)?;
        let migrated = self.run_migrations(raw);
        match serde_json::from_value(migrated) {
            Ok(items) => Some(items),
            Err(err) => {
                tracing::warn!(
                    "Cached snapshot {:?} has unexpected shape, reseeding: {}",
                    self.cache_key,
                    err
                );
                None
            }
        }
    }

    fn run_migrations(&self, raw: Value) -> Value {
        self.migrations
            .iter()
            .fold(raw, |value, migration| migration(value))
    }

    /// Persist to the cache and, when addressed, push to the remote mirror.
    fn persist(&self) -> Result<(), AppError> {
        self.persist_cache()?;
        if let Some(remote) = self.remote {
            let snapshot = serde_json::to_value(&self.items)?;
            self.mirror
                .save(remote.collection, remote.document_id, &snapshot)?;
        }
        Ok(())
    }

    fn persist_cache(&self) -> Result<(), AppError> {
        self.mirror.cache().set_as(self.cache_key, &self.items)
    }
}
