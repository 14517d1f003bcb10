//! Remote mirror client.
//!
//! Mirrors whole-document snapshots to a remote document API, addressed by
//! `(collection, documentId)`. The local cache is always written first and is
//! the durable copy; every network failure degrades to it. No method here
//! propagates a remote error to its caller.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::errors::AppError;
use crate::store::CacheStore;

/// Header carrying the API key on remote requests.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Remote collection and document names.
pub mod docs {
    pub const CONFIG_COLLECTION: &str = "app_config";
    pub const DATA_COLLECTION: &str = "app_data";

    pub const GLOBAL_SETTINGS: &str = "global_settings";
    pub const TICKER_NEWS: &str = "ticker_news";
    pub const STAFF_LIST: &str = "staff_list";
    pub const SCHOOL_REGISTRY: &str = "school_registry";
    pub const NEWS_FEED: &str = "news_feed";
    pub const MAIL_MESSAGES: &str = "mail_messages";
}

/// Wire shape of a remote document: always a full snapshot, never a delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    pub content: Value,
    pub last_updated: String,
}

/// Configured remote endpoint.
#[derive(Debug, Clone)]
struct RemoteBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RemoteBackend {
    fn document_url(&self, collection: &str, document_id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            collection,
            document_id
        )
    }

    fn apply_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn fetch_document(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<RemoteDocument>, reqwest::Error> {
        let request = self.client.get(self.document_url(collection, document_id));
        let response = self.apply_key(request).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let document = response.error_for_status()?.json().await?;
        Ok(Some(document))
    }

    async fn put_document(
        &self,
        collection: &str,
        document_id: &str,
        content: Value,
    ) -> Result<(), reqwest::Error> {
        let document = RemoteDocument {
            content,
            last_updated: chrono::Utc::now().to_rfc3339(),
        };
        let request = self
            .client
            .put(self.document_url(collection, document_id))
            .json(&document);
        self.apply_key(request).send().await?.error_for_status()?;
        Ok(())
    }
}

/// Handle to a live document subscription. Dropping it (or calling
/// [`Subscription::unsubscribe`]) stops delivery; no callback fires after
/// teardown.
#[derive(Debug)]
pub struct Subscription {
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Subscription {
    fn inactive() -> Self {
        Self { handle: None }
    }

    /// Tear down the subscription.
    pub fn unsubscribe(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Best-effort remote document mirror over the local cache.
#[derive(Debug, Clone)]
pub struct RemoteMirror {
    cache: CacheStore,
    backend: Option<RemoteBackend>,
    poll_interval: Duration,
}

impl RemoteMirror {
    /// Build a mirror from configuration. Without a remote base URL the
    /// mirror runs local-only: saves stop at the cache and subscriptions
    /// deliver the cached value once.
    pub fn new(cache: CacheStore, config: &Config) -> Self {
        let backend = config.remote_base_url.as_ref().map(|base_url| {
            RemoteBackend {
                client: reqwest::Client::new(),
                base_url: base_url.clone(),
                api_key: config.remote_api_key.clone(),
            }
        });
        if backend.is_none() {
            tracing::warn!("No remote URL configured (PORTAL_REMOTE_URL). Cloud sync is disabled.");
        }
        Self {
            cache,
            backend,
            poll_interval: config.poll_interval,
        }
    }

    /// Whether a remote endpoint is configured.
    pub fn is_remote_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// The underlying local cache.
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Cache key mirroring a remote document locally.
    pub fn local_key(collection: &str, document_id: &str) -> String {
        format!("local_{}_{}", collection, document_id)
    }

    /// Save a full snapshot.
    ///
    /// The cache write is the durable leg and the only one that can fail.
    /// The network push runs on a detached task; its failure is logged and
    /// swallowed.
    pub fn save(
        &self,
        collection: &str,
        document_id: &str,
        value: &Value,
    ) -> Result<(), AppError> {
        let key = Self::local_key(collection, document_id);
        self.cache.set(&key, value)?;

        if let Some(backend) = self.backend.clone() {
            // The push leg needs a runtime; without one the save stays
            // cache-only instead of panicking in a synchronous caller.
            let Ok(handle) = tokio::runtime::Handle::try_current() else {
                tracing::warn!(
                    "No async runtime, skipping cloud push for {}/{}",
                    collection,
                    document_id
                );
                return Ok(());
            };
            let collection = collection.to_string();
            let document_id = document_id.to_string();
            let content = value.clone();
            handle.spawn(async move {
                if let Err(err) = backend
                    .put_document(&collection, &document_id, content)
                    .await
                {
                    tracing::warn!(
                        "Cloud push failed for {}/{}: {}",
                        collection,
                        document_id,
                        err
                    );
                }
            });
        }
        Ok(())
    }

    /// Fetch the current remote snapshot once.
    ///
    /// On success the cache is refreshed and the remote value returned. On
    /// any failure the cached value (or `None`) is returned instead; this
    /// method never errors.
    pub async fn fetch_once(&self, collection: &str, document_id: &str) -> Option<Value> {
        let key = Self::local_key(collection, document_id);

        let Some(backend) = &self.backend else {
            return self.cache.get(&key);
        };

        match backend.fetch_document(collection, document_id).await {
            Ok(Some(document)) => {
                if let Err(err) = self.cache.set(&key, &document.content) {
                    tracing::warn!("Cache refresh failed for {:?}: {}", key, err);
                }
                Some(document.content)
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(
                    "Cloud fetch failed for {}/{}, using local copy: {}",
                    collection,
                    document_id,
                    err
                );
                self.cache.get(&key)
            }
        }
    }

    /// Subscribe to live changes of one remote document.
    ///
    /// The callback fires synchronously with the cached value if present,
    /// then once per observed remote change with the full new snapshot.
    /// Without a configured remote the immediate local callback is all that
    /// happens and teardown is a no-op.
    pub fn subscribe<F>(&self, collection: &str, document_id: &str, callback: F) -> Subscription
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        let key = Self::local_key(collection, document_id);

        if let Some(cached) = self.cache.get(&key) {
            callback(cached);
        }

        let Some(backend) = self.backend.clone() else {
            return Subscription::inactive();
        };

        let cache = self.cache.clone();
        let collection = collection.to_string();
        let document_id = document_id.to_string();
        let poll_interval = self.poll_interval;
        let callback: Arc<dyn Fn(Value) + Send + Sync> = Arc::new(callback);

        let handle = tokio::spawn(async move {
            let mut last_seen: Option<String> = None;
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match backend.fetch_document(&collection, &document_id).await {
                    Ok(Some(document)) => {
                        if last_seen.as_deref() != Some(document.last_updated.as_str()) {
                            if let Err(err) = cache.set(&key, &document.content) {
                                tracing::warn!("Cache refresh failed for {:?}: {}", key, err);
                            }
                            last_seen = Some(document.last_updated.clone());
                            callback(document.content);
                        }
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::debug!(
                            "Subscription poll failed for {}/{}: {}",
                            collection,
                            document_id,
                            err
                        );
                    }
                }
            }
        });

        Subscription {
            handle: Some(handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn offline_mirror() -> (RemoteMirror, TempDir) {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path()).unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            remote_base_url: None,
            remote_api_key: None,
            poll_interval: Duration::from_millis(50),
            assistant_url: None,
            assistant_api_key: None,
            log_level: "warn".to_string(),
        };
        (RemoteMirror::new(cache, &config), dir)
    }

    #[tokio::test]
    async fn test_save_is_durable_locally_without_remote() {
        let (mirror, dir) = offline_mirror();
        mirror.save("app_data", "staff_list", &json!([1, 2])).unwrap();

        let cache = CacheStore::open(dir.path()).unwrap();
        assert_eq!(
            cache.get(&RemoteMirror::local_key("app_data", "staff_list")),
            Some(json!([1, 2]))
        );
    }

    #[tokio::test]
    async fn test_fetch_once_offline_returns_cache() {
        let (mirror, _dir) = offline_mirror();
        assert_eq!(mirror.fetch_once("app_data", "news_feed").await, None);

        mirror.save("app_data", "news_feed", &json!(["a"])).unwrap();
        assert_eq!(
            mirror.fetch_once("app_data", "news_feed").await,
            Some(json!(["a"]))
        );
    }

    #[tokio::test]
    async fn test_subscribe_offline_fires_local_callback_once() {
        let (mirror, _dir) = offline_mirror();
        mirror
            .save("app_config", "ticker_news", &json!(["مرحبا"]))
            .unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let sub = mirror.subscribe("app_config", "ticker_news", move |value| {
            seen_clone.lock().unwrap().push(value);
        });

        // The local callback is synchronous; nothing else ever fires offline.
        assert_eq!(seen.lock().unwrap().as_slice(), &[json!(["مرحبا"])]);
        sub.unsubscribe();
    }

    #[tokio::test]
    async fn test_subscribe_without_cached_value_is_silent() {
        let (mirror, _dir) = offline_mirror();
        let fired = Arc::new(Mutex::new(0u32));
        let fired_clone = Arc::clone(&fired);
        let _sub = mirror.subscribe("app_config", "global_settings", move |_| {
            *fired_clone.lock().unwrap() += 1;
        });
        assert_eq!(*fired.lock().unwrap(), 0);
    }

    #[test]
    fn test_save_without_runtime_is_cache_only() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path()).unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            remote_base_url: Some("http://127.0.0.1:9".to_string()),
            remote_api_key: None,
            poll_interval: Duration::from_millis(50),
            assistant_url: None,
            assistant_api_key: None,
            log_level: "warn".to_string(),
        };
        let mirror = RemoteMirror::new(cache.clone(), &config);

        // Synchronous caller, no runtime: the push is skipped, not a panic
        mirror.save("app_data", "staff_list", &json!([1])).unwrap();
        assert_eq!(
            cache.get(&RemoteMirror::local_key("app_data", "staff_list")),
            Some(json!([1]))
        );
    }

    #[test]
    fn test_local_key_derivation() {
        assert_eq!(
            RemoteMirror::local_key("app_config", "global_settings"),
            "local_app_config_global_settings"
        );
    }
}
