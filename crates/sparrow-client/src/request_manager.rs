//! Request lifecycle registry.
//!
//! Maps a logical request key to the cancellation handle of the in-flight
//! request. Issuing a new request under an existing key cancels the prior
//! one (last-writer-wins); a periodic sweep cancels and evicts entries that
//! outlived the staleness TTL so the map stays bounded.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How often the background sweeper runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(10);

/// Age past which an entry is considered abandoned.
pub const STALE_TTL: Duration = Duration::from_secs(30);

/// A tracked in-flight request.
#[derive(Debug)]
struct ActiveRequest {
    token: CancellationToken,
    started_at: Instant,
    url: String,
}

/// Registry of in-flight requests keyed by a caller-supplied string.
#[derive(Clone, Default)]
pub struct RequestManager {
    entries: Arc<RwLock<HashMap<String, ActiveRequest>>>,
}

impl RequestManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new request under `key`, cancelling any prior request
    /// with the same key first. Returns the token the caller should select
    /// against while awaiting the request future.
    pub async fn begin(&self, key: impl Into<String>, url: impl Into<String>) -> CancellationToken {
        let key = key.into();
        let token = CancellationToken::new();
        let entry = ActiveRequest {
            token: token.clone(),
            started_at: Instant::now(),
            url: url.into(),
        };

        let mut entries = self.entries.write().await;
        if let Some(previous) = entries.insert(key.clone(), entry) {
            tracing::debug!(key = %key, url = %previous.url, "superseding in-flight request");
            previous.token.cancel();
        }
        token
    }

    /// Removes the entry for a completed request without cancelling it.
    pub async fn complete(&self, key: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(key);
    }

    /// Cancels and removes the entry for `key`. Returns whether one existed.
    pub async fn cancel(&self, key: &str) -> bool {
        let mut entries = self.entries.write().await;
        match entries.remove(key) {
            Some(entry) => {
                entry.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Number of tracked in-flight requests.
    pub async fn active_count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Cancels and evicts entries older than `ttl`; returns how many.
    pub async fn sweep_stale(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let stale: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.started_at) > ttl)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            if let Some(entry) = entries.remove(key) {
                tracing::debug!(key = %key, url = %entry.url, "evicting stale request");
                entry.token.cancel();
            }
        }
        stale.len()
    }

    /// Spawns the periodic sweeper task. The returned handle should be
    /// aborted on shutdown.
    pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            // The first tick fires immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = manager.sweep_stale(STALE_TTL).await;
                if evicted > 0 {
                    tracing::info!(evicted, "request sweep evicted stale entries");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_key_cancels_previous() {
        let manager = RequestManager::new();

        let first = manager.begin("chat:s1", "/agent/research/stream").await;
        assert!(!first.is_cancelled());

        let second = manager.begin("chat:s1", "/agent/research/stream").await;
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(manager.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_coexist() {
        let manager = RequestManager::new();

        let a = manager.begin("chat:s1", "/a").await;
        let b = manager.begin("chat:s2", "/b").await;
        assert!(!a.is_cancelled());
        assert!(!b.is_cancelled());
        assert_eq!(manager.active_count().await, 2);
    }

    #[tokio::test]
    async fn test_complete_removes_without_cancelling() {
        let manager = RequestManager::new();

        let token = manager.begin("k", "/x").await;
        manager.complete("k").await;
        assert!(!token.is_cancelled());
        assert_eq!(manager.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_cancel_removes_and_cancels() {
        let manager = RequestManager::new();

        let token = manager.begin("k", "/x").await;
        assert!(manager.cancel("k").await);
        assert!(token.is_cancelled());
        assert!(!manager.cancel("k").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_evicts_only_stale_entries() {
        let manager = RequestManager::new();

        let old = manager.begin("old", "/old").await;
        tokio::time::advance(Duration::from_secs(31)).await;
        let fresh = manager.begin("fresh", "/fresh").await;

        let evicted = manager.sweep_stale(STALE_TTL).await;
        assert_eq!(evicted, 1);
        assert!(old.is_cancelled());
        assert!(!fresh.is_cancelled());
        assert_eq!(manager.active_count().await, 1);
    }
}
