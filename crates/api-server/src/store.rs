//! In-memory delete-on-read blob store.
//!
//! Payloads are opaque strings; the store never decodes them. Each entry can
//! be taken exactly once, and disappears at its expiry even if never read.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::distributions::Alphanumeric;
use rand::Rng;
use snaplink_crypto::FileMetadata;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Alphanumeric only, so ids never contain `_` and compact links stay
/// unambiguous.
pub const ID_LEN: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    Text,
    File,
}

#[derive(Debug, Clone)]
pub struct StoredSecret {
    pub kind: SecretKind,
    pub encrypted_secret: String,
    pub metadata: Option<FileMetadata>,
    expires_at: Instant,
}

impl StoredSecret {
    pub fn text(encrypted_secret: String) -> Self {
        Self {
            kind: SecretKind::Text,
            encrypted_secret,
            metadata: None,
            expires_at: Instant::now(),
        }
    }

    pub fn file(encrypted_secret: String, metadata: FileMetadata) -> Self {
        Self {
            kind: SecretKind::File,
            encrypted_secret,
            metadata: Some(metadata),
            expires_at: Instant::now(),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct SecretStore {
    entries: RwLock<HashMap<String, StoredSecret>>,
}

pub fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

impl SecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry for `ttl` and return its fresh id.
    pub async fn insert(&self, mut secret: StoredSecret, ttl: Duration) -> String {
        secret.expires_at = Instant::now() + ttl;

        let mut entries = self.entries.write().await;
        let id = loop {
            let candidate = generate_id();
            if !entries.contains_key(&candidate) {
                break candidate;
            }
        };
        entries.insert(id.clone(), secret);
        id
    }

    /// Remove and return the entry. A kind mismatch leaves the entry in place
    /// so that the matching endpoint can still consume it.
    pub async fn take(&self, id: &str, kind: SecretKind) -> Option<StoredSecret> {
        let mut entries = self.entries.write().await;
        let entry = entries.get(id)?;

        if entry.is_expired(Instant::now()) {
            entries.remove(id);
            return None;
        }
        if entry.kind != kind {
            return None;
        }
        entries.remove(id)
    }

    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Periodically drop expired entries so unread secrets do not pile up.
pub fn spawn_purger(store: Arc<SecretStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "purged expired secrets");
            }
        }
    })
}
