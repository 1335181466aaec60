//! LRU backend - a fixed number of dialogs, least recently used evicted first.
//!
//! One mutex guards both the map and the recency order. Entries are small and
//! cloned wholesale, so the lock is only held for a lookup plus a copy (and,
//! for a new user, one call to the default factory).

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use lru::LruCache;
use smalltalk_core::dialog::{Dialog, UserId};
use smalltalk_core::error::Result;
use smalltalk_core::storage::{DialogFactory, DialogStorage};
use tokio::sync::Mutex;
use tracing::debug;

/// An in-memory dialog store bounded to `capacity` users.
pub struct LruDialogStorage {
    dialogs: Mutex<LruCache<UserId, Dialog>>,
    capacity: NonZeroUsize,
    evictions: AtomicU64,
}

impl LruDialogStorage {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            dialogs: Mutex::new(LruCache::new(capacity)),
            capacity,
            evictions: AtomicU64::new(0),
        }
    }

    /// Like [`LruDialogStorage::new`], returning `None` for a zero capacity.
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        NonZeroUsize::new(capacity).map(Self::new)
    }

    /// Maximum number of dialogs held at once.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Number of dialogs currently held.
    pub async fn len(&self) -> usize {
        self.dialogs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.dialogs.lock().await.is_empty()
    }

    /// Total entries dropped to make room for new users.
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    fn insert(&self, dialogs: &mut LruCache<UserId, Dialog>, id: &UserId, dialog: Dialog) {
        // `push` hands back the old pair on overwrite too; only a different
        // key means something was evicted.
        if let Some((evicted, _)) = dialogs.push(id.clone(), dialog) {
            if &evicted != id {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(user_id = %evicted, "Evicted least recently used dialog");
            }
        }
    }
}

#[async_trait]
impl DialogStorage for LruDialogStorage {
    fn name(&self) -> &str {
        "lru"
    }

    async fn get(&self, id: &UserId, default: &DialogFactory<'_>) -> Result<Dialog> {
        let mut dialogs = self.dialogs.lock().await;
        if let Some(dialog) = dialogs.get(id) {
            return Ok(dialog.clone());
        }

        let dialog = default()?;
        debug!(user_id = %id, "Created dialog");
        self.insert(&mut dialogs, id, dialog.clone());
        Ok(dialog)
    }

    async fn set(&self, id: &UserId, dialog: Dialog) {
        let mut dialogs = self.dialogs.lock().await;
        self.insert(&mut dialogs, id, dialog);
    }
}
