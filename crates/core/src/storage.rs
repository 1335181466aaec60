//! Dialog storage trait - where per-user dialogs live between turns.
//!
//! Contract shared by every backing:
//! - `get` returns an owned copy; mutating it changes nothing stored
//! - `set` takes ownership of the dialog it stores
//! - both count as a use of the entry for eviction purposes
//! - the store never fails on its own; only the default factory can fail

use async_trait::async_trait;

use crate::dialog::{Dialog, UserId};
use crate::error::Result;

/// Builds the dialog for a user id seen for the first time.
pub type DialogFactory<'a> = dyn Fn() -> Result<Dialog> + Send + Sync + 'a;

/// The core DialogStorage trait.
///
/// Implementations: LRU in-memory. Alternate eviction policies or shared
/// backings satisfy the same contract.
#[async_trait]
pub trait DialogStorage: Send + Sync {
    /// The backend name (e.g., "lru").
    fn name(&self) -> &str;

    /// Fetch a copy of the dialog for `id`.
    ///
    /// When `id` is absent, `default` is called and its dialog is stored
    /// before a copy is returned. If `default` fails, its error is returned
    /// and nothing is stored.
    async fn get(&self, id: &UserId, default: &DialogFactory<'_>) -> Result<Dialog>;

    /// Store `dialog` under `id`, replacing any existing entry.
    async fn set(&self, id: &UserId, dialog: Dialog);
}
