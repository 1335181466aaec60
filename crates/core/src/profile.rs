//! Profile generator trait - produces the persona text for a new dialog.

use crate::error::ProfileError;

/// Called whenever a dialog is created or reset. Expected to be fast; it
/// may run while a storage backend holds its lock.
pub trait ProfileGenerator: Send + Sync {
    /// The generator name (e.g., "static", "random").
    fn name(&self) -> &str;

    fn generate(&self) -> std::result::Result<String, ProfileError>;
}
