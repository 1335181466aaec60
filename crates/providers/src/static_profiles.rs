//! Static profiles - a fixed pool of persona texts read once at startup.
//!
//! The pool is a plain read-only value. Build it with [`ProfilePool::load`]
//! before serving and hand it to [`StaticProfiles`]; nothing reads the
//! directory after that.

use std::path::Path;
use std::sync::Arc;

use rand::seq::IndexedRandom;
use smalltalk_core::error::ProfileError;
use smalltalk_core::profile::ProfileGenerator;
use tracing::info;

/// Profile texts, one per file, in file-name order.
#[derive(Debug, Clone)]
pub struct ProfilePool {
    profiles: Vec<String>,
}

impl ProfilePool {
    /// Read every regular file in `dir`. Fails if the directory cannot be
    /// read or holds no files.
    pub fn load(dir: &Path) -> Result<Self, ProfileError> {
        let io_err = |e: std::io::Error| ProfileError::Io {
            path: dir.display().to_string(),
            reason: e.to_string(),
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let profiles = paths
            .iter()
            .map(|path| {
                std::fs::read_to_string(path).map_err(|e| ProfileError::Io {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if profiles.is_empty() {
            return Err(ProfileError::Empty(dir.display().to_string()));
        }

        info!(dir = %dir.display(), count = profiles.len(), "Loaded static profiles");
        Ok(Self { profiles })
    }

    /// Build a pool from in-memory texts.
    pub fn from_profiles(profiles: Vec<String>) -> Result<Self, ProfileError> {
        if profiles.is_empty() {
            return Err(ProfileError::Empty("in-memory pool".into()));
        }
        Ok(Self { profiles })
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }
}

/// Picks a uniformly random profile from a shared pool.
pub struct StaticProfiles {
    pool: Arc<ProfilePool>,
}

impl StaticProfiles {
    pub fn new(pool: Arc<ProfilePool>) -> Self {
        Self { pool }
    }
}

impl ProfileGenerator for StaticProfiles {
    fn name(&self) -> &str {
        "static"
    }

    fn generate(&self) -> Result<String, ProfileError> {
        self.pool
            .profiles
            .choose(&mut rand::rng())
            .cloned()
            .ok_or_else(|| ProfileError::Generation("profile pool is empty".into()))
    }
}
