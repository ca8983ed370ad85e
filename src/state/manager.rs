//! StateStore - kv.json lifecycle (locate, initialize, load, persist)

use crate::models::Store;
use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the state file inside the state directory
pub const STATE_FILE_NAME: &str = "kv.json";

/// Result type for state file operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when working with the state file
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access state file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not determine a per-user state directory")]
    NoStateDir,

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// The loaded store together with the file it came from
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    store: Store,
}

impl StateStore {
    /// Resolve the default state file location
    ///
    /// Uses the platform state directory (`$XDG_STATE_HOME` on Linux),
    /// then `~/.local/state`, then the local data directory.
    pub fn locate() -> StoreResult<PathBuf> {
        let dir = dirs::state_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("state")))
            .or_else(dirs::data_local_dir)
            .ok_or(StoreError::NoStateDir)?;

        Ok(dir.join(STATE_FILE_NAME))
    }

    /// Create the state file with an empty store if it does not exist yet
    ///
    /// Returns `true` when the file was created by this call.
    pub fn ensure_exists(path: &Path) -> StoreResult<bool> {
        if path.exists() {
            return Ok(false);
        }

        tracing::info!("Initializing key-value store at {}", path.display());
        Self::persist(path, &Store::new())?;
        Ok(true)
    }

    /// Read and decode the state file
    ///
    /// A missing file yields an empty store. A file that fails to decode is
    /// moved aside to `<name>.<timestamp>.bak` and an empty store is returned; only I/O
    /// failures while reading are reported as errors.
    pub fn load(path: &Path) -> StoreResult<Store> {
        if !path.exists() {
            return Ok(Store::new());
        }

        let content = fs::read_to_string(path)?;

        match serde_json::from_str::<Store>(&content) {
            Ok(store) => Ok(store),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse {}: {}. Backing up and starting fresh.",
                    path.display(),
                    e
                );

                let backup_path = Self::backup_path(path);
                if let Err(backup_err) = fs::rename(path, &backup_path) {
                    tracing::warn!("Failed to backup corrupt state file: {}", backup_err);
                } else {
                    tracing::info!("Corrupt state file moved to {}", backup_path.display());
                }

                Ok(Store::new())
            }
        }
    }

    /// Pick an unused backup name next to `path`
    ///
    /// Earlier backups are never overwritten.
    fn backup_path(path: &Path) -> PathBuf {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| STATE_FILE_NAME.to_string());
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%3f");

        let mut candidate = path.with_file_name(format!("{}.{}.bak", file_name, stamp));
        let mut n = 1;
        while candidate.exists() {
            candidate = path.with_file_name(format!("{}.{}-{}.bak", file_name, stamp, n));
            n += 1;
        }
        candidate
    }

    /// Replace the whole state file with the encoded store
    ///
    /// Writes into a temp file in the same directory and renames it over
    /// `path`, so a crash leaves either the old or the new contents.
    pub fn persist(path: &Path, store: &Store) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(store)?;

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                StoreError::InvalidPath(format!("{} has no parent directory", path.display()))
            })?;
        fs::create_dir_all(parent)?;

        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.write_all(b"\n")?;
        temp_file.flush()?;

        temp_file.persist(path).map_err(|e| StoreError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        Ok(())
    }

    /// Load the store at `path`
    ///
    /// Does not create the file; callers run [`StateStore::ensure_exists`] first.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let store = Self::load(&path)?;
        tracing::debug!("Using data at {} ({} entries)", path.display(), store.len());

        Ok(Self { path, store })
    }

    /// Write the in-memory store back to its file
    pub fn save(&self) -> StoreResult<()> {
        Self::persist(&self.path, &self.store)
    }

    /// Get current store (read-only)
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Get state file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
