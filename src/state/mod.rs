//! kv.json Management Module
//!
//! Handles the on-disk lifecycle of the key-value store:
//! - Locating the state file under the per-user state directory
//! - First-run initialization
//! - Lenient loading (corrupt files fall back to an empty store)
//! - Atomic whole-file rewrites

mod manager;

pub use manager::{StateStore, StoreError, StoreResult, STATE_FILE_NAME};
