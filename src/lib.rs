// kv - A persistent key-value store for the shell
// Small values and settings that survive across shell sessions

pub mod cli;
pub mod logging;
pub mod models;
pub mod state;

pub use anyhow::{Context, Result};

// Re-export commonly used types
pub use models::{Entry, Store};
pub use state::{StateStore, StoreError};
