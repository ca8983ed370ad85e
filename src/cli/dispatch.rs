//! Command dispatch - runs one parsed command against the loaded store

use super::{build_command, Commands, EnvRenderer, BIN_NAME};
use crate::state::StateStore;
use anyhow::{anyhow, Context, Result};
use std::io::Write;

/// What a dispatched command did to the state file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was written
    ReadOnly,
    /// The state file was rewritten
    Persisted,
}

/// Executes commands against a [`StateStore`]
pub struct Dispatcher {
    state: StateStore,
    env: EnvRenderer,
}

impl Dispatcher {
    pub fn new(state: StateStore) -> Result<Self> {
        Ok(Self {
            state,
            env: EnvRenderer::new()?,
        })
    }

    /// Run `command`, writing user-facing output to `out`
    ///
    /// Mutating commands rewrite the state file once the store has changed.
    pub fn run(&mut self, command: Commands, out: &mut impl Write) -> Result<Outcome> {
        tracing::debug!("Dispatching {:?}", command);
        let mutating = command.is_mutating();

        match command {
            Commands::Get { key } => {
                let entry = self
                    .state
                    .store()
                    .get(&key)
                    .ok_or_else(|| anyhow!("Key '{}' not found", key))?;
                writeln!(out, "{}", entry.value)?;
            }

            Commands::Set { key, value } => {
                if self.state.store_mut().set(key.as_str(), value).is_some() {
                    tracing::debug!("Overwrote existing key {}", key);
                }
            }

            Commands::Unset { key } => {
                self.state
                    .store_mut()
                    .remove(&key)
                    .ok_or_else(|| anyhow!("Key '{}' not found", key))?;
            }

            Commands::Clear => {
                self.state.store_mut().clear();
            }

            Commands::Env { export, .. } => {
                let written = self.env.render(self.state.store(), export, out)?;
                tracing::debug!("Printed {} assignments", written);
            }

            Commands::Completions { shell } => {
                let mut cmd = build_command(self.state.store().keys());
                clap_complete::generate(shell, &mut cmd, BIN_NAME, out);
            }
        }

        if mutating {
            self.save()
        } else {
            Ok(Outcome::ReadOnly)
        }
    }

    fn save(&self) -> Result<Outcome> {
        self.state.save().with_context(|| {
            format!(
                "Failed to write key-value store at {}",
                self.state.path().display()
            )
        })?;
        Ok(Outcome::Persisted)
    }

    /// Get the underlying state (read-only)
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn into_state(self) -> StateStore {
        self.state
    }
}
