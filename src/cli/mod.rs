//! Command-line surface
//!
//! The argument model is declared with clap's derive API, but the command is
//! built against the loaded store: commands that refer to an existing key get
//! the current key set as their possible values (see [`KeyPolicy`]).

pub mod dispatch;
pub mod env;
pub mod policy;

pub use dispatch::{Dispatcher, Outcome};
pub use env::EnvRenderer;
pub use policy::KeyPolicy;

use crate::logging::LogLevel;
use clap::{Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use clap_complete::Shell;
use std::ffi::OsString;

/// Binary name used for help and completion scripts
pub const BIN_NAME: &str = "kv";

#[derive(Parser, Debug)]
#[command(name = "kv")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A persistent key-value store for the shell", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Diagnostic verbosity (defaults to RUST_LOG, then info)
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Retrieve a value
    Get {
        /// Existing key
        key: String,
    },

    /// Set a value, overwriting it if it exists
    Set {
        /// New or existing key
        #[arg(index = 1)]
        key: String,

        /// Value to store
        #[arg(index = 2)]
        value: String,
    },

    /// Remove a value
    #[command(visible_alias = "remove")]
    Unset {
        /// Existing key
        key: String,
    },

    /// Remove all values
    Clear,

    /// Print key-value pairs as environment variables (where valid)
    Env {
        /// Prefix definitions with "export"
        #[arg(short = 'e', long, overrides_with = "no_export")]
        export: bool,

        /// Print bare definitions (default)
        #[arg(short = 'E', long, overrides_with = "export")]
        no_export: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Whether this command rewrites the state file
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Commands::Set { .. } | Commands::Unset { .. } | Commands::Clear
        )
    }
}

/// Key policy for each subcommand that takes a `<KEY>`
const KEY_POLICIES: &[(&str, KeyPolicy)] = &[
    ("get", KeyPolicy::RequireExisting),
    ("set", KeyPolicy::AllowAny),
    ("unset", KeyPolicy::RequireExisting),
];

/// Build the clap command with key arguments constrained to `keys`
///
/// `mut_arg` re-appends the argument it edits, so it is only called where the
/// policy constrains something; `set` keeps its declared `<KEY> <VALUE>` order.
pub fn build_command<'a>(keys: impl IntoIterator<Item = &'a str>) -> Command {
    let keys: Vec<&str> = keys.into_iter().collect();

    KEY_POLICIES
        .iter()
        .fold(Cli::command(), |cmd, &(name, policy)| match policy {
            KeyPolicy::AllowAny => cmd,
            KeyPolicy::RequireExisting => cmd.mut_subcommand(name, |sub| {
                sub.mut_arg("key", |arg| policy.apply(arg, keys.iter().copied()))
            }),
        })
}

/// Parse `args` against the given key set
pub fn try_parse_from<'a, I, T>(
    keys: impl IntoIterator<Item = &'a str>,
    args: I,
) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cmd = build_command(keys);
    let matches = cmd.try_get_matches_from_mut(args)?;
    Cli::from_arg_matches(&matches).map_err(|e| e.format(&mut cmd))
}

/// Parse the process arguments, exiting with a usage error on failure
pub fn parse<'a>(keys: impl IntoIterator<Item = &'a str>) -> Cli {
    try_parse_from(keys, std::env::args_os()).unwrap_or_else(|e| e.exit())
}
