use colored::Colorize;
use kv::cli::{self, Dispatcher};
use kv::logging::LogHandle;
use kv::{Result, StateStore};
use std::io;

fn main() {
    let log = kv::logging::init();

    if let Err(e) = run(&log) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run(log: &LogHandle) -> Result<()> {
    let path = StateStore::locate()?;

    // No store can be used without a state file, so this is not recoverable
    if let Err(e) = StateStore::ensure_exists(&path) {
        tracing::error!(
            "Error initializing key-value store at {}: {}",
            path.display(),
            e
        );
        std::process::exit(1);
    }

    // Keys are loaded before parsing so get/unset can be validated against them
    let state = StateStore::open(&path)?;
    let args = cli::parse(state.store().keys());
    if let Some(level) = args.log_level {
        log.set_level(level);
    }
    tracing::debug!("Invoked with {:?}", args.command);

    let mut dispatcher = Dispatcher::new(state)?;
    dispatcher.run(args.command, &mut io::stdout().lock())?;

    Ok(())
}
