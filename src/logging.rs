//! Logging setup
//!
//! The library only emits `tracing` events. Applications that want them on
//! stderr can install this subscriber, or their own.

use tracing_subscriber::EnvFilter;

/// Installs a formatted stderr subscriber
///
/// `verbose` raises this crate's level from info (0) through debug (1) to
/// trace (2); 3 or more traces every crate. `quiet` shows errors only.
/// `RUST_LOG`, when set, overrides both.
///
/// Returns false if a global subscriber was already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(verbose, quiet));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .try_init()
        .is_ok()
}

fn filter_for(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    match verbose {
        0 => EnvFilter::new("metallum=info,warn"),
        1 => EnvFilter::new("metallum=debug,info"),
        2 => EnvFilter::new("metallum=trace,debug"),
        _ => EnvFilter::new("trace"),
    }
}
