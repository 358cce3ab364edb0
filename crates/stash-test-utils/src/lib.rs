//! Shared test utilities for the stash workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`folder`]: [`TestFolder`](folder::TestFolder) builder for folder trees
//!   to scan and sync

pub mod folder;

pub use folder::TestFolder;

/// Route `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
