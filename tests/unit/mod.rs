//! Integration test target, wired through `[[test]]` in Cargo.toml

use tracing_subscriber::EnvFilter;

mod concurrency_tests;
mod reconstruction_tests;

/// Opt-in log output for test debugging, driven by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
