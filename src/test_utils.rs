//! Test utilities for enabling logging in tests

/// Installs a `tracing` subscriber writing to the test output at TRACE level, unless
/// `RUST_LOG` says otherwise. Safe to call from every test.
pub fn init_test_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}
