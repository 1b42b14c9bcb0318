//! Logging for scenarios.
//!
//! Every CLI invocation, ledger poll and report annotation is emitted through
//! [`tracing`]. Scenarios call [`test_logger`] once at their start so the
//! output is captured per test by the test harness.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    OnceLock,
};

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVES: &str = "info,iroha_cli_tests=debug";

static LOGGER_SET: AtomicBool = AtomicBool::new(false);

/// An error type for [`init_global`]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The logger may be installed once per process
    #[error("Logger is already set")]
    AlreadySet,
    /// Another subscriber was installed bypassing this module
    #[error("Failed to install the global subscriber")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
}

fn try_set_logger() -> Result<(), Error> {
    if LOGGER_SET
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(Error::AlreadySet);
    }
    Ok(())
}

/// Initializes the logger globally.
///
/// Directives are taken from `RUST_LOG`, falling back to [`DEFAULT_DIRECTIVES`].
/// Works only once per process, all subsequent invocations will fail.
///
/// For usage in tests consider [`test_logger`].
///
/// # Errors
/// If the logger is already set.
pub fn init_global(terminal_colors: bool) -> Result<(), Error> {
    try_set_logger()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let layer = fmt::layer()
        .with_ansi(terminal_colors)
        .with_test_writer()
        .compact();
    let subscriber = Registry::default().with(filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Lazily initialises the global logger for testing purposes.
///
/// Safe to call from every test; only the first call installs the subscriber.
///
/// # Panics
/// If [`init_global`] was called first.
pub fn test_logger() {
    static LOGGER: OnceLock<()> = OnceLock::new();

    LOGGER.get_or_init(|| {
        init_global(true).expect("`init_global()` should not be called before `test_logger()`");
    });
}
