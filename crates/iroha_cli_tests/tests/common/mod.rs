//! Setup shared by the scenarios.
//!
//! With `IROHA_CLI_BINARY` set, scenarios run against that CLI and the network
//! its client config points to. Otherwise they run against the offline
//! stand-in in `tests/fake_cli`, with a fresh ledger per scenario.

use std::{path::PathBuf, time::Duration};

use eyre::Result;
use iroha_cli_tests::{
    config::{self, Cli, Query},
    logger, Config, IrohaCli,
};
use tempfile::TempDir;

const FAKE_CLI: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fake_cli/iroha.sh");

/// CLI handle for one scenario, and the offline ledger it uses, if any.
///
/// The ledger is removed when the returned [`TempDir`] is dropped.
pub fn iroha_cli() -> Result<(IrohaCli, Option<TempDir>)> {
    logger::test_logger();

    if std::env::var_os(config::ENV_BINARY).is_some() {
        return Ok((IrohaCli::new(Config::from_env()?), None));
    }

    let ledger = tempfile::tempdir()?;
    let config = Config {
        cli: Cli {
            program: PathBuf::from("sh"),
            prefix_args: vec![FAKE_CLI.to_owned()],
        },
        client_config: ledger.path().join("client.toml"),
        query: Query {
            attempts: 3,
            interval: Duration::from_millis(10),
        },
    };
    Ok((IrohaCli::new(config), Some(ledger)))
}
