//! View of the ledger through the CLI's queries.

use std::thread;

use tracing::{debug, info};

use crate::{
    cli::{self, IrohaCli},
    config::Query,
    have::{self, Expectation},
    model::{AssetDefinition, Domain},
};

/// The ledger as seen by the CLI under test.
///
/// Registration becomes visible only once a block is committed, so
/// [`Iroha::should`] polls instead of checking once.
#[derive(Debug, Clone, Copy)]
pub struct Iroha<'cli> {
    cli: &'cli IrohaCli,
}

impl<'cli> Iroha<'cli> {
    /// Construct the view on top of a CLI handle.
    pub fn new(cli: &'cli IrohaCli) -> Self {
        Self { cli }
    }

    /// All registered domains.
    ///
    /// # Errors
    /// If the query fails.
    pub fn domains(&self) -> Result<Vec<Domain>, cli::Error> {
        self.cli.list_all().domains()
    }

    /// All registered asset definitions.
    ///
    /// # Errors
    /// If the query fails.
    pub fn asset_definitions(&self) -> Result<Vec<AssetDefinition>, cli::Error> {
        self.cli.list_all().asset_definitions()
    }

    /// Wait until the ledger meets the expectation.
    ///
    /// The expectation is checked up to `query.attempts` times with
    /// `query.interval` in between. Failed queries are retried as well.
    ///
    /// # Errors
    /// The failure of the last attempt.
    pub fn should(&self, expectation: impl Expectation<Self>) -> Result<(), have::Error> {
        let Query { attempts, interval } = self.cli.config().query;

        let mut attempt = 1;
        loop {
            match expectation.check(self) {
                Ok(()) => {
                    info!(attempt, "Ledger expectation met");
                    return Ok(());
                }
                Err(error) if attempt >= attempts => return Err(error),
                Err(error) => {
                    debug!(attempt, attempts, %error, "Ledger expectation not met yet");
                    thread::sleep(interval);
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, time::Duration};

    use super::*;
    use crate::{
        config::{Cli, Config},
        model::AssetDefinitionId,
    };

    /// CLI whose `list` commands print the definitions from `rows`, one
    /// more of them on each call, counted in a file inside `dir`.
    fn rose() -> AssetDefinitionId {
        "rose#wonderland".parse().expect("valid id")
    }

    fn growing_ledger(dir: &std::path::Path, attempts: u32) -> IrohaCli {
        let counter = dir.join("calls");
        let script = format!(
            r#"n=$(cat '{counter}' 2>/dev/null || echo 0); n=$((n + 1)); echo "$n" > '{counter}'
               if [ "$n" -ge 3 ]; then echo '[{{"id": "rose#wonderland"}}]'; else echo '[]'; fi"#,
            counter = counter.display()
        );
        IrohaCli::new(Config {
            cli: Cli {
                program: PathBuf::from("sh"),
                prefix_args: vec!["-c".to_owned(), script],
            },
            client_config: PathBuf::from("client.toml"),
            query: Query {
                attempts,
                interval: Duration::from_millis(1),
            },
        })
    }

    #[test]
    fn should_poll_until_expectation_is_met() {
        let dir = tempfile::tempdir().unwrap();
        let cli = growing_ledger(dir.path(), 5);

        Iroha::new(&cli)
            .should(have::asset_definition(rose()))
            .expect("appears on the third attempt");
    }

    #[test]
    fn should_give_up_after_configured_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let cli = growing_ledger(dir.path(), 2);

        let err = Iroha::new(&cli)
            .should(have::asset_definition(rose()))
            .expect_err("only two attempts are made");

        assert!(matches!(err, have::Error::Mismatch { .. }));
    }
}
