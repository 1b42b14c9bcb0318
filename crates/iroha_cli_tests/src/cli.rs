//! Driving the `iroha` CLI as a child process.
//!
//! The builder methods mirror the CLI's command tree, so
//! `iroha_cli.register().asset_definition("rose", "wonderland")` runs
//! `iroha --config client.toml asset definition register --id rose#wonderland --type Numeric`.

use std::{
    fmt::{self, Write as _},
    process::{Command, ExitStatus},
};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{
    config::Config,
    have::{self, Expectation},
    model::{AssetDefinition, AssetType, Domain},
};

/// Recorded result of one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Rendered command line, for messages
    pub command: String,
    /// Exit status of the process
    pub status: ExitStatus,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl Outcome {
    /// Whether the CLI exited successfully.
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` exited with {}", self.command, self.status)?;
        if !self.stderr.trim().is_empty() {
            write!(f, ", stderr: {}", self.stderr.trim())?;
        }
        Ok(())
    }
}

/// Failures of the harness itself, as opposed to the CLI rejecting a command.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The program could not be started at all
    #[error("Failed to spawn `{command}`")]
    Spawn {
        #[allow(missing_docs)]
        command: String,
        #[source]
        #[allow(missing_docs)]
        source: std::io::Error,
    },
    /// A query command, which is expected to always succeed, failed
    #[error("Query failed: {0}")]
    Query(Box<Outcome>),
    /// A query printed something that is not the expected JSON
    #[error("Failed to parse output of `{command}` as JSON")]
    Parse {
        #[allow(missing_docs)]
        command: String,
        #[source]
        #[allow(missing_docs)]
        source: serde_json::Error,
    },
}

/// Handle on the CLI under test.
///
/// Keeps the outcome of the last *register* command so that assertions on the
/// CLI's output can be made after the fact with [`IrohaCli::should`]. Queries
/// do not replace it.
#[derive(Debug)]
pub struct IrohaCli {
    config: Config,
    last_outcome: Option<Outcome>,
}

impl IrohaCli {
    /// Construct [`IrohaCli`] from a complete configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            last_outcome: None,
        }
    }

    /// Configuration the CLI is run with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Outcome of the last register command, if any was run.
    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    /// Start a `register` command.
    pub fn register(&mut self) -> Register<'_> {
        Register { cli: self }
    }

    /// Start a `list all` query.
    pub fn list_all(&self) -> ListAll<'_> {
        ListAll { cli: self }
    }

    /// Check an expectation against the outcome of the last register command.
    ///
    /// # Errors
    /// - no register command was run yet
    /// - the expectation is not met
    pub fn should(&self, expectation: impl Expectation<Outcome>) -> Result<(), have::Error> {
        let outcome = self.last_outcome.as_ref().ok_or(have::Error::NoOutcome)?;
        expectation.check(outcome)
    }

    /// Run the CLI with `args` after the configured prefix and `--config`.
    ///
    /// A non-zero exit status is not an error here; it is part of the outcome.
    ///
    /// # Errors
    /// If the process cannot be spawned.
    pub fn execute(&self, args: &[&str]) -> Result<Outcome, Error> {
        let mut command = Command::new(&self.config.cli.program);
        command
            .args(&self.config.cli.prefix_args)
            .arg("--config")
            .arg(&self.config.client_config)
            .args(args);
        let rendered = render(&command);

        debug!(command = %rendered, "Running the CLI");
        let output = command.output().map_err(|source| Error::Spawn {
            command: rendered.clone(),
            source,
        })?;

        let outcome = Outcome {
            command: rendered,
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            status = %outcome.status,
            stdout = %outcome.stdout.trim(),
            stderr = %outcome.stderr.trim(),
            "CLI finished"
        );
        Ok(outcome)
    }

    fn record(&mut self, outcome: Outcome) {
        info!(%outcome, "Recorded CLI outcome");
        self.last_outcome = Some(outcome);
    }

    fn query<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, Error> {
        let outcome = self.execute(args)?;
        if !outcome.success() {
            return Err(Error::Query(Box::new(outcome)));
        }
        serde_json::from_str(&outcome.stdout).map_err(|source| Error::Parse {
            command: outcome.command,
            source,
        })
    }
}

/// Render a command the way it would be typed in a shell, quoting arguments
/// that are empty or contain white space.
fn render(command: &Command) -> String {
    let mut rendered = command.get_program().to_string_lossy().into_owned();
    for arg in command.get_args() {
        let arg = arg.to_string_lossy();
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            let _ = write!(rendered, " '{arg}'");
        } else {
            let _ = write!(rendered, " {arg}");
        }
    }
    rendered
}

/// `iroha … register` commands.
#[derive(Debug)]
pub struct Register<'cli> {
    cli: &'cli mut IrohaCli,
}

impl Register<'_> {
    /// `domain register --id <name>`
    ///
    /// # Errors
    /// If the process cannot be spawned.
    pub fn domain(self, name: &str) -> Result<(), Error> {
        self.run(&["domain", "register", "--id", name])
    }

    /// `asset definition register --id <asset>#<domain> --type Numeric`
    ///
    /// Both parts are passed through as given, so malformed ids reach the CLI.
    ///
    /// # Errors
    /// If the process cannot be spawned.
    pub fn asset_definition(self, asset: &str, domain: &str) -> Result<(), Error> {
        self.asset_definition_with_type(asset, domain, AssetType::default())
    }

    /// `asset definition register --id <asset>#<domain> --type <type_>`
    ///
    /// # Errors
    /// If the process cannot be spawned.
    pub fn asset_definition_with_type(
        self,
        asset: &str,
        domain: &str,
        type_: AssetType,
    ) -> Result<(), Error> {
        let id = format!("{asset}#{domain}");
        self.run(&[
            "asset",
            "definition",
            "register",
            "--id",
            &id,
            "--type",
            type_.as_ref(),
        ])
    }

    fn run(self, args: &[&str]) -> Result<(), Error> {
        let outcome = self.cli.execute(args)?;
        self.cli.record(outcome);
        Ok(())
    }
}

/// `iroha … list all` queries.
#[derive(Debug, Clone, Copy)]
pub struct ListAll<'cli> {
    cli: &'cli IrohaCli,
}

impl ListAll<'_> {
    /// `domain list all`
    ///
    /// # Errors
    /// - the process cannot be spawned
    /// - the CLI fails
    /// - the output is not a JSON list of domains
    pub fn domains(self) -> Result<Vec<Domain>, Error> {
        self.cli.query(&["domain", "list", "all"])
    }

    /// `asset definition list all`
    ///
    /// # Errors
    /// - the process cannot be spawned
    /// - the CLI fails
    /// - the output is not a JSON list of asset definitions
    pub fn asset_definitions(self) -> Result<Vec<AssetDefinition>, Error> {
        self.cli.query(&["asset", "definition", "list", "all"])
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use assertables::{assert_contains, assert_contains_as_result};

    use super::*;
    use crate::config::{Cli, Query};

    /// CLI that runs `sh -c <script>`, with the harness arguments landing in
    /// `$0`, `$1`, ….
    fn shell_cli(script: &str) -> IrohaCli {
        IrohaCli::new(Config {
            cli: Cli {
                program: PathBuf::from("sh"),
                prefix_args: vec!["-c".to_owned(), script.to_owned()],
            },
            client_config: PathBuf::from("client.toml"),
            query: Query {
                attempts: 1,
                interval: std::time::Duration::ZERO,
            },
        })
    }

    #[test]
    fn command_line_is_built_from_config_and_arguments() {
        let mut cli = shell_cli(r#"echo "$@"; echo "$0" >&2"#);

        cli.register()
            .asset_definition("rose", "wonderland")
            .expect("sh is available");
        let outcome = cli.last_outcome().expect("recorded");

        assert!(outcome.success());
        assert_eq!(outcome.stderr.trim(), "--config");
        assert_eq!(
            outcome.stdout.trim(),
            "client.toml asset definition register --id rose#wonderland --type Numeric"
        );
    }

    #[test]
    fn empty_argument_is_quoted_in_rendered_command() {
        let mut cli = shell_cli("exit 0");

        cli.register().domain("").expect("sh is available");

        assert_contains!(cli.last_outcome().expect("recorded").command, "--id ''");
    }

    #[test]
    fn failed_register_is_recorded_not_raised() {
        let mut cli = shell_cli("echo 'Repetition' >&2; exit 1");

        cli.register()
            .domain("wonderland")
            .expect("a failing CLI is not a harness error");

        let outcome = cli.last_outcome().expect("recorded");
        assert!(!outcome.success());
        assert_eq!(outcome.stderr.trim(), "Repetition");
    }

    #[test]
    fn failed_query_is_an_error() {
        let cli = shell_cli("echo 'connection refused' >&2; exit 1");

        let err = cli.list_all().domains().expect_err("query failed");

        assert!(matches!(err, Error::Query(ref outcome) if outcome.stderr.contains("refused")));
    }

    #[test]
    fn unparsable_query_output_is_an_error() {
        let cli = shell_cli("echo 'not json'");

        let err = cli
            .list_all()
            .asset_definitions()
            .expect_err("output is not json");

        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let cli = IrohaCli::new(Config {
            cli: Cli {
                program: PathBuf::from("/definitely/not/an/iroha/binary"),
                prefix_args: Vec::new(),
            },
            ..shell_cli("").config().clone()
        });

        let err = cli.execute(&["domain", "list", "all"]).expect_err("no such file");

        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[test]
    fn queries_do_not_replace_last_outcome() {
        let mut cli = shell_cli(r#"case "$3" in register) exit 1 ;; *) echo '[]' ;; esac"#);

        cli.register().domain("wonderland").expect("sh is available");
        let domains = cli.list_all().domains().expect("empty list");

        assert!(domains.is_empty());
        assert!(!cli.last_outcome().expect("recorded").success());
    }
}
