//! Harness configuration: which CLI to run, with which client config, and how
//! patiently to wait for the ledger.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Serialize;

pub mod env;
mod user;

pub use user::Root as UserConfig;

use self::env::{std_env, ReadEnv};

/// Path to an optional TOML file with the harness configuration.
pub const ENV_CONFIG: &str = "IROHA_CLI_TESTS_CONFIG";
/// CLI program to run.
pub const ENV_BINARY: &str = "IROHA_CLI_BINARY";
/// Whitespace-separated arguments placed before every CLI invocation.
pub const ENV_PREFIX_ARGS: &str = "IROHA_CLI_PREFIX_ARGS";
/// Client configuration passed to the CLI with `--config`.
pub const ENV_CLIENT_CONFIG: &str = "IROHA_CLI_CONFIG";
/// How many times a ledger expectation is checked before giving up.
pub const ENV_QUERY_ATTEMPTS: &str = "IROHA_CLI_QUERY_ATTEMPTS";
/// Pause between two checks of a ledger expectation, in milliseconds.
pub const ENV_QUERY_INTERVAL_MS: &str = "IROHA_CLI_QUERY_INTERVAL_MS";

#[allow(missing_docs)]
pub const DEFAULT_BINARY: &str = "iroha";
#[allow(missing_docs)]
pub const DEFAULT_CLIENT_CONFIG: &str = "client.toml";
#[allow(missing_docs)]
pub const DEFAULT_QUERY_ATTEMPTS: u32 = 10;
#[allow(missing_docs)]
pub const DEFAULT_QUERY_INTERVAL: Duration = Duration::from_millis(500);

/// Complete harness configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct Config {
    pub cli: Cli,
    pub client_config: PathBuf,
    pub query: Query,
}

/// How the CLI is launched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cli {
    /// Program to execute
    pub program: PathBuf,
    /// Arguments placed before `--config` on every invocation
    pub prefix_args: Vec<String>,
}

/// Polling of ledger expectations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Query {
    /// Number of checks, at least one
    pub attempts: u32,
    /// Pause between two checks
    pub interval: Duration,
}

/// An error type for configuration loading
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to read configuration file `{}`", path.display())]
    #[allow(missing_docs)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Error while deserializing file `{}` contents as TOML", path.display())]
    #[allow(missing_docs)]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
    /// An environment variable holds a value of the wrong type
    #[error("Environment variable `{key}` has an invalid value: `{value}`")]
    #[allow(missing_docs)]
    Env { key: &'static str, value: String },
    /// A ledger expectation must be checked at least once
    #[error("Number of query attempts should be greater than zero")]
    ZeroAttempts,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// If `IROHA_CLI_TESTS_CONFIG` is set, the file it points to is read first
    /// and the remaining variables override its values.
    ///
    /// # Errors
    /// - unable to read or parse the configuration file
    /// - the configuration is invalid
    pub fn from_env() -> Result<Self, Error> {
        Self::read(&std_env)
    }

    /// Loads configuration from a TOML file, overridden by the process
    /// environment.
    ///
    /// # Errors
    /// - unable to read or parse the configuration file
    /// - the configuration is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let mut user = Self::read_file(path.as_ref())?;
        user.merge_env(&std_env)?;
        user.parse()
    }

    /// Loads configuration from the given environment.
    ///
    /// # Errors
    /// - unable to read or parse the configuration file
    /// - the configuration is invalid
    pub fn read(env: &impl ReadEnv) -> Result<Self, Error> {
        let mut user = match env.read_env(ENV_CONFIG) {
            Some(path) => Self::read_file(Path::new(path.as_ref()))?,
            None => UserConfig::default(),
        };
        user.merge_env(env)?;
        user.parse()
    }

    fn read_file(path: &Path) -> Result<UserConfig, Error> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assertables::{assert_contains, assert_contains_as_result};

    use super::{env::MockEnv, *};

    fn config_sample() -> &'static str {
        r#"
            client_config = "/opt/iroha/client.toml"

            [cli]
            program = "/opt/iroha/bin/iroha"
            prefix_args = ["--verbose-wrapper"]

            [query]
            attempts = 4
            interval_ms = 250
        "#
    }

    fn sample_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config_sample().as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_any_source() {
        let config = Config::read(&MockEnv::default()).expect("defaults are complete");

        assert_eq!(config.cli.program, PathBuf::from("iroha"));
        assert!(config.cli.prefix_args.is_empty());
        assert_eq!(config.client_config, PathBuf::from("client.toml"));
        assert_eq!(config.query.attempts, DEFAULT_QUERY_ATTEMPTS);
        assert_eq!(config.query.interval, DEFAULT_QUERY_INTERVAL);
    }

    #[test]
    fn parse_full_toml_config() {
        let file = sample_file();
        let env = MockEnv::from([(ENV_CONFIG, file.path().to_str().unwrap())]);

        let config = Config::read(&env).expect("sample is valid");

        assert_eq!(config.cli.program, PathBuf::from("/opt/iroha/bin/iroha"));
        assert_eq!(config.cli.prefix_args, vec!["--verbose-wrapper".to_owned()]);
        assert_eq!(config.client_config, PathBuf::from("/opt/iroha/client.toml"));
        assert_eq!(config.query.attempts, 4);
        assert_eq!(config.query.interval, Duration::from_millis(250));
    }

    #[test]
    fn env_overrides_file() {
        let file = sample_file();
        let env = MockEnv::from([
            (ENV_CONFIG, file.path().to_str().unwrap()),
            (ENV_BINARY, "sh"),
            (ENV_PREFIX_ARGS, "fake_cli/iroha.sh"),
            (ENV_QUERY_ATTEMPTS, "1"),
        ]);

        let config = Config::read(&env).expect("valid");

        assert_eq!(config.cli.program, PathBuf::from("sh"));
        assert_eq!(config.cli.prefix_args, vec!["fake_cli/iroha.sh".to_owned()]);
        assert_eq!(config.query.attempts, 1);
        assert_eq!(config.query.interval, Duration::from_millis(250));
    }

    #[test]
    fn invalid_toml_file_is_handled_properly() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a valid toml").unwrap();

        let err = Config::load(file.path()).expect_err("should fail on toml parsing");

        assert_contains!(
            format!("{err}"),
            "Error while deserializing file"
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[cli]\nbinary = \"iroha\"\n").unwrap();

        let err = Config::load(file.path()).expect_err("`binary` is not a known field");

        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let env = MockEnv::from([(ENV_CONFIG, "/definitely/not/here.toml")]);

        let err = Config::read(&env).expect_err("file does not exist");

        assert!(matches!(err, Error::Read { .. }));
    }
}
