//! User configuration view.
//!
//! Every field is optional here: values come from the TOML file, are then
//! overridden by the environment and finally completed with defaults in
//! [`Root::parse`].

use std::{borrow::Cow, path::PathBuf, time::Duration};

use serde::Deserialize;

use super::{env::ReadEnv, Error};

/// Root of the user configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct Root {
    pub client_config: Option<PathBuf>,
    #[serde(default)]
    pub cli: Cli,
    #[serde(default)]
    pub query: Query,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct Cli {
    pub program: Option<PathBuf>,
    pub prefix_args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
#[allow(missing_docs)]
pub struct Query {
    pub attempts: Option<u32>,
    pub interval_ms: Option<u64>,
}

impl Root {
    /// Override the values present in the environment.
    ///
    /// # Errors
    /// If a numeric variable cannot be parsed.
    pub fn merge_env(&mut self, env: &impl ReadEnv) -> Result<(), Error> {
        if let Some(program) = env.read_env(super::ENV_BINARY) {
            self.cli.program = Some(PathBuf::from(program.as_ref()));
        }
        if let Some(args) = env.read_env(super::ENV_PREFIX_ARGS) {
            self.cli.prefix_args = Some(args.split_whitespace().map(ToOwned::to_owned).collect());
        }
        if let Some(path) = env.read_env(super::ENV_CLIENT_CONFIG) {
            self.client_config = Some(PathBuf::from(path.as_ref()));
        }
        if let Some(attempts) = env.read_env(super::ENV_QUERY_ATTEMPTS) {
            self.query.attempts = Some(parse_env(super::ENV_QUERY_ATTEMPTS, attempts)?);
        }
        if let Some(interval) = env.read_env(super::ENV_QUERY_INTERVAL_MS) {
            self.query.interval_ms = Some(parse_env(super::ENV_QUERY_INTERVAL_MS, interval)?);
        }
        Ok(())
    }

    /// Validates user configuration for semantic errors and constructs a complete
    /// [`super::Config`].
    ///
    /// # Errors
    /// If the number of query attempts is zero.
    pub fn parse(self) -> Result<super::Config, Error> {
        let Self {
            client_config,
            cli: Cli {
                program,
                prefix_args,
            },
            query: Query {
                attempts,
                interval_ms,
            },
        } = self;

        let attempts = attempts.unwrap_or(super::DEFAULT_QUERY_ATTEMPTS);
        if attempts == 0 {
            return Err(Error::ZeroAttempts);
        }

        Ok(super::Config {
            cli: super::Cli {
                program: program.unwrap_or_else(|| PathBuf::from(super::DEFAULT_BINARY)),
                prefix_args: prefix_args.unwrap_or_default(),
            },
            client_config: client_config
                .unwrap_or_else(|| PathBuf::from(super::DEFAULT_CLIENT_CONFIG)),
            query: super::Query {
                attempts,
                interval: interval_ms
                    .map_or(super::DEFAULT_QUERY_INTERVAL, Duration::from_millis),
            },
        })
    }
}

fn parse_env<T: core::str::FromStr>(key: &'static str, value: Cow<'_, str>) -> Result<T, Error> {
    value.parse().map_err(|_| Error::Env {
        key,
        value: value.into_owned(),
    })
}
