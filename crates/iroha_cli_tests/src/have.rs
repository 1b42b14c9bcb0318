//! "Should have" matchers.
//!
//! ```no_run
//! # use iroha_cli_tests::{have, Config, Iroha, IrohaCli, Stderr};
//! # fn main() -> eyre::Result<()> {
//! # let mut iroha_cli = IrohaCli::new(Config::from_env()?);
//! iroha_cli.register().asset_definition("rose", "wonderland")?;
//! iroha_cli.should(have::error(Stderr::Repetition))?;
//! Iroha::new(&iroha_cli).should(have::asset_definition("rose#wonderland".parse()?))?;
//! # Ok(())
//! # }
//! ```

use std::fmt;

use predicates::{prelude::*, str::ContainsPredicate};

use crate::{
    cli::{self, Outcome},
    consts::Stderr,
    iroha::Iroha,
    model::{AssetDefinitionId, AssetType, ParseError},
};

/// Something that can be checked against a subject: the outcome of a CLI
/// command or the state of the ledger.
pub trait Expectation<S: ?Sized> {
    /// Check the subject.
    ///
    /// # Errors
    /// If the expectation is not met, or the subject cannot be inspected.
    fn check(&self, subject: &S) -> Result<(), Error>;
}

/// Why an expectation failed.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The subject does not satisfy the expectation
    #[error("Expected {expected}, but {actual}")]
    Mismatch {
        #[allow(missing_docs)]
        expected: String,
        #[allow(missing_docs)]
        actual: String,
    },
    /// Assertion on the CLI's output before it was run
    #[error("Expected an outcome of the CLI, but no command was run yet")]
    NoOutcome,
    /// The ledger could not be queried
    #[error(transparent)]
    Cli(#[from] cli::Error),
    /// The expected id is not a valid identifier
    #[error("Expected id is malformed")]
    Id(#[from] ParseError),
}

impl Error {
    fn mismatch(expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Self::Mismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Fragment an error message is matched against.
pub trait ErrorMessage {
    /// The fragment itself
    fn fragment(&self) -> &str;
}

impl ErrorMessage for Stderr {
    fn fragment(&self) -> &str {
        self.value()
    }
}

impl ErrorMessage for &str {
    fn fragment(&self) -> &str {
        self
    }
}

impl ErrorMessage for String {
    fn fragment(&self) -> &str {
        self
    }
}

/// The CLI's standard error contains `message`.
pub fn error(message: impl ErrorMessage) -> HasError {
    HasError {
        fragment: message.fragment().to_owned(),
    }
}

/// The CLI command succeeded.
pub fn success() -> Succeeded {
    Succeeded
}

/// The ledger contains the asset definition `id`.
pub fn asset_definition(id: AssetDefinitionId) -> HasAssetDefinition {
    HasAssetDefinition {
        id,
        type_: None,
    }
}

/// The ledger contains the domain `name`.
pub fn domain(name: impl Into<String>) -> HasDomain {
    HasDomain { name: name.into() }
}

/// See [`error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasError {
    fragment: String,
}

impl HasError {
    fn predicate(&self) -> ContainsPredicate {
        predicate::str::contains(self.fragment.as_str())
    }
}

impl Expectation<Outcome> for HasError {
    fn check(&self, outcome: &Outcome) -> Result<(), Error> {
        if self.predicate().eval(&outcome.stderr) {
            return Ok(());
        }
        Err(Error::mismatch(
            format_args!("the CLI to report an error containing `{}`", self.fragment),
            outcome,
        ))
    }
}

/// See [`success`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Succeeded;

impl Expectation<Outcome> for Succeeded {
    fn check(&self, outcome: &Outcome) -> Result<(), Error> {
        if outcome.success() {
            return Ok(());
        }
        Err(Error::mismatch("the CLI to succeed", outcome))
    }
}

/// See [`asset_definition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasAssetDefinition {
    id: AssetDefinitionId,
    type_: Option<AssetType>,
}

impl HasAssetDefinition {
    /// Also require the definition to hold values of `type_`.
    #[must_use]
    pub fn of_type(mut self, type_: AssetType) -> Self {
        self.type_ = Some(type_);
        self
    }
}

impl fmt::Display for HasAssetDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the asset definition `{}`", self.id)?;
        if let Some(type_) = self.type_ {
            write!(f, " of type `{type_}`")?;
        }
        Ok(())
    }
}

impl Expectation<Iroha<'_>> for HasAssetDefinition {
    fn check(&self, iroha: &Iroha<'_>) -> Result<(), Error> {
        let definitions = iroha.asset_definitions()?;
        let Some(found) = definitions
            .iter()
            .find(|definition| definition.id == self.id)
        else {
            return Err(Error::mismatch(
                self,
                format_args!(
                    "it is not among {} registered asset definitions",
                    definitions.len()
                ),
            ));
        };
        match (self.type_, found.type_) {
            (None, _) => Ok(()),
            (Some(expected), Some(actual)) if expected == actual => Ok(()),
            (Some(_), Some(actual)) => Err(Error::mismatch(
                self,
                format_args!("it holds `{actual}` values"),
            )),
            (Some(_), None) => Err(Error::mismatch(
                self,
                "the CLI did not report its type",
            )),
        }
    }
}

/// See [`domain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasDomain {
    name: String,
}

impl Expectation<Iroha<'_>> for HasDomain {
    fn check(&self, iroha: &Iroha<'_>) -> Result<(), Error> {
        let domains = iroha.domains()?;
        if domains
            .iter()
            .any(|domain| domain.id.name.as_str() == self.name)
        {
            return Ok(());
        }
        Err(Error::mismatch(
            format_args!("the domain `{}`", self.name),
            format_args!("it is not among {} registered domains", domains.len()),
        ))
    }
}
