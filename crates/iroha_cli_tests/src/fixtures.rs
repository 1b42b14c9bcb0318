//! `GIVEN` fixtures: fresh ledger state for a single scenario.
//!
//! Every fixture uses newly generated names, so scenarios can run in parallel
//! against the same network without stepping on each other.

use core::fmt;

use rand::Rng;
use tracing::info;

use crate::{
    cli::{self, IrohaCli},
    consts::{NAME_ALPHABET, NAME_LENGTH},
    have::{self, Error},
    iroha::Iroha,
    model::{AssetDefinitionId, ParseError},
};

/// A domain registered by [`registered_domain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredDomain {
    /// Name of the domain
    pub name: String,
}

/// An asset definition registered by [`registered_asset_definition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAssetDefinition {
    /// Name part of the id
    pub name: String,
    /// Domain part of the id
    pub domain: String,
}

impl RegisteredAssetDefinition {
    /// Typed id of the definition.
    ///
    /// # Errors
    /// If a part is not a valid name.
    pub fn id(&self) -> Result<AssetDefinitionId, ParseError> {
        self.to_string().parse()
    }
}

impl fmt::Display for RegisteredAssetDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.domain)
    }
}

fn fake_name() -> String {
    let mut rng = rand::thread_rng();
    (0..NAME_LENGTH)
        .map(|_| char::from(NAME_ALPHABET[rng.gen_range(0..NAME_ALPHABET.len())]))
        .collect()
}

/// A fresh name for an asset definition.
pub fn fake_asset_name() -> String {
    fake_name()
}

/// A name no domain is registered under.
///
/// # Errors
/// If the registered domains cannot be queried.
pub fn not_existing_name(cli: &IrohaCli) -> Result<String, cli::Error> {
    let domains = Iroha::new(cli).domains()?;
    loop {
        let name = fake_name();
        if domains.iter().all(|domain| domain.id.name.as_str() != name) {
            return Ok(name);
        }
    }
}

/// Register a fresh domain and wait until the ledger shows it.
///
/// # Errors
/// - the CLI cannot be run
/// - registration fails
/// - the domain does not appear in time
pub fn registered_domain(cli: &mut IrohaCli) -> Result<RegisteredDomain, Error> {
    let name = fake_name();
    cli.register().domain(&name)?;
    cli.should(have::success())?;
    Iroha::new(cli).should(have::domain(name.as_str()))?;

    info!(domain = %name, "GIVEN registered domain");
    Ok(RegisteredDomain { name })
}

/// Register a fresh asset definition in a fresh domain and wait until the
/// ledger shows it.
///
/// # Errors
/// - the CLI cannot be run
/// - registration fails
/// - the definition does not appear in time
pub fn registered_asset_definition(
    cli: &mut IrohaCli,
) -> Result<RegisteredAssetDefinition, Error> {
    let RegisteredDomain { name: domain } = registered_domain(cli)?;
    let definition = RegisteredAssetDefinition {
        name: fake_asset_name(),
        domain,
    };
    cli.register()
        .asset_definition(&definition.name, &definition.domain)?;
    cli.should(have::success())?;
    Iroha::new(cli).should(have::asset_definition(definition.id()?))?;

    info!(asset_definition = %definition, "GIVEN registered asset definition");
    Ok(definition)
}
