//! End-to-end acceptance harness for the Iroha CLI client.
//!
//! The harness drives the external `iroha` binary as a child process and
//! checks its behaviour through a fluent "should have" API:
//!
//! ```no_run
//! use eyre::Result;
//! use iroha_cli_tests::{given, have, Config, Iroha, IrohaCli};
//!
//! fn main() -> Result<()> {
//!     let mut iroha_cli = IrohaCli::new(Config::from_env()?);
//!     let domain = given::registered_domain(&mut iroha_cli)?;
//!     let asset = given::fake_asset_name();
//!
//!     iroha_cli.register().asset_definition(&asset, &domain.name)?;
//!
//!     let id = format!("{asset}#{}", domain.name).parse()?;
//!     Iroha::new(&iroha_cli).should(have::asset_definition(id))?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod consts;
pub mod fixtures;
pub mod have;
pub mod iroha;
pub mod logger;
pub mod model;
pub mod report;

pub use cli::{IrohaCli, Outcome};
pub use config::Config;
pub use consts::Stderr;
pub use fixtures as given;
pub use iroha::Iroha;

/// The prelude re-exports the types a scenario usually needs.
pub mod prelude {
    pub use super::{
        cli::{IrohaCli, Outcome},
        config::Config,
        consts::Stderr,
        fixtures as given, have,
        iroha::Iroha,
        model::{AssetDefinitionId, AssetType, DomainId, Name},
        report,
    };
}
