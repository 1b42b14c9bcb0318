//! Identifiers and ledger rows as the harness sees them.
//!
//! The harness never talks to a peer directly; it reads what the CLI prints.
//! These types validate names the same way the ledger does so that expected
//! ids in assertions cannot silently be malformed.

use core::{fmt, str::FromStr};

use derive_more::Display;
use serde::{Deserialize, Deserializer};
use strum::{AsRefStr, EnumIter, EnumString};

/// Error which occurs when parsing a string into an identifier.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[display(fmt = "{reason}")]
pub struct ParseError {
    /// Why the candidate was rejected
    pub reason: &'static str,
}

/// Name of a ledger entity such as a domain or an asset definition.
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Name(String);

impl Name {
    /// Check if `candidate` string would be a valid [`Name`].
    fn validate_str(candidate: &str) -> Result<(), ParseError> {
        const FORBIDDEN_CHARS: [char; 3] = ['@', '#', '$'];

        if candidate.is_empty() {
            return Err(ParseError {
                reason: "Empty `Name`",
            });
        }
        if candidate.chars().any(char::is_whitespace) {
            return Err(ParseError {
                reason: "White space not allowed in `Name` constructs",
            });
        }
        if candidate.chars().any(|ch| FORBIDDEN_CHARS.contains(&ch)) {
            return Err(ParseError {
                reason: "The `@` character is reserved for `account@domain` constructs, \
                        `#` for `asset#domain` and `$` for `trigger$domain`",
            });
        }
        Ok(())
    }

    /// View the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Name {
    type Err = ParseError;

    fn from_str(candidate: &str) -> Result<Self, Self::Err> {
        Self::validate_str(candidate)?;
        Ok(Self(candidate.to_owned()))
    }
}

impl TryFrom<String> for Name {
    type Error = ParseError;

    fn try_from(candidate: String) -> Result<Self, Self::Error> {
        Self::validate_str(&candidate)?;
        Ok(Self(candidate))
    }
}

/// Identification of a domain.
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct DomainId {
    /// Name of the domain
    pub name: Name,
}

impl DomainId {
    /// Construct [`DomainId`] from an already validated [`Name`].
    pub fn new(name: Name) -> Self {
        Self { name }
    }
}

impl FromStr for DomainId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::new)
    }
}

/// Identification of an asset definition, rendered as `name#domain`.
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[display(fmt = "{name}#{domain}")]
#[serde(try_from = "String")]
pub struct AssetDefinitionId {
    /// Domain the definition belongs to
    pub domain: DomainId,
    /// Name of the definition, unique within its domain
    pub name: Name,
}

impl AssetDefinitionId {
    /// Construct [`AssetDefinitionId`] from its parts.
    pub fn new(domain: DomainId, name: Name) -> Self {
        Self { domain, name }
    }
}

impl FromStr for AssetDefinitionId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('#') {
            None => Err(ParseError {
                reason: "Asset Definition ID should have format `name#domain`",
            }),
            Some(("", _)) => Err(ParseError {
                reason: "Empty `name` part in `name#domain`",
            }),
            Some((_, "")) => Err(ParseError {
                reason: "Empty `domain` part in `name#domain`",
            }),
            Some((name_candidate, domain_id_candidate)) => {
                let name = name_candidate.parse().map_err(|_| ParseError {
                    reason: "Failed to parse `name` part in `name#domain`",
                })?;
                let domain_id = domain_id_candidate.parse().map_err(|_| ParseError {
                    reason: "Failed to parse `domain` part in `name#domain`",
                })?;
                Ok(Self::new(domain_id, name))
            }
        }
    }
}

impl TryFrom<String> for AssetDefinitionId {
    type Error = ParseError;

    fn try_from(candidate: String) -> Result<Self, Self::Error> {
        candidate.parse()
    }
}

/// Type of the value an asset of some definition holds.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter,
)]
pub enum AssetType {
    /// Numeric quantity, the CLI's default
    #[default]
    Numeric,
    /// Key-value store
    Store,
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl AssetType {
    /// Read the type from the CLI's JSON, which renders it either as a bare
    /// variant name (`"Store"`) or as a single-key object (`{"Numeric": {..}}`).
    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(variant) => variant.parse().ok(),
            serde_json::Value::Object(map) if map.len() == 1 => {
                map.keys().next().and_then(|variant| variant.parse().ok())
            }
            _ => None,
        }
    }
}

fn deserialize_asset_type<'de, D>(deserializer: D) -> Result<Option<AssetType>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(AssetType::from_json))
}

/// Domain row from `iroha domain list all`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Domain {
    /// Identification of the domain
    pub id: DomainId,
}

/// Asset definition row from `iroha asset definition list all`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetDefinition {
    /// Identification of the definition
    pub id: AssetDefinitionId,
    /// Value type, when the CLI reports one the harness understands
    #[serde(rename = "type", default, deserialize_with = "deserialize_asset_type")]
    pub type_: Option<AssetType>,
}
