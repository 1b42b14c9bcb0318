//! Constants shared by the scenarios.

use strum::{AsRefStr, EnumIter, IntoStaticStr};

/// Fragments of the CLI's standard error the scenarios look for.
///
/// The exact wording is owned by the CLI, so each value is only a substring
/// that is stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr, EnumIter)]
pub enum Stderr {
    /// An entity with the same id is already registered
    #[strum(serialize = "Repetition")]
    Repetition,
    /// Empty name part of an id
    #[strum(serialize = "Empty")]
    Empty,
    /// The domain referenced by an id is not registered
    #[strum(serialize = "Failed to find domain")]
    FailedToFindDomain,
    /// A part of an id is not a valid name: white space or a reserved character
    #[strum(serialize = "Failed to parse")]
    InvalidCharacter,
}

impl Stderr {
    /// The fragment to look for in the CLI's standard error.
    pub fn value(self) -> &'static str {
        self.into()
    }
}

/// Characters fixture names are generated from.
///
/// Lowercase ASCII only, so a generated name is always a valid ledger name.
pub const NAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Length of generated fixture names.
pub const NAME_LENGTH: usize = 12;

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn values_are_distinct_and_not_empty() {
        let values: Vec<_> = Stderr::iter().map(Stderr::value).collect();
        for (i, value) in values.iter().enumerate() {
            assert!(!value.is_empty());
            assert!(!values[i + 1..].contains(value), "`{value}` is repeated");
        }
    }

    #[test]
    fn scenario_values_match_cli_wording() {
        assert_eq!(Stderr::Repetition.value(), "Repetition");
        assert_eq!(Stderr::Empty.value(), "Empty");
        assert_eq!(Stderr::FailedToFindDomain.value(), "Failed to find domain");
    }
}
