//! Reading configuration from environment variables.

use std::borrow::Cow;

/// Source of environment variables.
pub trait ReadEnv {
    /// Read the value of `key`, if it is set.
    fn read_env(&self, key: &str) -> Option<Cow<'_, str>>;
}

impl<F> ReadEnv for F
where
    F: Fn(&str) -> Option<Cow<'static, str>>,
{
    fn read_env(&self, key: &str) -> Option<Cow<'static, str>> {
        self(key)
    }
}

/// Read a variable from the process environment.
///
/// Non-unicode values are logged and treated as absent.
pub fn std_env(key: &str) -> Option<Cow<'static, str>> {
    match std::env::var(key) {
        Ok(value) => Some(Cow::from(value)),
        Err(std::env::VarError::NotPresent) => None,
        Err(_) => {
            tracing::error!(key, "Found non-unicode characters in env var, ignoring");
            None
        }
    }
}

#[cfg(test)]
pub use self::mock::MockEnv;
