//! Authentication handling for the contents API.

use secrecy::SecretString;

use crate::error::{Error, Result};

/// Authentication method for the contents API.
#[derive(Debug, Clone)]
pub enum Auth {
    /// Use a specific token.
    Token(SecretString),

    /// Use token from environment variable.
    EnvVar(String),
}

impl Auth {
    /// Environment variable read by [`Auth::default`].
    pub const DEFAULT_ENV_VAR: &'static str = "REPOFS_TOKEN";

    /// Resolve the authentication to a token.
    ///
    /// # Errors
    /// Returns error if the token is missing or empty.
    pub fn resolve(&self) -> Result<SecretString> {
        match self {
            Self::Token(t) => Ok(t.clone()),
            Self::EnvVar(var) => match std::env::var(var) {
                Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
                _ => Err(Error::NoToken),
            },
        }
    }
}

impl Default for Auth {
    fn default() -> Self {
        Self::EnvVar(Self::DEFAULT_ENV_VAR.into())
    }
}
