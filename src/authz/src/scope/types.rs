//! Scope type definitions and validation
//!
//! A scope is a single OAuth2 capability string such as `readtask`.
//! Scopes are flat: no hierarchy, no wildcards, case-sensitive.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::{AuthzError, Result};

/// Prefix resource-server frameworks put in front of scope claims when
/// turning them into authorities (`SCOPE_readtask`).
pub const AUTHORITY_PREFIX: &str = "SCOPE_";

/// A validated scope token
///
/// Accepts the `scope-token` grammar from RFC 6749 section 3.3: one or more
/// printable ASCII characters excluding space, `"` and `\`.
///
/// # Examples
///
/// ```
/// use taskgate_authz::scope::Scope;
///
/// let scope = Scope::new("readtask").unwrap();
/// assert_eq!(scope.as_str(), "readtask");
/// assert_eq!(scope.authority(), "SCOPE_readtask");
/// assert!(Scope::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scope(String);

impl Scope {
    /// Creates a new scope, rejecting empty or malformed tokens
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let raw = s.into();
        validate_token(&raw)?;
        Ok(Self(raw))
    }

    /// Wraps a token known to be valid, such as a built-in constant
    pub(crate) fn new_unchecked(s: &str) -> Self {
        debug_assert!(validate_token(s).is_ok());
        Self(s.to_string())
    }

    /// Parses an authority string such as `SCOPE_readtask` back into a scope
    pub fn from_authority(authority: &str) -> Result<Self> {
        match authority.strip_prefix(AUTHORITY_PREFIX) {
            Some(rest) => Self::new(rest),
            None => Err(AuthzError::InvalidScope(format!(
                "authority '{}' lacks the '{}' prefix",
                authority, AUTHORITY_PREFIX
            ))),
        }
    }

    /// Returns the raw scope string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Framework-style authority name for this scope
    pub fn authority(&self) -> String {
        format!("{}{}", AUTHORITY_PREFIX, self.0)
    }
}

fn validate_token(raw: &str) -> Result<()> {
    if raw.is_empty() {
        return Err(AuthzError::InvalidScope("scope cannot be empty".to_string()));
    }

    if let Some(bad) = raw
        .chars()
        .find(|c| !matches!(*c, '\x21' | '\x23'..='\x5B' | '\x5D'..='\x7E'))
    {
        return Err(AuthzError::InvalidScope(format!(
            "illegal character {:?} in scope '{}'",
            bad, raw
        )));
    }

    Ok(())
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Scope {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Scope {
    type Error = AuthzError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.0
    }
}

impl AsRef<str> for Scope {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Scope {
    fn borrow(&self) -> &str {
        &self.0
    }
}
