//! The set of scopes granted to an authenticated principal

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::types::Scope;
use crate::error::Result;

/// Unique, unordered set of granted scopes
///
/// Membership is exact string equality. The set may be empty, in which
/// case every check against it denies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantedScopes {
    scopes: HashSet<Scope>,
}

impl GrantedScopes {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an OAuth2 `scope` claim: a space-delimited list of tokens
    ///
    /// Runs of whitespace are ignored and duplicates collapse. Fails on
    /// the first malformed token.
    ///
    /// ```
    /// use taskgate_authz::scope::GrantedScopes;
    ///
    /// let granted = GrantedScopes::from_claim("readtask  updatetask readtask").unwrap();
    /// assert_eq!(granted.len(), 2);
    /// assert!(granted.contains("updatetask"));
    /// ```
    pub fn from_claim(claim: &str) -> Result<Self> {
        claim.split_whitespace().map(Scope::new).collect()
    }

    /// Builds a set from raw strings, failing on the first malformed one
    pub fn try_from_strs<I, S>(scopes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        scopes.into_iter().map(Scope::new).collect()
    }

    /// Adds a scope, returning whether it was newly inserted
    pub fn insert(&mut self, scope: Scope) -> bool {
        self.scopes.insert(scope)
    }

    /// Exact, case-sensitive membership test
    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    /// Framework-style authority names (`SCOPE_<scope>`), sorted
    pub fn authorities(&self) -> Vec<String> {
        let mut authorities: Vec<String> = self.scopes.iter().map(Scope::authority).collect();
        authorities.sort();
        authorities
    }

    /// Renders the set back into a space-delimited claim, sorted for stable output
    pub fn to_claim(&self) -> String {
        let mut scopes: Vec<&str> = self.scopes.iter().map(Scope::as_str).collect();
        scopes.sort_unstable();
        scopes.join(" ")
    }
}

impl FromIterator<Scope> for GrantedScopes {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        Self {
            scopes: iter.into_iter().collect(),
        }
    }
}

impl Extend<Scope> for GrantedScopes {
    fn extend<I: IntoIterator<Item = Scope>>(&mut self, iter: I) {
        self.scopes.extend(iter);
    }
}

impl<'a> IntoIterator for &'a GrantedScopes {
    type Item = &'a Scope;
    type IntoIter = std::collections::hash_set::Iter<'a, Scope>;

    fn into_iter(self) -> Self::IntoIter {
        self.scopes.iter()
    }
}
