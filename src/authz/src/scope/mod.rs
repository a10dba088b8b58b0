//! Flat OAuth2 scope model
//!
//! Scopes are exact, case-sensitive capability strings. There is no
//! hierarchy between them: holding `updatetask` says nothing about
//! `readtask`.
//!
//! # Examples
//!
//! ```
//! use taskgate_authz::scope::{GrantedScopes, Scope};
//!
//! let granted = GrantedScopes::from_claim("readtask").unwrap();
//! assert!(granted.contains("readtask"));
//! assert!(!granted.contains("ReadTask"));
//! assert_eq!(Scope::from_authority("SCOPE_readtask").unwrap().as_str(), "readtask");
//! ```

mod granted;
mod types;

#[cfg(test)]
mod tests;

pub use granted::GrantedScopes;
pub use types::{Scope, AUTHORITY_PREFIX};
