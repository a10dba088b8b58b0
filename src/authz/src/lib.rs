//! # Taskgate Authorization Core
//!
//! Scope-based access control for HTTP endpoints.
//!
//! ## Features
//!
//! - **Flat OAuth2 scopes**: exact, case-sensitive, no implied hierarchy
//! - **Static endpoint policy**: (method, path) -> required scope, built once
//! - **Pure decisions**: `authorize` has no side effects and no locks
//!
//! ## Example
//!
//! ```rust
//! use taskgate_authz::{Decision, Principal, ScopeAuthorizer};
//!
//! let authorizer = ScopeAuthorizer::with_task_defaults();
//! let principal = Principal::from_claim("alice@example.com", "readtask").unwrap();
//!
//! let decision = authorizer.check_endpoint(&principal, "GET", "/task").unwrap();
//! assert_eq!(decision, Decision::Allow);
//!
//! let decision = authorizer.check_endpoint(&principal, "POST", "/task").unwrap();
//! assert_eq!(decision, Decision::Deny);
//! ```

pub mod engine;
pub mod error;
pub mod policy;
pub mod scope;
pub mod types;

// Re-export commonly used types
pub use engine::{authorize, ScopeAuthorizer};
pub use error::{AuthzError, Result};
pub use policy::{EndpointPolicy, PolicyBuilder, PolicyRule, READ_TASK_SCOPE, UPDATE_TASK_SCOPE};
pub use scope::{GrantedScopes, Scope};
pub use types::{Decision, EndpointKey, Principal};
