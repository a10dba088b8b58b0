//! Test suite for the scope module
//!
//! Tests cover:
//! - Token validation
//! - Claim parsing
//! - Authority rendering
//! - Serde representation

use super::*;
use crate::error::AuthzError;
use std::str::FromStr;

// ============================================================================
// Scope Type Tests
// ============================================================================

#[test]
fn test_scope_parsing() {
    let scope = Scope::from_str("readtask").unwrap();
    assert_eq!(scope.as_str(), "readtask");
    assert_eq!(scope.to_string(), "readtask");
}

#[test]
fn test_scope_validation_errors() {
    assert!(matches!(Scope::new(""), Err(AuthzError::InvalidScope(_))));
    assert!(matches!(Scope::new("read task"), Err(AuthzError::InvalidScope(_))));
    assert!(matches!(Scope::new("read\"task"), Err(AuthzError::InvalidScope(_))));
    assert!(matches!(Scope::new("read\\task"), Err(AuthzError::InvalidScope(_))));
    assert!(matches!(Scope::new("tâche"), Err(AuthzError::InvalidScope(_))));
}

#[test]
fn test_scope_accepts_url_style_tokens() {
    assert!(Scope::new("https://api.example.com/tasks.read").is_ok());
    assert!(Scope::new("tasks:write").is_ok());
}

#[test]
fn test_scope_is_case_sensitive() {
    let lower = Scope::new("readtask").unwrap();
    let mixed = Scope::new("ReadTask").unwrap();
    assert_ne!(lower, mixed);
}

#[test]
fn test_authority_round_trip() {
    let scope = Scope::new("updatetask").unwrap();
    assert_eq!(scope.authority(), "SCOPE_updatetask");
    assert_eq!(Scope::from_authority("SCOPE_updatetask").unwrap(), scope);
}

#[test]
fn test_authority_without_prefix() {
    assert!(Scope::from_authority("ROLE_admin").is_err());
    assert!(Scope::from_authority("SCOPE_").is_err());
}

// ============================================================================
// Granted Scope Tests
// ============================================================================

#[test]
fn test_claim_parsing_collapses_duplicates() {
    let granted = GrantedScopes::from_claim(" readtask\tupdatetask  readtask ").unwrap();
    assert_eq!(granted.len(), 2);
    assert!(granted.contains("readtask"));
    assert!(granted.contains("updatetask"));
}

#[test]
fn test_empty_claim() {
    let granted = GrantedScopes::from_claim("   ").unwrap();
    assert!(granted.is_empty());
    assert!(!granted.contains("readtask"));
}

#[test]
fn test_claim_with_malformed_token() {
    assert!(GrantedScopes::from_claim("readtask bad\"token").is_err());
}

#[test]
fn test_contains_is_exact() {
    let granted = GrantedScopes::try_from_strs(["readtask"]).unwrap();
    assert!(!granted.contains("read"));
    assert!(!granted.contains("readtasks"));
    assert!(!granted.contains("READTASK"));
}

#[test]
fn test_authorities_are_sorted() {
    let granted = GrantedScopes::from_claim("updatetask readtask").unwrap();
    assert_eq!(
        granted.authorities(),
        vec!["SCOPE_readtask".to_string(), "SCOPE_updatetask".to_string()]
    );
}

#[test]
fn test_to_claim() {
    let granted = GrantedScopes::from_claim("updatetask readtask").unwrap();
    assert_eq!(granted.to_claim(), "readtask updatetask");
    assert_eq!(GrantedScopes::new().to_claim(), "");
}

#[test]
fn test_insert_and_extend() {
    let mut granted = GrantedScopes::new();
    assert!(granted.insert(Scope::new("readtask").unwrap()));
    assert!(!granted.insert(Scope::new("readtask").unwrap()));

    granted.extend(vec![Scope::new("updatetask").unwrap()]);
    assert_eq!(granted.len(), 2);
    assert_eq!((&granted).into_iter().count(), 2);
}

#[test]
fn test_serde_representation() {
    let scope: Scope = serde_json::from_str("\"readtask\"").unwrap();
    assert_eq!(scope.as_str(), "readtask");
    assert!(serde_json::from_str::<Scope>("\"\"").is_err());

    let granted: GrantedScopes = serde_json::from_str(r#"["readtask","updatetask"]"#).unwrap();
    assert_eq!(granted.len(), 2);
}
