//! Integration tests for the scope authorizer
//!
//! Covers the membership property, idempotence, large scope sets and
//! concurrent use from many threads.

use proptest::collection::hash_set;
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use taskgate_authz::{
    authorize, Decision, EndpointPolicy, GrantedScopes, Principal, Scope, ScopeAuthorizer,
};

fn scope_token() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.:/-]{1,24}"
}

fn granted_from(tokens: &std::collections::HashSet<String>) -> GrantedScopes {
    GrantedScopes::try_from_strs(tokens.iter().cloned()).unwrap()
}

proptest! {
    #[test]
    fn allow_iff_required_is_granted(
        tokens in hash_set(scope_token(), 0..32),
        required in scope_token(),
    ) {
        let granted = granted_from(&tokens);
        let decision = authorize(&granted, &required).unwrap();
        prop_assert_eq!(decision == Decision::Allow, tokens.contains(&required));
    }

    #[test]
    fn every_granted_scope_is_allowed(tokens in hash_set(scope_token(), 1..32)) {
        let granted = granted_from(&tokens);
        for token in &tokens {
            prop_assert_eq!(authorize(&granted, token).unwrap(), Decision::Allow);
        }
    }

    #[test]
    fn empty_set_always_denies(required in scope_token()) {
        prop_assert_eq!(authorize(&GrantedScopes::new(), &required).unwrap(), Decision::Deny);
    }

    #[test]
    fn authorize_is_idempotent(
        tokens in hash_set(scope_token(), 0..16),
        required in scope_token(),
    ) {
        let granted = granted_from(&tokens);
        let first = authorize(&granted, &required).unwrap();
        let second = authorize(&granted, &required).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn case_is_never_folded(required in "[a-z]{1,16}") {
        let upper = required.to_ascii_uppercase();
        let granted = GrantedScopes::try_from_strs([upper]).unwrap();
        prop_assert_eq!(authorize(&granted, &required).unwrap(), Decision::Deny);
    }

    #[test]
    fn empty_required_is_always_a_configuration_error(tokens in hash_set(scope_token(), 0..8)) {
        let granted = granted_from(&tokens);
        prop_assert!(authorize(&granted, "").unwrap_err().is_configuration());
    }
}

#[test]
fn test_case_sensitivity_example() {
    let granted = GrantedScopes::try_from_strs(["ReadTask"]).unwrap();
    assert_eq!(authorize(&granted, "readtask").unwrap(), Decision::Deny);
}

#[test]
fn test_large_scope_set() {
    let granted: GrantedScopes = (0..100_000)
        .map(|i| Scope::new(format!("scope{}", i)).unwrap())
        .collect();

    assert_eq!(granted.len(), 100_000);
    assert_eq!(authorize(&granted, "scope99999").unwrap(), Decision::Allow);
    assert_eq!(authorize(&granted, "scope100000").unwrap(), Decision::Deny);
}

#[test]
fn test_task_scenarios() {
    let authorizer = ScopeAuthorizer::with_task_defaults();

    let reader = Principal::from_claim("reader", "readtask").unwrap();
    assert!(authorizer.check_endpoint(&reader, "GET", "/task").unwrap().is_allowed());
    assert!(!authorizer.check_endpoint(&reader, "POST", "/task").unwrap().is_allowed());

    let editor = Principal::from_claim("editor", "readtask updatetask").unwrap();
    assert!(authorizer.check_endpoint(&editor, "GET", "/task").unwrap().is_allowed());
    assert!(authorizer.check_endpoint(&editor, "POST", "/task").unwrap().is_allowed());

    let nobody = Principal::new("nobody");
    assert!(!authorizer.check_endpoint(&nobody, "GET", "/task").unwrap().is_allowed());
    assert!(!authorizer.check_endpoint(&nobody, "POST", "/task").unwrap().is_allowed());
}

#[test]
fn test_concurrent_checks() {
    let policy = EndpointPolicy::builder()
        .require("GET", "/task", "readtask")
        .require("POST", "/task", "updatetask")
        .build()
        .unwrap();
    let authorizer = ScopeAuthorizer::new(Arc::new(policy));
    let reader = Arc::new(Principal::from_claim("reader", "readtask").unwrap());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let authorizer = authorizer.clone();
            let reader = Arc::clone(&reader);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    assert_eq!(
                        authorizer.check_endpoint(&reader, "GET", "/task").unwrap(),
                        Decision::Allow
                    );
                    assert_eq!(
                        authorizer.check_endpoint(&reader, "POST", "/task").unwrap(),
                        Decision::Deny
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
