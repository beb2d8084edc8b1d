//! Duplicate identifier tests.
//!
//! Responsibilities:
//! - Test the default reject policy within a batch and across loads.
//! - Test the overwrite policy (last declaration wins, with a warning).

use serde_json::json;

use crate::constants::{CREDENTIALS_SECTION, DATASOURCES_SECTION};
use crate::error::ConfigurationError;
use crate::registry::{CollisionPolicy, CredentialManager, DataProfileManager};

use super::section;

fn sqlite(identifier: &str, dbname: &str) -> serde_json::Value {
    json!({
        "identifier": identifier,
        "category": "basic",
        "dbtype": "sqlite",
        "dbname": dbname
    })
}

#[test]
fn test_reject_duplicate_within_batch() {
    let mut manager = DataProfileManager::new();
    let doc = section(
        DATASOURCES_SECTION,
        json!([sqlite("cache", "one.db"), sqlite("cache", "two.db")]),
    );

    let err = manager.load_profiles(Some(&doc), ["dup.yaml"]).unwrap_err();

    assert!(matches!(err, ConfigurationError::BatchValidation { .. }));
    assert!(err.batch_errors()[0].contains("'cache'"));
    assert!(manager.profiles().is_empty());
}

#[test]
fn test_reject_identifier_from_earlier_load() {
    let mut manager = DataProfileManager::new();
    let first = section(DATASOURCES_SECTION, json!([sqlite("cache", "one.db")]));
    let second = section(
        DATASOURCES_SECTION,
        json!([sqlite("cache", "two.db"), sqlite("other", "three.db")]),
    );

    manager.load_profiles(Some(&first), ["first.yaml"]).unwrap();
    let err = manager.load_profiles(Some(&second), ["second.yaml"]).unwrap_err();

    assert!(err.batch_errors()[0].contains("already registered"));
    assert_eq!(manager.lookup_profile("cache").unwrap().dbname(), Some("one.db"));
    assert!(manager.lookup_profile("other").is_err());
    assert_eq!(manager.source_uris(), ["first.yaml", "second.yaml"]);
}

#[test]
fn test_overwrite_last_declaration_wins() {
    let mut manager = DataProfileManager::new().with_collision_policy(CollisionPolicy::Overwrite);
    let first = section(DATASOURCES_SECTION, json!([sqlite("cache", "one.db")]));
    let second = section(
        DATASOURCES_SECTION,
        json!([sqlite("cache", "two.db"), sqlite("cache", "three.db")]),
    );

    manager.load_profiles(Some(&first), ["first.yaml"]).unwrap();
    let report = manager.load_profiles(Some(&second), ["second.yaml"]).unwrap();

    assert_eq!(report.warnings.len(), 2);
    assert_eq!(report.registered, vec!["cache"]);
    assert_eq!(manager.profiles().len(), 1);
    assert_eq!(
        manager.lookup_profile("cache").unwrap().dbname(),
        Some("three.db")
    );
}

#[test]
fn test_credentials_follow_collision_policy() {
    let doc = section(
        CREDENTIALS_SECTION,
        json!([
            { "identifier": "token", "category": "api-token", "token": "a" },
            { "identifier": "token", "category": "api-token", "token": "b" }
        ]),
    );

    let mut strict = CredentialManager::new();
    assert!(strict.load_credentials(Some(&doc), ["creds.yaml"]).is_err());

    let mut lenient = CredentialManager::new().with_collision_policy(CollisionPolicy::Overwrite);
    let report = lenient.load_credentials(Some(&doc), ["creds.yaml"]).unwrap();
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.registered, vec!["token"]);
    assert_eq!(lenient.collision_policy(), CollisionPolicy::Overwrite);
    assert_eq!(lenient.credentials().len(), 1);
}
