//! Integration tests for loading landscape documents.
//!
//! These tests drive the public API end to end: decode YAML or JSON from text
//! and files, load both sections, and resolve profiles with their credentials.

use std::io::Write;

use datasource_profiles::{
    ConfigurationError, CredentialShape, DataSourceRegistry, DocumentFormat, ProfileDetails,
    constants::CONFIG_PATH_ENV, parse_document, read_document,
};
use secrecy::ExposeSecret;
use serial_test::serial;
use tempfile::{NamedTempFile, TempDir};

const LANDSCAPE: &str = r#"
credentials:
  - identifier: dbadmin
    category: basic
    username: admin
    password: hunter2
  - identifier: atlas-user
    categories:
      - basic
      - rest-basic
    username: atlas
    password: atlas-pw

datasources:
  - identifier: basic-database
    category: basic-tcp
    dbtype: postgres
    dbname: testdb
    host: somedb.somecompany.com
    port: 8888
    credential: dbadmin

  - identifier: mongodb-example
    category: mongodb-atlas
    connection: mongodb+srv://cluster0.example.mongodb.net
    credential: atlas-user

  - identifier: couchdb-example
    category: couchdb
    host: 10.0.0.12
    port: 5984

  - identifier: snowflake-example
    category: snowflake
    account: xy12345.us-east-1
    warehouse: COMPUTE_WH
    database: SALES
    schema: PUBLIC
"#;

fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// The example landscape resolves every profile with its credential.
#[test]
fn test_landscape_document_end_to_end() {
    let doc = parse_document(LANDSCAPE, DocumentFormat::Yaml, "landscape.yaml")
        .unwrap()
        .expect("landscape should not be empty");

    let mut registry = DataSourceRegistry::new();
    let report = registry.load_document(Some(&doc), ["landscape.yaml"]).unwrap();

    assert!(report.is_clean(), "unexpected warnings: {:?}", report.warnings);
    assert_eq!(registry.profiles().profiles().len(), 4);
    assert_eq!(registry.credentials().credentials().len(), 2);

    let resolved = registry.resolve("basic-database").unwrap();
    assert_eq!(resolved.profile.dbtype(), Some("postgres"));
    assert_eq!(resolved.profile.host(), Some("somedb.somecompany.com"));
    assert_eq!(resolved.profile.port(), Some(8888));
    assert_eq!(resolved.profile.credential(), Some("dbadmin"));
    assert_eq!(resolved.credential.unwrap().identifier(), "dbadmin");

    let resolved = registry.resolve("mongodb-example").unwrap();
    let credential = resolved.credential.unwrap();
    assert_eq!(credential.categories(), ["basic", "rest-basic"]);
    match credential.shape() {
        CredentialShape::Basic(basic) => assert_eq!(basic.password().expose_secret(), "atlas-pw"),
        other => panic!("Expected basic shape, got {}", other.shape_name()),
    }

    let couch = registry.resolve("couchdb-example").unwrap();
    assert_eq!(couch.profile.host(), Some("10.0.0.12"));
    assert!(couch.credential.is_none());

    match registry.resolve("snowflake-example").unwrap().profile.details() {
        ProfileDetails::Snowflake(snowflake) => assert_eq!(snowflake.schema(), Some("PUBLIC")),
        other => panic!("Expected Snowflake details, got {:?}", other),
    }
}

/// Files are loaded in order with their paths as source locations.
#[test]
fn test_load_files_records_paths() {
    let yaml = write_temp(".yaml", LANDSCAPE);
    let json = write_temp(
        ".json",
        r#"{"datasources": [{"identifier": "cache", "category": "basic", "dbtype": "sqlite"}]}"#,
    );

    let mut registry = DataSourceRegistry::new();
    let report = registry.load_files(&[yaml.path(), json.path()]).unwrap();

    assert_eq!(report.registered.len(), 7);
    let expected = vec![
        yaml.path().display().to_string(),
        json.path().display().to_string(),
    ];
    assert_eq!(registry.profiles().source_uris(), expected.as_slice());

    let err = registry.resolve("missing").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("PROFILES URIS:"));
    assert!(message.contains(&expected[0]));
    assert!(message.contains(&expected[1]));
}

#[test]
fn test_empty_file_is_noop() {
    let empty = write_temp(".yaml", "");

    let mut registry = DataSourceRegistry::new();
    registry.load_files(&[empty.path()]).unwrap();

    assert!(registry.profiles().profiles().is_empty());
    assert_eq!(registry.profiles().source_uris().len(), 1);
}

#[test]
fn test_read_document_rejects_list_root() {
    let file = write_temp(".yaml", "- identifier: a\n");

    let err = read_document(file.path()).unwrap_err();
    assert!(matches!(err, ConfigurationError::DocumentNotMapping { .. }));
}

/// A failing file stops the run; files before it stay loaded.
#[test]
fn test_load_files_stops_at_invalid_file() {
    let good = write_temp(".yaml", LANDSCAPE);
    let bad = write_temp(
        ".yaml",
        "datasources:\n  - category: basic\n    dbtype: sqlite\n",
    );

    let mut registry = DataSourceRegistry::new();
    let err = registry
        .load_files(&[good.path(), bad.path()])
        .unwrap_err();

    assert!(matches!(err, ConfigurationError::BatchValidation { .. }));
    assert_eq!(registry.profiles().profiles().len(), 4);

    let expected = vec![
        good.path().display().to_string(),
        bad.path().display().to_string(),
    ];
    assert_eq!(registry.profiles().source_uris(), expected.as_slice());
    assert_eq!(registry.credentials().source_uris(), expected.as_slice());

    let message = registry.resolve("missing").unwrap_err().to_string();
    assert!(message.contains(&expected[1]), "got: {message}");
}

#[test]
#[serial]
fn test_from_env_loads_listed_documents() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("landscape.yaml");
    let second = dir.path().join("extra.json");
    std::fs::write(&first, LANDSCAPE).unwrap();
    std::fs::write(
        &second,
        r#"{"datasources": [{"identifier": "cache", "category": "basic", "dbtype": "sqlite"}]}"#,
    )
    .unwrap();
    let joined = std::env::join_paths([&first, &second]).unwrap();

    temp_env::with_var(CONFIG_PATH_ENV, Some(joined), || {
        let registry = DataSourceRegistry::from_env().unwrap();
        assert_eq!(registry.profiles().profiles().len(), 5);
        assert!(registry.resolve("cache").is_ok());
    });
}

#[test]
#[serial]
fn test_from_env_unset_is_empty() {
    temp_env::with_var_unset(CONFIG_PATH_ENV, || {
        let registry = DataSourceRegistry::from_env().unwrap();
        assert!(registry.profiles().profiles().is_empty());
        assert!(registry.profiles().source_uris().is_empty());
    });
}
