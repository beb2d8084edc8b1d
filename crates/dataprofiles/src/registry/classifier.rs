//! Credential category classification.
//!
//! Responsibilities:
//! - Normalize `category` / `categories` into a non-empty category list.
//! - Enforce the multi-category rules (compatible set, shared username/password).
//! - Dispatch single-category declarations to the registered shape constructor.
//!
//! Does NOT handle:
//! - Identifier extraction, duplicate detection, or committing credentials
//!   (see `credentials.rs`).
//!
//! Invariants:
//! - Unknown single categories are reported as `Classification::UnknownCategory`,
//!   never as an error.
//! - Every other classification failure is a `ConfigurationError`.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::constants::{CATEGORIES_KEY, CATEGORY_KEY, MULTI_CATEGORY_COMPATIBLE};
use crate::error::ConfigurationError;
use crate::types::declaration::{describe_value, unrecognized_fields};
use crate::types::{
    ApiTokenCredential, AwsAccessKeyCredential, AzureClientSecretCredential, BasicCredential,
    Credential, CredentialShape, CredentialVariant, Declaration, PersonalApiTokenCredential,
    PublicKeyCredential, SshCredential, WifiChoiceCredential,
};

type BuildFn = fn(&Declaration) -> Result<CredentialShape, String>;

fn build_shape<V: CredentialVariant>(declaration: &Declaration) -> Result<CredentialShape, String> {
    V::validate(declaration).map(Into::into)
}

/// Validates and builds one credential shape.
#[derive(Debug, Clone, Copy)]
pub struct CredentialConstructor {
    shape: &'static str,
    fields: &'static [&'static str],
    build: BuildFn,
}

impl CredentialConstructor {
    pub fn of<V: CredentialVariant>() -> Self {
        Self {
            shape: V::SHAPE,
            fields: V::FIELDS,
            build: build_shape::<V>,
        }
    }

    pub fn shape(&self) -> &'static str {
        self.shape
    }
}

/// Result of classifying one credential declaration.
#[derive(Debug)]
pub enum Classification {
    /// The declaration produced a credential.
    Credential {
        credential: Credential,
        /// Declaration keys the chosen shape ignored.
        unrecognized: Vec<String>,
    },
    /// The single declared category has no registered shape.
    UnknownCategory { category: String },
}

/// Registered mapping from credential category to shape constructor.
#[derive(Debug, Clone)]
pub struct CredentialCatalog {
    constructors: BTreeMap<String, CredentialConstructor>,
}

impl Default for CredentialCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog.register("api-token", CredentialConstructor::of::<ApiTokenCredential>());
        catalog.register(
            "aws-access-key",
            CredentialConstructor::of::<AwsAccessKeyCredential>(),
        );
        catalog.register(
            "azure-client-secret",
            CredentialConstructor::of::<AzureClientSecretCredential>(),
        );
        catalog.register("basic", CredentialConstructor::of::<BasicCredential>());
        catalog.register("rest-basic", CredentialConstructor::of::<BasicCredential>());
        catalog.register(
            "personal-api-token",
            CredentialConstructor::of::<PersonalApiTokenCredential>(),
        );
        catalog.register("public-key", CredentialConstructor::of::<PublicKeyCredential>());
        catalog.register("ssh", CredentialConstructor::of::<SshCredential>());
        catalog.register("wifi-choice", CredentialConstructor::of::<WifiChoiceCredential>());
        catalog
    }
}

impl CredentialCatalog {
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    pub fn register(
        &mut self,
        category: impl Into<String>,
        constructor: CredentialConstructor,
    ) -> Option<CredentialConstructor> {
        self.constructors.insert(category.into(), constructor)
    }

    pub fn get(&self, category: &str) -> Option<&CredentialConstructor> {
        self.constructors.get(category)
    }

    /// Classify the declaration registered as `identifier`.
    pub fn classify(
        &self,
        identifier: &str,
        declaration: &Declaration,
    ) -> Result<Classification, ConfigurationError> {
        let categories = normalize_categories(identifier, declaration)?;

        if categories.len() == 1 {
            let category = categories[0].clone();
            let Some(constructor) = self.get(&category) else {
                return Ok(Classification::UnknownCategory { category });
            };
            let shape = (constructor.build)(declaration).map_err(|message| {
                ConfigurationError::InvalidDeclaration {
                    item: "Credential",
                    identifier: identifier.to_string(),
                    category,
                    message,
                }
            })?;
            let unrecognized = owned_keys(unrecognized_fields(declaration, constructor.fields));
            return Ok(Classification::Credential {
                credential: Credential::new(identifier, categories, shape),
                unrecognized,
            });
        }

        classify_multi_category(identifier, declaration, categories)
    }
}

/// Normalize `category` (preferred) or `categories` into a non-empty list.
///
/// Either key may hold a single string or a list of strings.
pub fn normalize_categories(
    identifier: &str,
    declaration: &Declaration,
) -> Result<Vec<String>, ConfigurationError> {
    let present = |key: &str| declaration.get(key).filter(|value| !value.is_null());
    let raw = present(CATEGORY_KEY)
        .or_else(|| present(CATEGORIES_KEY))
        .ok_or_else(|| ConfigurationError::MissingCredentialCategory {
            identifier: identifier.to_string(),
        })?;

    let invalid = |message: String| ConfigurationError::InvalidCategories {
        identifier: identifier.to_string(),
        message,
    };

    let categories = match raw {
        Value::String(category) => vec![category.clone()],
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(category) => Ok(category.clone()),
                other => Err(invalid(format!(
                    "expected a category name, found {}",
                    describe_value(other)
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        other => {
            return Err(invalid(format!(
                "expected a category name or a list of names, found {}",
                describe_value(other)
            )));
        }
    };

    if categories.is_empty() {
        return Err(invalid("the category list is empty".to_string()));
    }
    if let Some(blank) = categories.iter().find(|c| c.trim().is_empty()) {
        return Err(invalid(format!("blank category name '{blank}'")));
    }

    Ok(categories)
}

/// Multi-category credentials share one username/password shape.
fn classify_multi_category(
    identifier: &str,
    declaration: &Declaration,
    categories: Vec<String>,
) -> Result<Classification, ConfigurationError> {
    if categories
        .iter()
        .any(|category| !MULTI_CATEGORY_COMPATIBLE.contains(&category.as_str()))
    {
        return Err(ConfigurationError::InvalidCategoryCombination {
            identifier: identifier.to_string(),
            categories,
        });
    }

    if !declaration.contains_key("username") || !declaration.contains_key("password") {
        return Err(ConfigurationError::MissingCommonFields {
            identifier: identifier.to_string(),
        });
    }

    let basic = BasicCredential::validate(declaration).map_err(|message| {
        ConfigurationError::InvalidDeclaration {
            item: "Credential",
            identifier: identifier.to_string(),
            category: categories.join(", "),
            message,
        }
    })?;
    let unrecognized = owned_keys(unrecognized_fields(declaration, BasicCredential::FIELDS));

    Ok(Classification::Credential {
        credential: Credential::new(identifier, categories, basic),
        unrecognized,
    })
}

fn owned_keys(keys: Vec<&str>) -> Vec<String> {
    keys.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::document;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn classify(decl: serde_json::Value) -> Result<Classification, ConfigurationError> {
        CredentialCatalog::default().classify("cred", &document(decl))
    }

    fn expect_credential(result: Result<Classification, ConfigurationError>) -> Credential {
        match result {
            Ok(Classification::Credential { credential, .. }) => credential,
            other => panic!("Expected a credential, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_scalar_and_list_forms() {
        let scalar = document(json!({ "category": "ssh" }));
        let list = document(json!({ "category": ["basic", "ssh"] }));
        let plural_scalar = document(json!({ "categories": "api-token" }));
        let plural_list = document(json!({ "categories": ["rest-basic"] }));

        assert_eq!(normalize_categories("c", &scalar).unwrap(), vec!["ssh"]);
        assert_eq!(
            normalize_categories("c", &list).unwrap(),
            vec!["basic", "ssh"]
        );
        assert_eq!(
            normalize_categories("c", &plural_scalar).unwrap(),
            vec!["api-token"]
        );
        assert_eq!(
            normalize_categories("c", &plural_list).unwrap(),
            vec!["rest-basic"]
        );
    }

    #[test]
    fn test_null_category_falls_back_to_categories() {
        let decl = document(json!({ "category": null, "categories": ["basic", "ssh"] }));

        assert_eq!(
            normalize_categories("c", &decl).unwrap(),
            vec!["basic", "ssh"]
        );

        let both_null = document(json!({ "category": null, "categories": null }));
        assert!(matches!(
            normalize_categories("c", &both_null).unwrap_err(),
            ConfigurationError::MissingCredentialCategory { .. }
        ));
    }

    #[test]
    fn test_missing_category_is_error() {
        let err = classify(json!({ "username": "u", "password": "p" })).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingCredentialCategory { .. }
        ));
    }

    #[test]
    fn test_empty_and_non_string_categories_are_errors() {
        assert!(matches!(
            classify(json!({ "categories": [] })).unwrap_err(),
            ConfigurationError::InvalidCategories { .. }
        ));
        assert!(matches!(
            classify(json!({ "category": ["basic", 3] })).unwrap_err(),
            ConfigurationError::InvalidCategories { .. }
        ));
        assert!(matches!(
            classify(json!({ "category": { "kind": "basic" } })).unwrap_err(),
            ConfigurationError::InvalidCategories { .. }
        ));
    }

    #[test]
    fn test_multi_category_shared_basic_shape() {
        let credential = expect_credential(classify(json!({
            "categories": ["basic", "ssh"],
            "username": "dbadmin",
            "password": "s3cret",
        })));

        assert_eq!(credential.categories().to_vec(), vec!["basic", "ssh"]);
        match credential.shape() {
            CredentialShape::Basic(basic) => {
                assert_eq!(basic.username(), "dbadmin");
                assert_eq!(basic.password().expose_secret(), "s3cret");
            }
            other => panic!("Expected Basic shape, got {other:?}"),
        }
    }

    #[test]
    fn test_multi_category_without_password_fails() {
        let err = classify(json!({
            "categories": ["basic", "ssh"],
            "username": "dbadmin",
        }))
        .unwrap_err();

        assert!(matches!(err, ConfigurationError::MissingCommonFields { .. }));
    }

    #[test]
    fn test_multi_category_incompatible_combination() {
        let err = classify(json!({
            "categories": ["basic", "api-token"],
            "username": "dbadmin",
            "password": "s3cret",
        }))
        .unwrap_err();

        match err {
            ConfigurationError::InvalidCategoryCombination { categories, .. } => {
                assert_eq!(categories, vec!["basic", "api-token"]);
            }
            other => panic!("Expected InvalidCategoryCombination, got {other:?}"),
        }
    }

    #[test]
    fn test_single_category_dispatch() {
        let cases = [
            (json!({ "category": "api-token", "token": "t" }), "api-token"),
            (
                json!({ "category": "aws-access-key", "access_key": "AKIA", "secret_key": "s" }),
                "aws-access-key",
            ),
            (
                json!({ "category": "azure-client-secret", "tenant_id": "t", "client_id": "c", "client_secret": "s" }),
                "azure-client-secret",
            ),
            (
                json!({ "category": "rest-basic", "username": "u", "password": "p" }),
                "basic",
            ),
            (
                json!({ "category": "personal-api-token", "username": "u", "token": "t" }),
                "personal-api-token",
            ),
            (
                json!({ "category": "public-key", "username": "u", "keyraw": "-----BEGIN-----" }),
                "public-key",
            ),
            (
                json!({ "category": "ssh", "username": "u", "password": "p" }),
                "ssh",
            ),
            (
                json!({ "category": "wifi-choice", "networks": { "lab": { "password": "p" } } }),
                "wifi-choice",
            ),
        ];

        for (decl, shape) in cases {
            let credential = expect_credential(classify(decl));
            assert_eq!(credential.shape().shape_name(), shape);
        }
    }

    #[test]
    fn test_single_category_shape_validation_failure() {
        let err = classify(json!({ "category": "api-token" })).unwrap_err();
        match err {
            ConfigurationError::InvalidDeclaration {
                category, message, ..
            } => {
                assert_eq!(category, "api-token");
                assert!(message.contains("missing field `token`"), "got: {message}");
            }
            other => panic!("Expected InvalidDeclaration, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_single_category() {
        let result = classify(json!({ "category": "kerberos", "principal": "svc" })).unwrap();
        assert!(matches!(
            result,
            Classification::UnknownCategory { category } if category == "kerberos"
        ));
    }

    #[test]
    fn test_unrecognized_keys_reported() {
        let result = classify(json!({
            "category": "api-token",
            "token": "t",
            "scope": "read",
        }))
        .unwrap();

        match result {
            Classification::Credential { unrecognized, .. } => {
                assert_eq!(unrecognized, vec!["scope"]);
            }
            other => panic!("Expected a credential, got {other:?}"),
        }
    }
}
