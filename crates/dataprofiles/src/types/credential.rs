//! Credential types referenced by data source profiles.
//!
//! Responsibilities:
//! - Define `Credential` and one shape per credential category.
//! - Provide each shape's `validate` pre-check via `CredentialVariant`.
//!
//! Does NOT handle:
//! - Deciding which shape a declaration maps to (see `registry::classifier`).
//! - Storing secrets anywhere but process memory.
//!
//! Invariants:
//! - Secret material is held as `secrecy::SecretString` and never appears in
//!   `Debug` output.
//! - A credential's category list is non-empty.

use std::collections::BTreeMap;

use secrecy::SecretString;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::declaration::{Declaration, decode};

/// Deserialize plain strings into `SecretString`.
///
/// Type errors name the kind of value found, never the value itself.
mod secret_string {
    use secrecy::SecretString;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::types::declaration::describe_value;

    fn into_secret<E: Error>(value: Value) -> Result<SecretString, E> {
        match value {
            Value::String(s) => Ok(SecretString::new(s.into())),
            other => Err(E::custom(format!(
                "expected a string secret, found {}",
                describe_value(&other)
            ))),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        into_secret(Value::deserialize(deserializer)?)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            other => into_secret(other).map(Some),
        }
    }
}

/// Contract implemented by every credential shape.
pub trait CredentialVariant: DeserializeOwned + Into<CredentialShape> {
    /// Name of the shape, used in diagnostics.
    const SHAPE: &'static str;

    /// Shape-specific declaration keys (the envelope keys are implied).
    const FIELDS: &'static [&'static str];

    fn check(&self) -> Result<(), String> {
        Ok(())
    }

    /// Validate a raw declaration and build the shape.
    fn validate(declaration: &Declaration) -> Result<Self, String> {
        let shape: Self = decode(declaration)?;
        shape.check()?;
        Ok(shape)
    }
}

/// A named identity or secret, resolved by identifier from profiles.
#[derive(Debug, Clone)]
pub struct Credential {
    identifier: String,
    categories: Vec<String>,
    shape: CredentialShape,
}

impl Credential {
    pub fn new(
        identifier: impl Into<String>,
        categories: Vec<String>,
        shape: impl Into<CredentialShape>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            categories,
            shape: shape.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Categories this credential may be used for, in declaration order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn shape(&self) -> &CredentialShape {
        &self.shape
    }
}

/// Concrete credential payload.
#[derive(Debug, Clone)]
pub enum CredentialShape {
    ApiToken(ApiTokenCredential),
    AwsAccessKey(AwsAccessKeyCredential),
    AzureClientSecret(AzureClientSecretCredential),
    Basic(BasicCredential),
    PersonalApiToken(PersonalApiTokenCredential),
    PublicKey(PublicKeyCredential),
    Ssh(SshCredential),
    WifiChoice(WifiChoiceCredential),
}

impl CredentialShape {
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::ApiToken(_) => ApiTokenCredential::SHAPE,
            Self::AwsAccessKey(_) => AwsAccessKeyCredential::SHAPE,
            Self::AzureClientSecret(_) => AzureClientSecretCredential::SHAPE,
            Self::Basic(_) => BasicCredential::SHAPE,
            Self::PersonalApiToken(_) => PersonalApiTokenCredential::SHAPE,
            Self::PublicKey(_) => PublicKeyCredential::SHAPE,
            Self::Ssh(_) => SshCredential::SHAPE,
            Self::WifiChoice(_) => WifiChoiceCredential::SHAPE,
        }
    }
}

macro_rules! into_shape {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for CredentialShape {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

into_shape! {
    ApiTokenCredential => ApiToken,
    AwsAccessKeyCredential => AwsAccessKey,
    AzureClientSecretCredential => AzureClientSecret,
    BasicCredential => Basic,
    PersonalApiTokenCredential => PersonalApiToken,
    PublicKeyCredential => PublicKey,
    SshCredential => Ssh,
    WifiChoiceCredential => WifiChoice,
}

/// Bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTokenCredential {
    #[serde(deserialize_with = "secret_string::deserialize")]
    token: SecretString,
}

impl ApiTokenCredential {
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

impl CredentialVariant for ApiTokenCredential {
    const SHAPE: &'static str = "api-token";
    const FIELDS: &'static [&'static str] = &["token"];
}

/// AWS access key pair.
#[derive(Debug, Clone, Deserialize)]
pub struct AwsAccessKeyCredential {
    access_key: String,
    #[serde(deserialize_with = "secret_string::deserialize")]
    secret_key: SecretString,
    #[serde(default)]
    region: Option<String>,
}

impl AwsAccessKeyCredential {
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl CredentialVariant for AwsAccessKeyCredential {
    const SHAPE: &'static str = "aws-access-key";
    const FIELDS: &'static [&'static str] = &["access_key", "secret_key", "region"];

    fn check(&self) -> Result<(), String> {
        require_non_empty("access_key", &self.access_key)
    }
}

/// Azure service principal secret.
#[derive(Debug, Clone, Deserialize)]
pub struct AzureClientSecretCredential {
    tenant_id: String,
    client_id: String,
    #[serde(deserialize_with = "secret_string::deserialize")]
    client_secret: SecretString,
}

impl AzureClientSecretCredential {
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }
}

impl CredentialVariant for AzureClientSecretCredential {
    const SHAPE: &'static str = "azure-client-secret";
    const FIELDS: &'static [&'static str] = &["tenant_id", "client_id", "client_secret"];

    fn check(&self) -> Result<(), String> {
        require_non_empty("tenant_id", &self.tenant_id)?;
        require_non_empty("client_id", &self.client_id)
    }
}

/// Username and password. Also the shared shape of multi-category credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct BasicCredential {
    username: String,
    #[serde(deserialize_with = "secret_string::deserialize")]
    password: SecretString,
}

impl BasicCredential {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

impl CredentialVariant for BasicCredential {
    const SHAPE: &'static str = "basic";
    const FIELDS: &'static [&'static str] = &["username", "password"];

    fn check(&self) -> Result<(), String> {
        require_non_empty("username", &self.username)
    }
}

/// Personal access token bound to a user.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonalApiTokenCredential {
    username: String,
    #[serde(deserialize_with = "secret_string::deserialize")]
    token: SecretString,
}

impl PersonalApiTokenCredential {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

impl CredentialVariant for PersonalApiTokenCredential {
    const SHAPE: &'static str = "personal-api-token";
    const FIELDS: &'static [&'static str] = &["username", "token"];

    fn check(&self) -> Result<(), String> {
        require_non_empty("username", &self.username)
    }
}

/// Public key identity, given as a key file path or the raw key.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicKeyCredential {
    username: String,
    #[serde(default)]
    keyfile: Option<String>,
    #[serde(default, deserialize_with = "secret_string::deserialize_option")]
    keyraw: Option<SecretString>,
}

impl PublicKeyCredential {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn keyfile(&self) -> Option<&str> {
        self.keyfile.as_deref()
    }

    pub fn keyraw(&self) -> Option<&SecretString> {
        self.keyraw.as_ref()
    }
}

impl CredentialVariant for PublicKeyCredential {
    const SHAPE: &'static str = "public-key";
    const FIELDS: &'static [&'static str] = &["username", "keyfile", "keyraw"];

    fn check(&self) -> Result<(), String> {
        require_non_empty("username", &self.username)?;
        if self.keyfile.is_none() && self.keyraw.is_none() {
            return Err("one of `keyfile` or `keyraw` is required".to_string());
        }
        Ok(())
    }
}

/// SSH login by password or key.
#[derive(Debug, Clone, Deserialize)]
pub struct SshCredential {
    username: String,
    #[serde(default, deserialize_with = "secret_string::deserialize_option")]
    password: Option<SecretString>,
    #[serde(default)]
    keyfile: Option<String>,
    #[serde(default, deserialize_with = "secret_string::deserialize_option")]
    keyraw: Option<SecretString>,
    /// Restrict sessions to primitive shell commands.
    #[serde(default)]
    primitive: bool,
}

impl SshCredential {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    pub fn keyfile(&self) -> Option<&str> {
        self.keyfile.as_deref()
    }

    pub fn keyraw(&self) -> Option<&SecretString> {
        self.keyraw.as_ref()
    }

    pub fn primitive(&self) -> bool {
        self.primitive
    }
}

impl CredentialVariant for SshCredential {
    const SHAPE: &'static str = "ssh";
    const FIELDS: &'static [&'static str] =
        &["username", "password", "keyfile", "keyraw", "primitive"];

    fn check(&self) -> Result<(), String> {
        require_non_empty("username", &self.username)?;
        if self.password.is_none() && self.keyfile.is_none() && self.keyraw.is_none() {
            return Err("one of `password`, `keyfile` or `keyraw` is required".to_string());
        }
        Ok(())
    }
}

/// Password for one wireless network.
#[derive(Debug, Clone, Deserialize)]
pub struct WifiNetwork {
    #[serde(deserialize_with = "secret_string::deserialize")]
    password: SecretString,
}

impl WifiNetwork {
    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

/// A choice of wireless networks keyed by SSID.
#[derive(Debug, Clone, Deserialize)]
pub struct WifiChoiceCredential {
    networks: BTreeMap<String, WifiNetwork>,
}

impl WifiChoiceCredential {
    pub fn networks(&self) -> &BTreeMap<String, WifiNetwork> {
        &self.networks
    }

    pub fn network(&self, ssid: &str) -> Option<&WifiNetwork> {
        self.networks.get(ssid)
    }
}

impl CredentialVariant for WifiChoiceCredential {
    const SHAPE: &'static str = "wifi-choice";
    const FIELDS: &'static [&'static str] = &["networks"];

    fn check(&self) -> Result<(), String> {
        if self.networks.is_empty() {
            return Err("`networks` must declare at least one network".to_string());
        }
        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("field `{field}` must not be empty"))
    } else {
        Ok(())
    }
}
