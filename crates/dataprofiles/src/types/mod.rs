//! Profile and credential type definitions.
//!
//! Responsibilities:
//! - Define the immutable profile and credential values held by the registries.
//! - Define the per-variant `validate` hooks that turn raw declarations into values.
//!
//! Does NOT handle:
//! - Category dispatch, batch validation, or lookup (see `registry` module).
//! - Decoding documents from text or files (see `loader` module).
//!
//! Invariants:
//! - Values are immutable after construction; all fields are read through accessors.
//! - Secret material uses `secrecy::SecretString` to prevent accidental logging.

pub mod credential;
pub(crate) mod declaration;
pub mod profile;

pub use credential::{
    ApiTokenCredential, AwsAccessKeyCredential, AzureClientSecretCredential, BasicCredential,
    Credential, CredentialShape, CredentialVariant, PersonalApiTokenCredential,
    PublicKeyCredential, SshCredential, WifiChoiceCredential, WifiNetwork,
};
pub use declaration::Declaration;
pub use profile::{
    CouchDbProfile, DataProfile, DatabaseBasicProfile, DatabaseBasicTcpProfile,
    MongoDbAtlasProfile, ProfileDetails, ProfileVariant, SnowflakeProfile,
};
