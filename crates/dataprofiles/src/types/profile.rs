//! Data source profile types.
//!
//! Responsibilities:
//! - Define `DataProfile`, the immutable descriptor of one external data store.
//! - Define one payload type per profile category and the `ProfileVariant`
//!   contract (profile type tag, accepted fields, `validate` hook).
//!
//! Does NOT handle:
//! - Mapping a declaration's `category` onto a variant (see `registry::catalog`).
//! - Collecting errors across a batch of declarations (see `registry`).
//!
//! Invariants:
//! - `DataProfile::profile_type` is derived from the payload, so the tag and
//!   the shape can never disagree.
//! - Profiles are constructed once through `validate` and never mutated.

use std::net::IpAddr;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::declaration::{Declaration, decode};

/// Contract implemented by every profile payload.
pub trait ProfileVariant: DeserializeOwned + Into<ProfileDetails> {
    /// Tag recorded on profiles of this variant.
    const PROFILE_TYPE: &'static str;

    /// Variant-specific declaration keys (the envelope and `credential` are implied).
    const FIELDS: &'static [&'static str];

    /// Semantic checks run after the declaration decoded successfully.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }

    /// Validate a raw declaration and build the payload.
    ///
    /// Fails when a mandatory field is missing, has the wrong type, or fails
    /// the variant's semantic checks.
    fn validate(declaration: &Declaration) -> Result<Self, String> {
        let variant: Self = decode(declaration)?;
        variant.check()?;
        Ok(variant)
    }
}

/// Fields shared by every profile declaration.
#[derive(Debug, Deserialize)]
struct ProfileBase {
    #[serde(default)]
    credential: Option<String>,
}

/// Immutable descriptor of one data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataProfile {
    name: String,
    credential: Option<String>,
    details: ProfileDetails,
}

impl DataProfile {
    /// Create a profile from its name, optional credential reference, and payload.
    pub fn new(
        name: impl Into<String>,
        credential: Option<String>,
        details: impl Into<ProfileDetails>,
    ) -> Self {
        Self {
            name: name.into(),
            credential,
            details: details.into(),
        }
    }

    /// Validate a declaration as variant `V` and build the profile named `name`.
    pub fn from_declaration<V: ProfileVariant>(
        name: &str,
        declaration: &Declaration,
    ) -> Result<Self, String> {
        let base: ProfileBase = decode(declaration)?;
        let variant = V::validate(declaration)?;
        Ok(Self::new(name, base.credential, variant))
    }

    /// Registry identifier of this profile.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Discriminator tag of the concrete variant.
    pub fn profile_type(&self) -> &'static str {
        self.details.profile_type()
    }

    /// Identifier of the credential this profile authenticates with.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Variant-specific payload.
    pub fn details(&self) -> &ProfileDetails {
        &self.details
    }

    /// Database engine name, for variants that carry one.
    pub fn dbtype(&self) -> Option<&str> {
        match &self.details {
            ProfileDetails::DatabaseBasic(p) => Some(p.dbtype()),
            ProfileDetails::DatabaseBasicTcp(p) => Some(p.dbtype()),
            _ => None,
        }
    }

    /// Target database name, for variants that carry one.
    pub fn dbname(&self) -> Option<&str> {
        match &self.details {
            ProfileDetails::DatabaseBasic(p) => p.dbname(),
            ProfileDetails::DatabaseBasicTcp(p) => p.dbname(),
            ProfileDetails::CouchDb(p) => p.dbname(),
            ProfileDetails::MongoDbAtlas(p) => p.dbname(),
            ProfileDetails::Snowflake(p) => p.database(),
        }
    }

    /// Network host, for TCP-reachable variants.
    pub fn host(&self) -> Option<&str> {
        match &self.details {
            ProfileDetails::DatabaseBasicTcp(p) => Some(p.host()),
            ProfileDetails::CouchDb(p) => Some(p.host()),
            _ => None,
        }
    }

    /// Network port, for TCP-reachable variants.
    pub fn port(&self) -> Option<u16> {
        match &self.details {
            ProfileDetails::DatabaseBasicTcp(p) => Some(p.port()),
            ProfileDetails::CouchDb(p) => Some(p.port()),
            _ => None,
        }
    }
}

/// Variant-specific payload of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileDetails {
    DatabaseBasic(DatabaseBasicProfile),
    DatabaseBasicTcp(DatabaseBasicTcpProfile),
    CouchDb(CouchDbProfile),
    MongoDbAtlas(MongoDbAtlasProfile),
    Snowflake(SnowflakeProfile),
}

impl ProfileDetails {
    /// `PROFILE_TYPE` tag of the variant held.
    pub fn profile_type(&self) -> &'static str {
        match self {
            Self::DatabaseBasic(_) => DatabaseBasicProfile::PROFILE_TYPE,
            Self::DatabaseBasicTcp(_) => DatabaseBasicTcpProfile::PROFILE_TYPE,
            Self::CouchDb(_) => CouchDbProfile::PROFILE_TYPE,
            Self::MongoDbAtlas(_) => MongoDbAtlasProfile::PROFILE_TYPE,
            Self::Snowflake(_) => SnowflakeProfile::PROFILE_TYPE,
        }
    }
}

/// A database addressed by engine and name only (embedded or socket-local).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseBasicProfile {
    dbtype: String,
    #[serde(default)]
    dbname: Option<String>,
}

impl DatabaseBasicProfile {
    pub fn new(dbtype: impl Into<String>, dbname: Option<String>) -> Self {
        Self {
            dbtype: dbtype.into(),
            dbname,
        }
    }

    pub fn dbtype(&self) -> &str {
        &self.dbtype
    }

    pub fn dbname(&self) -> Option<&str> {
        self.dbname.as_deref()
    }
}

impl ProfileVariant for DatabaseBasicProfile {
    const PROFILE_TYPE: &'static str = "database-basic";
    const FIELDS: &'static [&'static str] = &["dbtype", "dbname"];

    fn check(&self) -> Result<(), String> {
        require_non_empty("dbtype", &self.dbtype)
    }
}

impl From<DatabaseBasicProfile> for ProfileDetails {
    fn from(value: DatabaseBasicProfile) -> Self {
        Self::DatabaseBasic(value)
    }
}

/// A database engine reachable over TCP.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseBasicTcpProfile {
    host: String,
    port: u16,
    dbtype: String,
    #[serde(default)]
    dbname: Option<String>,
}

impl DatabaseBasicTcpProfile {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        dbtype: impl Into<String>,
        dbname: Option<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            dbtype: dbtype.into(),
            dbname,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn dbtype(&self) -> &str {
        &self.dbtype
    }

    pub fn dbname(&self) -> Option<&str> {
        self.dbname.as_deref()
    }
}

impl ProfileVariant for DatabaseBasicTcpProfile {
    const PROFILE_TYPE: &'static str = "database-basic-tcp";
    const FIELDS: &'static [&'static str] = &["host", "port", "dbtype", "dbname"];

    fn check(&self) -> Result<(), String> {
        require_non_empty("dbtype", &self.dbtype)?;
        check_endpoint(&self.host, self.port)
    }
}

impl From<DatabaseBasicTcpProfile> for ProfileDetails {
    fn from(value: DatabaseBasicTcpProfile) -> Self {
        Self::DatabaseBasicTcp(value)
    }
}

/// A CouchDB server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CouchDbProfile {
    host: String,
    port: u16,
    #[serde(default)]
    dbname: Option<String>,
}

impl CouchDbProfile {
    pub fn new(host: impl Into<String>, port: u16, dbname: Option<String>) -> Self {
        Self {
            host: host.into(),
            port,
            dbname,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn dbname(&self) -> Option<&str> {
        self.dbname.as_deref()
    }
}

impl ProfileVariant for CouchDbProfile {
    const PROFILE_TYPE: &'static str = "couchdb";
    const FIELDS: &'static [&'static str] = &["host", "port", "dbname"];

    fn check(&self) -> Result<(), String> {
        check_endpoint(&self.host, self.port)
    }
}

impl From<CouchDbProfile> for ProfileDetails {
    fn from(value: CouchDbProfile) -> Self {
        Self::CouchDb(value)
    }
}

/// A MongoDB Atlas cluster addressed by connection string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MongoDbAtlasProfile {
    connection: String,
    #[serde(default)]
    dbname: Option<String>,
}

impl MongoDbAtlasProfile {
    const SCHEMES: &'static [&'static str] = &["mongodb://", "mongodb+srv://"];

    pub fn new(connection: impl Into<String>, dbname: Option<String>) -> Self {
        Self {
            connection: connection.into(),
            dbname,
        }
    }

    /// Connection string, possibly with `<username>`/`<password>` placeholders.
    pub fn connection(&self) -> &str {
        &self.connection
    }

    pub fn dbname(&self) -> Option<&str> {
        self.dbname.as_deref()
    }
}

impl ProfileVariant for MongoDbAtlasProfile {
    const PROFILE_TYPE: &'static str = "mongodb-atlas";
    const FIELDS: &'static [&'static str] = &["connection", "dbname"];

    fn check(&self) -> Result<(), String> {
        if Self::SCHEMES
            .iter()
            .any(|scheme| self.connection.starts_with(scheme))
        {
            Ok(())
        } else {
            Err("connection must start with 'mongodb://' or 'mongodb+srv://'".to_string())
        }
    }
}

impl From<MongoDbAtlasProfile> for ProfileDetails {
    fn from(value: MongoDbAtlasProfile) -> Self {
        Self::MongoDbAtlas(value)
    }
}

/// A Snowflake account, optionally pinned to a warehouse, database, and schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SnowflakeProfile {
    account: String,
    #[serde(default)]
    warehouse: Option<String>,
    #[serde(default)]
    database: Option<String>,
    #[serde(default)]
    schema: Option<String>,
}

impl SnowflakeProfile {
    pub fn new(
        account: impl Into<String>,
        warehouse: Option<String>,
        database: Option<String>,
        schema: Option<String>,
    ) -> Self {
        Self {
            account: account.into(),
            warehouse,
            database,
            schema,
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn warehouse(&self) -> Option<&str> {
        self.warehouse.as_deref()
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }
}

impl ProfileVariant for SnowflakeProfile {
    const PROFILE_TYPE: &'static str = "snowflake";
    const FIELDS: &'static [&'static str] = &["account", "warehouse", "database", "schema"];

    fn check(&self) -> Result<(), String> {
        require_non_empty("account", &self.account)
    }
}

impl From<SnowflakeProfile> for ProfileDetails {
    fn from(value: SnowflakeProfile) -> Self {
        Self::Snowflake(value)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("field `{field}` must not be empty"))
    } else {
        Ok(())
    }
}

/// Hosts are DNS names, IPv4 literals, or IPv6 literals (bare or bracketed).
fn check_endpoint(host: &str, port: u16) -> Result<(), String> {
    if port == 0 {
        return Err("field `port` must be between 1 and 65535".to_string());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(());
    }
    url::Host::parse(host)
        .map(|_| ())
        .map_err(|e| format!("field `host` ('{host}') is not a valid host: {e}"))
}
