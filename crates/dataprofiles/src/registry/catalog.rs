//! Profile category dispatch table.
//!
//! Each category string maps to a `ProfileConstructor`. New variants are added
//! by registering a constructor, not by editing the load loop.

use std::collections::BTreeMap;

use crate::constants::CREDENTIAL_KEY;
use crate::types::declaration::unrecognized_fields;
use crate::types::{
    CouchDbProfile, DataProfile, DatabaseBasicProfile, DatabaseBasicTcpProfile, Declaration,
    MongoDbAtlasProfile, ProfileVariant, SnowflakeProfile,
};

type BuildFn = fn(&str, &Declaration) -> Result<DataProfile, String>;

/// Validates and builds one profile variant.
#[derive(Debug, Clone, Copy)]
pub struct ProfileConstructor {
    profile_type: &'static str,
    fields: &'static [&'static str],
    build: BuildFn,
}

impl ProfileConstructor {
    /// Constructor for variant `V`.
    pub fn of<V: ProfileVariant>() -> Self {
        Self {
            profile_type: V::PROFILE_TYPE,
            fields: V::FIELDS,
            build: DataProfile::from_declaration::<V>,
        }
    }

    pub fn profile_type(&self) -> &'static str {
        self.profile_type
    }

    /// Validate `declaration` and build the profile registered as `identifier`.
    pub fn build(&self, identifier: &str, declaration: &Declaration) -> Result<DataProfile, String> {
        (self.build)(identifier, declaration)
    }

    /// Declaration keys this variant does not understand.
    pub(crate) fn unrecognized_fields<'a>(&self, declaration: &'a Declaration) -> Vec<&'a str> {
        unrecognized_fields(declaration, self.fields)
            .into_iter()
            .filter(|key| *key != CREDENTIAL_KEY)
            .collect()
    }
}

/// Registered mapping from profile category to constructor.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    constructors: BTreeMap<String, ProfileConstructor>,
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog.register("basic", ProfileConstructor::of::<DatabaseBasicProfile>());
        catalog.register("basic-tcp", ProfileConstructor::of::<DatabaseBasicTcpProfile>());
        catalog.register("couchdb", ProfileConstructor::of::<CouchDbProfile>());
        catalog.register("mongodb-atlas", ProfileConstructor::of::<MongoDbAtlasProfile>());
        catalog.register("snowflake", ProfileConstructor::of::<SnowflakeProfile>());
        catalog
    }
}

impl ProfileCatalog {
    /// A catalog with no categories registered.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Register `constructor` for `category`, returning the one it replaces.
    pub fn register(
        &mut self,
        category: impl Into<String>,
        constructor: ProfileConstructor,
    ) -> Option<ProfileConstructor> {
        self.constructors.insert(category.into(), constructor)
    }

    pub fn get(&self, category: &str) -> Option<&ProfileConstructor> {
        self.constructors.get(category)
    }

    /// Registered categories, sorted.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}
