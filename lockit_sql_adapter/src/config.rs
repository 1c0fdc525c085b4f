//! Adapter configuration

use std::env;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::userdb::UserError;
use crate::utils::parse_duration;

const DEFAULT_COLLECTION: &str = "users";
const DEFAULT_TOKEN_EXPIRATION: &str = "1 day";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration consumed by [`crate::UserStore::connect`].
///
/// Mirrors the lockit configuration object:
///
/// ```json
/// {
///   "db": { "url": "sqlite://", "name": ":memory:", "collection": "my_user_table" },
///   "signup": { "tokenExpiration": "1 day" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub db: DbConfig,
    pub signup: SignupConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbConfig {
    /// Connection url prefix, e.g. `postgres://postgres:@127.0.0.1:5432/`
    pub url: String,
    /// Database name appended to `url`
    pub name: String,
    /// Users table name
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupConfig {
    /// Human readable signup token lifetime such as `"1 day"` or `"2 hours"`
    #[serde(default = "default_token_expiration")]
    pub token_expiration: String,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_token_expiration() -> String {
    DEFAULT_TOKEN_EXPIRATION.to_string()
}

impl Config {
    pub fn new(url: &str, name: &str, collection: &str, token_expiration: &str) -> Self {
        Self {
            db: DbConfig {
                url: url.to_string(),
                name: name.to_string(),
                collection: collection.to_string(),
                max_connections: DEFAULT_MAX_CONNECTIONS,
            },
            signup: SignupConfig {
                token_expiration: token_expiration.to_string(),
            },
        }
    }

    /// Parse a lockit style JSON configuration
    pub fn from_json(json: &str) -> Result<Self, UserError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the configuration from `LOCKIT_*` environment variables.
    ///
    /// `LOCKIT_DB_URL` and `LOCKIT_DB_NAME` are required. `LOCKIT_DB_COLLECTION`,
    /// `LOCKIT_DB_MAX_CONNECTIONS` and `LOCKIT_SIGNUP_TOKEN_EXPIRATION` fall back
    /// to `users`, 5 and `1 day`.
    pub fn from_env() -> Result<Self, UserError> {
        let url = required_env("LOCKIT_DB_URL")?;
        let name = required_env("LOCKIT_DB_NAME")?;
        let collection = env::var("LOCKIT_DB_COLLECTION").unwrap_or_else(|_| default_collection());
        let max_connections = match env::var("LOCKIT_DB_MAX_CONNECTIONS") {
            Ok(v) => v.parse::<u32>().map_err(|_| {
                UserError::Config(format!("LOCKIT_DB_MAX_CONNECTIONS must be a number, got '{v}'"))
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };
        let token_expiration = env::var("LOCKIT_SIGNUP_TOKEN_EXPIRATION")
            .unwrap_or_else(|_| default_token_expiration());

        Ok(Self {
            db: DbConfig {
                url,
                name,
                collection,
                max_connections,
            },
            signup: SignupConfig { token_expiration },
        })
    }

    /// Connection string: the database name appended to the url
    pub fn connection_url(&self) -> String {
        format!("{}{}", self.db.url, self.db.name)
    }

    /// Parsed signup token lifetime
    pub fn token_expiration(&self) -> Result<TimeDelta, UserError> {
        Ok(parse_duration(&self.signup.token_expiration)?)
    }
}

fn required_env(key: &str) -> Result<String, UserError> {
    env::var(key).map_err(|_| UserError::Config(format!("{key} must be set")))
}
