//! lockit-sql-adapter - SQL user store for the lockit user-management toolkit
//!
//! Stores lockit user accounts in a single SQLite, PostgreSQL or MySQL table and
//! provides the operations lockit's signup, login and password-reset flows
//! rely on: [`UserStore::save`], [`UserStore::find`], [`UserStore::update`]
//! and [`UserStore::remove`].
//!
//! ```no_run
//! use lockit_sql_adapter::{Config, UserSearchField, UserStore};
//!
//! # async fn run() -> Result<(), lockit_sql_adapter::UserError> {
//! let config = Config::new("sqlite://", ":memory:", "my_user_table", "1 day");
//! let store = UserStore::connect(&config).await?;
//!
//! let john = store.save("john", "john@email.com", "secret").await?;
//! let found = store.find(&UserSearchField::Email("john@email.com".into())).await?;
//! assert_eq!(found.as_ref(), Some(&john));
//!
//! store.remove("john").await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod storage;
mod userdb;
mod utils;

#[cfg(test)]
mod test_utils;

pub use config::{Config, DbConfig, SignupConfig};
pub use userdb::{
    PasswordHash, User, UserError, UserKey, UserSearchField, UserStore, hash_password,
    verify_password,
};
pub use utils::{UtilError, parse_duration};
