use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::storage::{DataStore, DataStoreKind, connect_data_store, validate_table_name};
use crate::userdb::{
    errors::{UserError, UserKey},
    password::hash_password,
    types::{User, UserSearchField},
};

use super::mysql::*;
use super::postgres::*;
use super::sqlite::*;

/// SQL backed user store for lockit.
///
/// Construction through [`UserStore::connect`] only completes once the users
/// table exists and has the expected columns, so every operation runs against
/// a ready schema. The store is `Send + Sync`; share it behind an `Arc`.
#[derive(Debug)]
pub struct UserStore {
    store: Box<dyn DataStore>,
    table_name: String,
    token_expiration: TimeDelta,
}

impl UserStore {
    /// Connect to the configured database and synchronize the users table
    #[tracing::instrument(skip(config), fields(table = %config.db.collection))]
    pub async fn connect(config: &Config) -> Result<Self, UserError> {
        validate_table_name(&config.db.collection)?;
        let token_expiration = config.token_expiration()?;
        if Utc::now().checked_add_signed(token_expiration).is_none() {
            return Err(UserError::Config(format!(
                "Signup token expiration '{}' is out of range",
                config.signup.token_expiration
            )));
        }

        let store = connect_data_store(&config.connection_url(), config.db.max_connections).await?;

        let user_store = Self {
            store,
            table_name: config.db.collection.clone(),
            token_expiration,
        };

        match user_store.init().await {
            Ok(()) => {
                tracing::info!(store_type = %user_store.store_kind(), "User store ready");
                Ok(user_store)
            }
            Err(e) => {
                tracing::error!(error = %e, "User store schema sync failed");
                Err(e)
            }
        }
    }

    /// Create the users table if it is missing and validate its columns
    pub async fn init(&self) -> Result<(), UserError> {
        let table_name = self.table_name.as_str();

        if let Some(pool) = self.store.as_sqlite() {
            create_tables_sqlite(pool, table_name).await?;
            validate_user_tables_sqlite(pool, table_name).await
        } else if let Some(pool) = self.store.as_postgres() {
            create_tables_postgres(pool, table_name).await?;
            validate_user_tables_postgres(pool, table_name).await
        } else if let Some(pool) = self.store.as_mysql() {
            create_tables_mysql(pool, table_name).await?;
            validate_user_tables_mysql(pool, table_name).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Name of the users table
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// How long signup tokens issued by [`UserStore::save`] stay valid
    pub fn token_expiration(&self) -> TimeDelta {
        self.token_expiration
    }

    /// Sign up a new user.
    ///
    /// Hashes the password, issues a signup token expiring after the
    /// configured window and returns the stored record with its id.
    #[tracing::instrument(skip(self, name, email, password), fields(user_name = %name))]
    pub async fn save(&self, name: &str, email: &str, password: &str) -> Result<User, UserError> {
        let hash = hash_password(password)?;

        let user = User::new_signup(
            name.to_string(),
            email.to_string(),
            hash.derived_key,
            hash.salt,
            Uuid::new_v4().to_string(),
            Utc::now(),
            self.token_expiration,
        )?;

        let result = self.insert_and_reload(&user).await;

        match &result {
            Ok(saved) => {
                tracing::info!(user_id = saved.id, "User saved");
            }
            Err(e) => {
                tracing::error!(error = %e, "User save failed");
            }
        }

        result
    }

    async fn insert_and_reload(&self, user: &User) -> Result<User, UserError> {
        let table_name = self.table_name.as_str();

        let reloaded = if let Some(pool) = self.store.as_sqlite() {
            let id = insert_user_sqlite(pool, table_name, user).await?;
            get_user_by_id_sqlite(pool, table_name, id).await?
        } else if let Some(pool) = self.store.as_postgres() {
            let id = insert_user_postgres(pool, table_name, user).await?;
            get_user_by_id_postgres(pool, table_name, id).await?
        } else if let Some(pool) = self.store.as_mysql() {
            let id = insert_user_mysql(pool, table_name, user).await?;
            get_user_by_id_mysql(pool, table_name, id).await?
        } else {
            return Err(UserError::Storage("Unsupported database type".to_string()));
        };

        reloaded.ok_or_else(|| UserError::Storage("Inserted user could not be read back".to_string()))
    }

    /// Look up the first user matching `field`; `Ok(None)` when there is none
    #[tracing::instrument(skip(self, field), fields(user_field = %field))]
    pub async fn find(&self, field: &UserSearchField) -> Result<Option<User>, UserError> {
        let table_name = self.table_name.as_str();

        let result = if let Some(pool) = self.store.as_sqlite() {
            get_user_by_field_sqlite(pool, table_name, field).await
        } else if let Some(pool) = self.store.as_postgres() {
            get_user_by_field_postgres(pool, table_name, field).await
        } else if let Some(pool) = self.store.as_mysql() {
            get_user_by_field_mysql(pool, table_name, field).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(Some(_)) => {
                tracing::info!(found = true, "User lookup completed");
            }
            Ok(None) => {
                tracing::info!(found = false, "User lookup completed - not found");
            }
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed");
            }
        }

        result
    }

    /// Look up a user by lockit field name (`"name"`, `"email"` or `"signupToken"`)
    pub async fn find_by(&self, field: &str, value: &str) -> Result<Option<User>, UserError> {
        let field = UserSearchField::from_field(field, value)?;
        self.find(&field).await
    }

    /// Overwrite the stored row with `user`, keyed by `user.id`.
    ///
    /// Every column except the id is replaced with the values on `user`, so
    /// callers should start from a record returned by this store.
    #[tracing::instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn update(&self, user: &User) -> Result<User, UserError> {
        let id = user
            .id
            .ok_or_else(|| UserError::InvalidData("Cannot update a user without an id".to_string()))?;

        let result = match self.update_row(id, user).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Err(UserError::NotFound(UserKey::Id(id))),
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => {
                tracing::info!("User update completed");
            }
            Err(e) => {
                tracing::error!(error = %e, "User update failed");
            }
        }

        result
    }

    async fn update_row(&self, id: i64, user: &User) -> Result<Option<User>, UserError> {
        let table_name = self.table_name.as_str();

        if let Some(pool) = self.store.as_sqlite() {
            update_user_sqlite(pool, table_name, id, user).await
        } else if let Some(pool) = self.store.as_postgres() {
            update_user_postgres(pool, table_name, id, user).await
        } else if let Some(pool) = self.store.as_mysql() {
            update_user_mysql(pool, table_name, id, user).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Delete the user called `name`
    #[tracing::instrument(skip(self, name), fields(user_name = %name))]
    pub async fn remove(&self, name: &str) -> Result<bool, UserError> {
        let user = self
            .find(&UserSearchField::Name(name.to_string()))
            .await?
            .ok_or_else(|| UserError::NotFound(UserKey::Name(name.to_string())))?;

        // Rows read back from the table always carry their id
        let id = user
            .id
            .ok_or_else(|| UserError::Storage(format!("Stored user \"{name}\" has no id")))?;
        let table_name = self.table_name.as_str();

        let deleted = if let Some(pool) = self.store.as_sqlite() {
            delete_user_sqlite(pool, table_name, id).await
        } else if let Some(pool) = self.store.as_postgres() {
            delete_user_postgres(pool, table_name, id).await
        } else if let Some(pool) = self.store.as_mysql() {
            delete_user_mysql(pool, table_name, id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }?;

        if deleted == 0 {
            // Removed by someone else between the lookup and the delete
            tracing::warn!(user_id = id, "User already gone");
            return Err(UserError::NotFound(UserKey::Name(name.to_string())));
        }

        tracing::info!(user_id = id, "User removed");
        Ok(true)
    }

    /// Close the underlying connection pool
    pub async fn close(&self) {
        if let Some(pool) = self.store.as_sqlite() {
            pool.close().await;
        } else if let Some(pool) = self.store.as_postgres() {
            pool.close().await;
        } else if let Some(pool) = self.store.as_mysql() {
            pool.close().await;
        }
    }

    pub(crate) fn store_kind(&self) -> DataStoreKind {
        self.store.kind()
    }
}
