//! Data store connection setup

use std::str::FromStr;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::types::{DataStore, DataStoreKind, MySqlDataStore, PostgresDataStore, SqliteDataStore};
use crate::storage::errors::StorageError;

/// Open a pool for `url`, choosing the backend from its scheme.
///
/// In-memory SQLite databases live only as long as a connection to them, so
/// they are held on a single connection that never idles out.
pub(crate) async fn connect_data_store(
    url: &str,
    max_connections: u32,
) -> Result<Box<dyn DataStore>, StorageError> {
    let kind = DataStoreKind::from_url(url)?;

    tracing::info!(store_type = %kind, max_connections, "Initializing data store");

    let store = match kind {
        DataStoreKind::Sqlite => {
            let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

            let pool_options = if is_in_memory_sqlite(url) {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
            } else {
                SqlitePoolOptions::new().max_connections(max_connections)
            };

            Box::new(SqliteDataStore {
                pool: pool_options.connect_with(opts).await?,
            }) as Box<dyn DataStore>
        }
        DataStoreKind::Postgres => Box::new(PostgresDataStore {
            pool: PgPoolOptions::new()
                .max_connections(max_connections)
                .connect(url)
                .await?,
        }) as Box<dyn DataStore>,
        DataStoreKind::MySql => Box::new(MySqlDataStore {
            pool: MySqlPoolOptions::new()
                .max_connections(max_connections)
                .connect(url)
                .await?,
        }) as Box<dyn DataStore>,
    };

    tracing::info!(store_type = %kind, "Connected to database");

    Ok(store)
}

fn is_in_memory_sqlite(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
