use std::fmt;

use sqlx::{MySql, MySqlPool, PgPool, Pool, Postgres, Sqlite, SqlitePool};

use crate::storage::errors::StorageError;

/// Database backend selected from the connection url scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataStoreKind {
    Sqlite,
    Postgres,
    MySql,
}

impl DataStoreKind {
    pub(crate) fn from_url(url: &str) -> Result<Self, StorageError> {
        if url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Self::Postgres)
        } else if url.starts_with("mysql://") {
            Ok(Self::MySql)
        } else {
            // Only the scheme goes into the error, urls may carry credentials
            let scheme = url.split(':').next().unwrap_or_default();
            Err(StorageError::UnsupportedUrl(scheme.to_string()))
        }
    }
}

impl fmt::Display for DataStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Postgres => write!(f, "postgres"),
            Self::MySql => write!(f, "mysql"),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct SqliteDataStore {
    pub(super) pool: SqlitePool,
}

#[derive(Clone, Debug)]
pub(crate) struct PostgresDataStore {
    pub(super) pool: PgPool,
}

#[derive(Clone, Debug)]
pub(crate) struct MySqlDataStore {
    pub(super) pool: MySqlPool,
}

/// A connected pool for one of the supported backends.
pub(crate) trait DataStore: Send + Sync + fmt::Debug {
    fn kind(&self) -> DataStoreKind;
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>>;
    fn as_postgres(&self) -> Option<&Pool<Postgres>>;
    fn as_mysql(&self) -> Option<&Pool<MySql>>;
}

impl DataStore for SqliteDataStore {
    fn kind(&self) -> DataStoreKind {
        DataStoreKind::Sqlite
    }

    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        Some(&self.pool)
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        None
    }

    fn as_mysql(&self) -> Option<&Pool<MySql>> {
        None
    }
}

impl DataStore for PostgresDataStore {
    fn kind(&self) -> DataStoreKind {
        DataStoreKind::Postgres
    }

    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        None
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        Some(&self.pool)
    }

    fn as_mysql(&self) -> Option<&Pool<MySql>> {
        None
    }
}

impl DataStore for MySqlDataStore {
    fn kind(&self) -> DataStoreKind {
        DataStoreKind::MySql
    }

    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        None
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        None
    }

    fn as_mysql(&self) -> Option<&Pool<MySql>> {
        Some(&self.pool)
    }
}
