use std::sync::Once;

use lockit_sql_adapter::{Config, UserStore};

pub const TEST_TABLE: &str = "my_user_table";
pub const TEST_TOKEN_EXPIRATION: &str = "1 day";

/// Install a test subscriber once so `RUST_LOG=debug cargo test` shows store logs
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Configuration for a private in-memory SQLite database
pub fn sqlite_memory_config() -> Config {
    Config::new("sqlite://", ":memory:", TEST_TABLE, TEST_TOKEN_EXPIRATION)
}

/// Connect a store on a fresh in-memory SQLite database
pub async fn sqlite_store() -> UserStore {
    init_tracing();
    UserStore::connect(&sqlite_memory_config())
        .await
        .expect("Failed to connect in-memory store")
}

/// Configuration for the PostgreSQL test database, if one is configured.
///
/// `LOCKIT_TEST_POSTGRES_URL` is the url prefix (e.g.
/// `postgres://postgres:@127.0.0.1:5432/`) and `LOCKIT_TEST_POSTGRES_DB`
/// the database name, defaulting to `users`.
pub fn postgres_config() -> Option<Config> {
    init_tracing();
    let url = std::env::var("LOCKIT_TEST_POSTGRES_URL").ok()?;
    let name = std::env::var("LOCKIT_TEST_POSTGRES_DB").unwrap_or_else(|_| "users".to_string());
    Some(Config::new(&url, &name, TEST_TABLE, TEST_TOKEN_EXPIRATION))
}

/// Configuration for the MySQL test database, if one is configured.
///
/// `LOCKIT_TEST_MYSQL_URL` is the url prefix (e.g.
/// `mysql://travis:@127.0.0.1:3306/`) and `LOCKIT_TEST_MYSQL_DB` the
/// database name, defaulting to `users`.
pub fn mysql_config() -> Option<Config> {
    init_tracing();
    let url = std::env::var("LOCKIT_TEST_MYSQL_URL").ok()?;
    let name = std::env::var("LOCKIT_TEST_MYSQL_DB").unwrap_or_else(|_| "users".to_string());
    Some(Config::new(&url, &name, TEST_TABLE, TEST_TOKEN_EXPIRATION))
}

/// A named test account
#[derive(Debug, Clone)]
pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl TestUser {
    /// The account used throughout the lockit documentation
    pub fn john() -> Self {
        Self {
            name: "john".to_string(),
            email: "john@x.com".to_string(),
            password: "secret".to_string(),
        }
    }

    /// An account with names unique to this process run
    pub fn unique(label: &str) -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self {
            name: format!("{label}-{suffix}"),
            email: format!("{label}-{suffix}@example.com"),
            password: format!("pw-{label}"),
        }
    }
}
