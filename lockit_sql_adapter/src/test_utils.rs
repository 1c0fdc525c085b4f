//! Shared test setup for the crate's unit tests.
//!
//! By default every store gets its own in-memory SQLite database, so tests do
//! not see each other's rows. Setting `LOCKIT_TEST_DB_URL` and
//! `LOCKIT_TEST_DB_NAME` (directly or through `.env_test`) points the tests at
//! a shared database instead; names are made unique per test for that case.

use std::sync::Once;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::config::Config;
use crate::userdb::UserStore;

const TEST_TABLE: &str = "my_user_table";

/// Load `.env_test` (falling back to `.env`) once per test binary and clear
/// out a file based SQLite test database left over from an earlier run.
fn init_test_env() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }

        let url = test_config().connection_url();
        if let Some(db_path) = extract_sqlite_file_path_from_url(&url) {
            // Missing file is fine
            let _ = std::fs::remove_file(&db_path);
        }
    });
}

/// Configuration for the test database
pub(crate) fn test_config() -> Config {
    let url = std::env::var("LOCKIT_TEST_DB_URL").unwrap_or_else(|_| "sqlite://".to_string());
    let name = std::env::var("LOCKIT_TEST_DB_NAME").unwrap_or_else(|_| ":memory:".to_string());
    Config::new(&url, &name, TEST_TABLE, "1 day")
}

/// Connect a ready [`UserStore`] against the test database
pub(crate) async fn init_test_store() -> UserStore {
    init_test_env();
    UserStore::connect(&test_config())
        .await
        .expect("Failed to connect test UserStore")
}

/// Unique `(name, email)` pair for a test user
pub(crate) fn create_test_names(suffix: &str) -> (String, String) {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let timestamp = Utc::now().timestamp_millis();
    (
        format!("test-user-{suffix}-{timestamp}-{n}"),
        format!("user-{suffix}-{timestamp}-{n}@example.com"),
    )
}

/// Extract SQLite database file path from a database URL string
///
/// Supports `sqlite:/path/file.db`, `sqlite:./relative.db`, `sqlite:///abs.db`
/// and `sqlite:file:path?options`. Returns None for in-memory and non-SQLite
/// urls.
fn extract_sqlite_file_path_from_url(url: &str) -> Option<String> {
    let path = url.strip_prefix("sqlite:")?;

    let path_only = match path.strip_prefix("file:") {
        Some(file_path) => file_path.split('?').next()?,
        None => path.strip_prefix("//").unwrap_or(path),
    };

    if path_only.is_empty() || path_only.contains(":memory:") || url.contains("mode=memory") {
        return None;
    }
    Some(path_only.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_sqlite_file_path_from_url() {
        assert_eq!(
            extract_sqlite_file_path_from_url("sqlite:/tmp/test.db"),
            Some("/tmp/test.db".to_string())
        );
        assert_eq!(
            extract_sqlite_file_path_from_url("sqlite:./test.db"),
            Some("./test.db".to_string())
        );
        assert_eq!(
            extract_sqlite_file_path_from_url("sqlite:file:/tmp/test.db?mode=rwc"),
            Some("/tmp/test.db".to_string())
        );
        assert_eq!(
            extract_sqlite_file_path_from_url("sqlite:///tmp/test.db"),
            Some("/tmp/test.db".to_string())
        );
        assert_eq!(
            extract_sqlite_file_path_from_url("sqlite://lockit.db"),
            Some("lockit.db".to_string())
        );

        assert_eq!(extract_sqlite_file_path_from_url("sqlite://:memory:"), None);
        assert_eq!(extract_sqlite_file_path_from_url("sqlite::memory:"), None);
        assert_eq!(
            extract_sqlite_file_path_from_url("sqlite:file:lockit?mode=memory&cache=shared"),
            None
        );
        assert_eq!(
            extract_sqlite_file_path_from_url("postgresql://localhost/test"),
            None
        );
        assert_eq!(extract_sqlite_file_path_from_url(""), None);
        assert_eq!(extract_sqlite_file_path_from_url("sqlite://"), None);
    }

    #[test]
    fn test_create_test_names_are_unique() {
        let (first_name, first_email) = create_test_names("same");
        let (second_name, second_email) = create_test_names("same");

        assert_ne!(first_name, second_name);
        assert_ne!(first_email, second_email);
        assert!(first_email.ends_with("@example.com"));
    }
}
