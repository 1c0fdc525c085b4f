use sqlx::{Pool, Sqlite};

use crate::storage::validate_sqlite_table_schema;
use crate::userdb::{
    errors::UserError,
    types::{User, UserSearchField},
};

pub(super) async fn create_tables_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
) -> Result<(), UserError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            derived_key TEXT NOT NULL,
            salt TEXT NOT NULL,
            signup_token TEXT NOT NULL,
            signup_timestamp TIMESTAMP NOT NULL,
            signup_token_expires TIMESTAMP NOT NULL,
            failed_login_attempts INTEGER NOT NULL DEFAULT 0,
            email_verification_timestamp TIMESTAMP,
            email_verified BOOLEAN,
            pwd_reset_token TEXT,
            pwd_reset_token_expires TIMESTAMP,
            account_locked BOOLEAN,
            account_locked_until TIMESTAMP,
            previous_login_time TIMESTAMP,
            previous_login_ip TEXT,
            current_login_time TIMESTAMP,
            current_login_ip TEXT
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

/// Validates that the users table schema matches what we expect
pub(super) async fn validate_user_tables_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
) -> Result<(), UserError> {
    let expected_columns = [
        ("id", "INTEGER"),
        ("name", "TEXT"),
        ("email", "TEXT"),
        ("derived_key", "TEXT"),
        ("salt", "TEXT"),
        ("signup_token", "TEXT"),
        ("signup_timestamp", "TIMESTAMP"),
        ("signup_token_expires", "TIMESTAMP"),
        ("failed_login_attempts", "INTEGER"),
        ("email_verification_timestamp", "TIMESTAMP"),
        ("email_verified", "BOOLEAN"),
        ("pwd_reset_token", "TEXT"),
        ("pwd_reset_token_expires", "TIMESTAMP"),
        ("account_locked", "BOOLEAN"),
        ("account_locked_until", "TIMESTAMP"),
        ("previous_login_time", "TIMESTAMP"),
        ("previous_login_ip", "TEXT"),
        ("current_login_time", "TIMESTAMP"),
        ("current_login_ip", "TEXT"),
    ];

    validate_sqlite_table_schema(pool, table_name, &expected_columns, UserError::Storage).await
}

/// Insert a new user and return the id SQLite assigned to it
pub(super) async fn insert_user_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    user: &User,
) -> Result<i64, UserError> {
    let result = sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (
            name, email, derived_key, salt,
            signup_token, signup_timestamp, signup_token_expires, failed_login_attempts,
            email_verification_timestamp, email_verified,
            pwd_reset_token, pwd_reset_token_expires,
            account_locked, account_locked_until,
            previous_login_time, previous_login_ip, current_login_time, current_login_ip
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#
    ))
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.derived_key)
    .bind(&user.salt)
    .bind(&user.signup_token)
    .bind(user.signup_timestamp)
    .bind(user.signup_token_expires)
    .bind(user.failed_login_attempts)
    .bind(user.email_verification_timestamp)
    .bind(user.email_verified)
    .bind(&user.pwd_reset_token)
    .bind(user.pwd_reset_token_expires)
    .bind(user.account_locked)
    .bind(user.account_locked_until)
    .bind(user.previous_login_time)
    .bind(&user.previous_login_ip)
    .bind(user.current_login_time)
    .bind(&user.current_login_ip)
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(result.last_insert_rowid())
}

pub(super) async fn get_user_by_id_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    id: i64,
) -> Result<Option<User>, UserError> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn get_user_by_field_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    field: &UserSearchField,
) -> Result<Option<User>, UserError> {
    // The column comes from a closed enum, never from caller input
    let column = field.column();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE {column} = ? ORDER BY id ASC LIMIT 1
        "#
    ))
    .bind(field.value())
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

/// Overwrite every column of the row with `id`; `None` when no such row exists
pub(super) async fn update_user_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    id: i64,
    user: &User,
) -> Result<Option<User>, UserError> {
    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET
            name = ?,
            email = ?,
            derived_key = ?,
            salt = ?,
            signup_token = ?,
            signup_timestamp = ?,
            signup_token_expires = ?,
            failed_login_attempts = ?,
            email_verification_timestamp = ?,
            email_verified = ?,
            pwd_reset_token = ?,
            pwd_reset_token_expires = ?,
            account_locked = ?,
            account_locked_until = ?,
            previous_login_time = ?,
            previous_login_ip = ?,
            current_login_time = ?,
            current_login_ip = ?
        WHERE id = ?
        "#
    ))
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.derived_key)
    .bind(&user.salt)
    .bind(&user.signup_token)
    .bind(user.signup_timestamp)
    .bind(user.signup_token_expires)
    .bind(user.failed_login_attempts)
    .bind(user.email_verification_timestamp)
    .bind(user.email_verified)
    .bind(&user.pwd_reset_token)
    .bind(user.pwd_reset_token_expires)
    .bind(user.account_locked)
    .bind(user.account_locked_until)
    .bind(user.previous_login_time)
    .bind(&user.previous_login_ip)
    .bind(user.current_login_time)
    .bind(&user.current_login_ip)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_user_by_id_sqlite(pool, table_name, id).await
}

pub(super) async fn delete_user_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    id: i64,
) -> Result<u64, UserError> {
    let result = sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE id = ?
        "#
    ))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(result.rows_affected())
}
