use sqlx::{Pool, Postgres};

use crate::storage::validate_postgres_table_schema;
use crate::userdb::{
    errors::UserError,
    types::{User, UserSearchField},
};

pub(super) async fn create_tables_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<(), UserError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            derived_key TEXT NOT NULL,
            salt TEXT NOT NULL,
            signup_token TEXT NOT NULL,
            signup_timestamp TIMESTAMPTZ NOT NULL,
            signup_token_expires TIMESTAMPTZ NOT NULL,
            failed_login_attempts INTEGER NOT NULL DEFAULT 0,
            email_verification_timestamp TIMESTAMPTZ,
            email_verified BOOLEAN,
            pwd_reset_token TEXT,
            pwd_reset_token_expires TIMESTAMPTZ,
            account_locked BOOLEAN,
            account_locked_until TIMESTAMPTZ,
            previous_login_time TIMESTAMPTZ,
            previous_login_ip TEXT,
            current_login_time TIMESTAMPTZ,
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
pub(super) async fn validate_user_tables_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<(), UserError> {
    let expected_columns = [
        ("id", "bigint"),
        ("name", "text"),
        ("email", "text"),
        ("derived_key", "text"),
        ("salt", "text"),
        ("signup_token", "text"),
        ("signup_timestamp", "timestamp with time zone"),
        ("signup_token_expires", "timestamp with time zone"),
        ("failed_login_attempts", "integer"),
        ("email_verification_timestamp", "timestamp with time zone"),
        ("email_verified", "boolean"),
        ("pwd_reset_token", "text"),
        ("pwd_reset_token_expires", "timestamp with time zone"),
        ("account_locked", "boolean"),
        ("account_locked_until", "timestamp with time zone"),
        ("previous_login_time", "timestamp with time zone"),
        ("previous_login_ip", "text"),
        ("current_login_time", "timestamp with time zone"),
        ("current_login_ip", "text"),
    ];

    validate_postgres_table_schema(pool, table_name, &expected_columns, UserError::Storage).await
}

/// Insert a new user and return the id PostgreSQL assigned to it
pub(super) async fn insert_user_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    user: &User,
) -> Result<i64, UserError> {
    sqlx::query_scalar::<_, i64>(&format!(
        r#"
        INSERT INTO {table_name} (
            name, email, derived_key, salt,
            signup_token, signup_timestamp, signup_token_expires, failed_login_attempts,
            email_verification_timestamp, email_verified,
            pwd_reset_token, pwd_reset_token_expires,
            account_locked, account_locked_until,
            previous_login_time, previous_login_ip, current_login_time, current_login_ip
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
        RETURNING id
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
    .fetch_one(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn get_user_by_id_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    id: i64,
) -> Result<Option<User>, UserError> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn get_user_by_field_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    field: &UserSearchField,
) -> Result<Option<User>, UserError> {
    // The column comes from a closed enum, never from caller input
    let column = field.column();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE {column} = $1 ORDER BY id ASC LIMIT 1
        "#
    ))
    .bind(field.value())
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

/// Overwrite every column of the row with `id`; `None` when no such row exists
pub(super) async fn update_user_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    id: i64,
    user: &User,
) -> Result<Option<User>, UserError> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE {table_name} SET
            name = $1,
            email = $2,
            derived_key = $3,
            salt = $4,
            signup_token = $5,
            signup_timestamp = $6,
            signup_token_expires = $7,
            failed_login_attempts = $8,
            email_verification_timestamp = $9,
            email_verified = $10,
            pwd_reset_token = $11,
            pwd_reset_token_expires = $12,
            account_locked = $13,
            account_locked_until = $14,
            previous_login_time = $15,
            previous_login_ip = $16,
            current_login_time = $17,
            current_login_ip = $18
        WHERE id = $19
        RETURNING *
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
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn delete_user_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    id: i64,
) -> Result<u64, UserError> {
    let result = sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE id = $1
        "#
    ))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(result.rows_affected())
}
