use sqlx::{MySql, Pool};

use crate::storage::validate_mysql_table_schema;
use crate::userdb::{
    errors::UserError,
    types::{User, UserSearchField},
};

pub(super) async fn create_tables_mysql(
    pool: &Pool<MySql>,
    table_name: &str,
) -> Result<(), UserError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            derived_key VARCHAR(255) NOT NULL,
            salt VARCHAR(255) NOT NULL,
            signup_token VARCHAR(255) NOT NULL,
            signup_timestamp DATETIME(6) NOT NULL,
            signup_token_expires DATETIME(6) NOT NULL,
            failed_login_attempts INT NOT NULL DEFAULT 0,
            email_verification_timestamp DATETIME(6),
            email_verified BOOLEAN,
            pwd_reset_token VARCHAR(255),
            pwd_reset_token_expires DATETIME(6),
            account_locked BOOLEAN,
            account_locked_until DATETIME(6),
            previous_login_time DATETIME(6),
            previous_login_ip VARCHAR(255),
            current_login_time DATETIME(6),
            current_login_ip VARCHAR(255)
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

/// Validates that the users table schema matches what we expect
pub(super) async fn validate_user_tables_mysql(
    pool: &Pool<MySql>,
    table_name: &str,
) -> Result<(), UserError> {
    // BOOLEAN is an alias MySQL stores as tinyint
    let expected_columns = [
        ("id", "bigint"),
        ("name", "varchar"),
        ("email", "varchar"),
        ("derived_key", "varchar"),
        ("salt", "varchar"),
        ("signup_token", "varchar"),
        ("signup_timestamp", "datetime"),
        ("signup_token_expires", "datetime"),
        ("failed_login_attempts", "int"),
        ("email_verification_timestamp", "datetime"),
        ("email_verified", "tinyint"),
        ("pwd_reset_token", "varchar"),
        ("pwd_reset_token_expires", "datetime"),
        ("account_locked", "tinyint"),
        ("account_locked_until", "datetime"),
        ("previous_login_time", "datetime"),
        ("previous_login_ip", "varchar"),
        ("current_login_time", "datetime"),
        ("current_login_ip", "varchar"),
    ];

    validate_mysql_table_schema(pool, table_name, &expected_columns, UserError::Storage).await
}

/// Insert a new user and return the id MySQL assigned to it
pub(super) async fn insert_user_mysql(
    pool: &Pool<MySql>,
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

    i64::try_from(result.last_insert_id())
        .map_err(|_| UserError::Storage("Inserted id does not fit in i64".to_string()))
}

pub(super) async fn get_user_by_id_mysql(
    pool: &Pool<MySql>,
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

pub(super) async fn get_user_by_field_mysql(
    pool: &Pool<MySql>,
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
pub(super) async fn update_user_mysql(
    pool: &Pool<MySql>,
    table_name: &str,
    id: i64,
    user: &User,
) -> Result<Option<User>, UserError> {
    sqlx::query(&format!(
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

    // MySQL counts changed rows, not matched ones
    get_user_by_id_mysql(pool, table_name, id).await
}

pub(super) async fn delete_user_mysql(
    pool: &Pool<MySql>,
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
