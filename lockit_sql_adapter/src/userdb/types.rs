use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::errors::UserError;

/// A lockit user account as stored in the users table.
///
/// Serializes to the shape the rest of lockit expects: camelCase keys, the
/// primary key as `_id` and the password hash as `derived_key`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Database-assigned primary key, `None` until the row is inserted
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    /// Hex encoded PBKDF2 output
    #[serde(rename = "derived_key")]
    pub derived_key: String,
    /// Hex encoded salt the derived key was computed with
    pub salt: String,

    // signup
    pub signup_token: String,
    pub signup_timestamp: DateTime<Utc>,
    pub signup_token_expires: DateTime<Utc>,
    pub failed_login_attempts: i32,
    pub email_verification_timestamp: Option<DateTime<Utc>>,
    pub email_verified: Option<bool>,

    // forgot password
    pub pwd_reset_token: Option<String>,
    pub pwd_reset_token_expires: Option<DateTime<Utc>>,

    // login
    pub account_locked: Option<bool>,
    pub account_locked_until: Option<DateTime<Utc>>,
    pub previous_login_time: Option<DateTime<Utc>>,
    pub previous_login_ip: Option<String>,
    pub current_login_time: Option<DateTime<Utc>>,
    pub current_login_ip: Option<String>,
}

impl User {
    /// Build a freshly signed-up user that has not been stored yet.
    ///
    /// The signup token expires `token_expiration` after `now`; every
    /// verification, reset and login field starts out unset. An expiration
    /// that pushes the timestamp out of range is a `UserError::Config`.
    pub fn new_signup(
        name: String,
        email: String,
        derived_key: String,
        salt: String,
        signup_token: String,
        now: DateTime<Utc>,
        token_expiration: TimeDelta,
    ) -> Result<Self, UserError> {
        let signup_token_expires = now.checked_add_signed(token_expiration).ok_or_else(|| {
            UserError::Config(format!(
                "Signup token expiration of {} seconds is out of range",
                token_expiration.num_seconds()
            ))
        })?;

        Ok(Self {
            id: None,
            name,
            email,
            derived_key,
            salt,
            signup_token,
            signup_timestamp: now,
            signup_token_expires,
            failed_login_attempts: 0,
            email_verification_timestamp: None,
            email_verified: None,
            pwd_reset_token: None,
            pwd_reset_token_expires: None,
            account_locked: None,
            account_locked_until: None,
            previous_login_time: None,
            previous_login_ip: None,
            current_login_time: None,
            current_login_ip: None,
        })
    }

    /// Whether the signup token is past its expiration at `now`
    pub fn is_signup_token_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.signup_token_expires
    }
}

/// Columns a user can be looked up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSearchField {
    Name(String),
    Email(String),
    SignupToken(String),
}

impl UserSearchField {
    /// Build a search field from a lockit field name and the value to match.
    ///
    /// Accepts `"name"`, `"email"` and `"signupToken"` (or `"signup_token"`).
    pub fn from_field(field: &str, value: impl Into<String>) -> Result<Self, UserError> {
        match field {
            "name" => Ok(Self::Name(value.into())),
            "email" => Ok(Self::Email(value.into())),
            "signupToken" | "signup_token" => Ok(Self::SignupToken(value.into())),
            other => Err(UserError::InvalidData(format!(
                "Cannot look up users by '{other}', expected one of name, email, signupToken"
            ))),
        }
    }

    /// Column the field maps to in the users table
    pub(crate) fn column(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Email(_) => "email",
            Self::SignupToken(_) => "signup_token",
        }
    }

    pub(crate) fn value(&self) -> &str {
        match self {
            Self::Name(v) | Self::Email(v) | Self::SignupToken(v) => v,
        }
    }
}

impl fmt::Display for UserSearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the column; values can be emails or live tokens
        write!(f, "{}", self.column())
    }
}
