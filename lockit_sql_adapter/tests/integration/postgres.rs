use chrono::{Duration, Utc};
use lockit_sql_adapter::{UserError, UserKey, UserSearchField, UserStore};
use serial_test::serial;

use crate::common::{TestUser, postgres_config};

/// Full lifecycle against PostgreSQL; skipped unless `LOCKIT_TEST_POSTGRES_URL` is set
#[tokio::test]
#[serial]
async fn test_postgres_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let Some(config) = postgres_config() else {
        eprintln!("LOCKIT_TEST_POSTGRES_URL not set, skipping PostgreSQL lifecycle test");
        return Ok(());
    };

    let store = UserStore::connect(&config).await?;
    store.init().await?;

    let user = TestUser::unique("pg");
    let saved = store.save(&user.name, &user.email, &user.password).await?;
    assert_eq!(saved.failed_login_attempts, 0);
    assert_eq!(saved.email_verified, None);
    assert_eq!(
        saved.signup_token_expires - saved.signup_timestamp,
        Duration::days(1)
    );

    let by_token = store
        .find(&UserSearchField::SignupToken(saved.signup_token.clone()))
        .await?;
    assert_eq!(by_token.as_ref(), Some(&saved));

    let mut changed = saved.clone();
    changed.email_verified = Some(true);
    changed.pwd_reset_token = Some("reset".to_string());
    changed.pwd_reset_token_expires = Some(Utc::now() + Duration::hours(1));
    let updated = store.update(&changed).await?;
    assert_eq!(updated.email_verified, Some(true));
    assert_eq!(updated.pwd_reset_token.as_deref(), Some("reset"));

    let mut ghost = updated.clone();
    ghost.id = Some(i64::MAX);
    assert!(matches!(
        store.update(&ghost).await,
        Err(UserError::NotFound(UserKey::Id(i64::MAX)))
    ));

    assert!(store.remove(&user.name).await?);
    assert!(store
        .find(&UserSearchField::Name(user.name.clone()))
        .await?
        .is_none());
    assert!(matches!(
        store.remove(&user.name).await,
        Err(UserError::NotFound(_))
    ));

    store.close().await;
    Ok(())
}

/// Mixed-case table names are folded by PostgreSQL and still validate
#[tokio::test]
#[serial]
async fn test_postgres_mixed_case_table_name() -> Result<(), Box<dyn std::error::Error>> {
    let Some(mut config) = postgres_config() else {
        eprintln!("LOCKIT_TEST_POSTGRES_URL not set, skipping PostgreSQL mixed-case test");
        return Ok(());
    };
    config.db.collection = "LockitUsers".to_string();

    let store = UserStore::connect(&config).await?;
    // Re-running init validates the table under its folded name
    store.init().await?;

    let user = TestUser::unique("pg-mixed");
    let saved = store.save(&user.name, &user.email, &user.password).await?;
    let found = store
        .find(&UserSearchField::Email(user.email.clone()))
        .await?;
    assert_eq!(found, Some(saved));

    assert!(store.remove(&user.name).await?);
    store.close().await;
    Ok(())
}
