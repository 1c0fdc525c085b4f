use chrono::{Duration, Utc};
use lockit_sql_adapter::{UserError, UserKey, UserSearchField, UserStore};
use serial_test::serial;

use crate::common::{TestUser, mysql_config};

/// Full lifecycle against MySQL; skipped unless `LOCKIT_TEST_MYSQL_URL` is set
#[tokio::test]
#[serial]
async fn test_mysql_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let Some(config) = mysql_config() else {
        eprintln!("LOCKIT_TEST_MYSQL_URL not set, skipping MySQL lifecycle test");
        return Ok(());
    };

    let store = UserStore::connect(&config).await?;
    store.init().await?;

    let user = TestUser::unique("mysql");
    let saved = store.save(&user.name, &user.email, &user.password).await?;
    assert!(saved.id.is_some());
    assert_eq!(saved.failed_login_attempts, 0);
    assert_eq!(saved.email_verified, None);
    assert_eq!(
        saved.signup_token_expires - saved.signup_timestamp,
        Duration::days(1)
    );

    let by_email = store
        .find(&UserSearchField::Email(user.email.clone()))
        .await?;
    assert_eq!(by_email.as_ref(), Some(&saved));

    // Writing back an unchanged record still finds the row
    let unchanged = store.update(&saved).await?;
    assert_eq!(unchanged, saved);

    let mut changed = saved.clone();
    changed.email_verified = Some(true);
    changed.account_locked = Some(false);
    changed.pwd_reset_token_expires = Some(Utc::now() + Duration::hours(1));
    let updated = store.update(&changed).await?;
    assert_eq!(updated.email_verified, Some(true));
    assert_eq!(updated.account_locked, Some(false));
    assert!(updated.pwd_reset_token_expires.is_some());

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
        Err(UserError::NotFound(UserKey::Name(_)))
    ));

    store.close().await;
    Ok(())
}
