//! SQL injection attempts through user supplied values and table names

use lockit_sql_adapter::{UserError, UserSearchField, UserStore};

use crate::common::{TestUser, sqlite_memory_config, sqlite_store};

const PAYLOADS: &[&str] = &[
    "' OR '1'='1",
    "'; DROP TABLE my_user_table; --",
    "\" OR 1=1 --",
    "x' UNION SELECT * FROM sqlite_master --",
    "name'--",
];

/// Lookups treat injection payloads as literal values
#[tokio::test]
async fn test_security_find_with_injection_payloads() -> Result<(), Box<dyn std::error::Error>> {
    let store = sqlite_store().await;
    let victim = TestUser::unique("victim");
    store.save(&victim.name, &victim.email, &victim.password).await?;

    for payload in PAYLOADS {
        for field in ["name", "email", "signupToken"] {
            let found = store.find_by(field, payload).await?;
            assert!(found.is_none(), "payload {payload:?} on {field} matched a row");
        }
    }

    // The table is still intact
    let still_there = store.find(&UserSearchField::Name(victim.name.clone())).await?;
    assert!(still_there.is_some());

    Ok(())
}

/// Payloads stored as values come back byte for byte
#[tokio::test]
async fn test_security_payloads_stored_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let store = sqlite_store().await;

    for (i, payload) in PAYLOADS.iter().enumerate() {
        let email = format!("payload{i}@example.com");
        let saved = store.save(payload, &email, payload).await?;
        assert_eq!(saved.name, *payload);

        let found = store
            .find(&UserSearchField::Email(email.clone()))
            .await?
            .ok_or("payload user should be found")?;
        assert_eq!(found.name, *payload);

        assert!(store.remove(payload).await?);
    }

    Ok(())
}

/// Remove with a payload only deletes a row whose name equals it
#[tokio::test]
async fn test_security_remove_with_injection_payload() -> Result<(), Box<dyn std::error::Error>> {
    let store = sqlite_store().await;
    let victim = TestUser::unique("victim");
    store.save(&victim.name, &victim.email, &victim.password).await?;

    let result = store.remove("' OR '1'='1").await;
    assert!(matches!(result, Err(UserError::NotFound(_))));

    let still_there = store.find(&UserSearchField::Name(victim.name.clone())).await?;
    assert!(still_there.is_some());

    Ok(())
}

/// Table names are validated before they reach any SQL statement
#[tokio::test]
async fn test_security_table_name_injection_rejected() {
    for collection in [
        "users; DROP TABLE users",
        "users--",
        "users WHERE 1=1",
        "\"users\"",
        "1users",
        "",
    ] {
        let mut config = sqlite_memory_config();
        config.db.collection = collection.to_string();

        let result = UserStore::connect(&config).await;
        assert!(
            matches!(result, Err(UserError::InvalidData(_))),
            "collection {collection:?} was accepted"
        );
    }
}
