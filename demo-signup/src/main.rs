use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lockit_sql_adapter::{Config, UserSearchField, UserStore, verify_password};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,lockit_sql_adapter=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let store = UserStore::connect(&config).await?;

    let user = store.save("john", "john@x.com", "secret").await?;
    tracing::info!(name = %user.name, expires = %user.signup_token_expires, "Signed up");

    // Simulate the user clicking the link in the verification email
    let Some(mut pending) = store
        .find(&UserSearchField::SignupToken(user.signup_token.clone()))
        .await?
    else {
        return Err("signup token lookup returned nothing".into());
    };

    if pending.is_signup_token_expired(Utc::now()) {
        tracing::warn!("Signup token already expired");
    } else {
        pending.email_verified = Some(true);
        pending.email_verification_timestamp = Some(Utc::now());
        pending = store.update(&pending).await?;
        tracing::info!(name = %pending.name, "Email verified");
    }

    let login_ok = verify_password("secret", &pending.salt, &pending.derived_key);
    let wrong_ok = verify_password("guess", &pending.salt, &pending.derived_key);
    tracing::info!(login_ok, wrong_ok, "Password checks");

    store.remove("john").await?;
    store.close().await;
    Ok(())
}
