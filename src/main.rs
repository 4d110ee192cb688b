use std::sync::Arc;

use anyhow::Context;

use storefront::{app, config::AppConfig, db, state::AppState, users};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "storefront=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    let pool = db::connect(&config).await?;
    db::migrate(&pool).await?;

    let state = AppState::postgres(pool, config.clone())?;

    match &config.admin {
        Some(seed) => {
            users::services::seed_admin(state.users.as_ref(), &state.hasher, seed)
                .await
                .context("seed admin user")?;
        }
        None => tracing::warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set; skipping admin seeding"),
    }

    app::serve(app::build_app(state)).await
}
