//! Shramic CMS server

use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shramic_cms::{
    config::Config,
    db,
    services::seed_defaults,
    web::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shramic_cms=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Shramic CMS...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    db::ping(&pool).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    let applied = db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed ({} applied)", applied);

    // Seed default data
    let report = seed_defaults(&pool, &config.seed).await?;
    if report.is_empty() {
        tracing::info!("Seed data already present");
    } else {
        tracing::info!(
            "Seeded defaults: admin={}, settings={}, categories={}, statistics={}",
            report.admin_created,
            report.settings_created,
            report.categories_created,
            report.statistics_created
        );
    }
    if let Some(password) = &report.generated_password {
        tracing::warn!(
            "Created admin user '{}' with generated password: {} (change it after first login)",
            config.seed.admin_username,
            password
        );
    }

    // Upload directory
    std::fs::create_dir_all(&config.upload.path).with_context(|| {
        format!("Failed to create upload directory: {:?}", config.upload.path)
    })?;

    // Templates, services and sessions
    let state = AppState::build(pool, &config)?;
    tracing::info!("Templates loaded");

    // Build router
    let app = web::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
