use std::path::Path;

use tracing::info;

use lab_cms_api::config::AppConfig;
use lab_cms_api::database::{migrations, DbManager};
use lab_cms_api::repository::RepositoryFactory;
use lab_cms_api::{handlers, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and friends.
    let _ = dotenvy::dotenv();

    let config = AppConfig::load();
    config.validate()?;
    logging::init(&config);

    info!(
        port = config.port,
        env = ?config.environment,
        database = %config.database.path,
        "starting lab-cms-api"
    );

    ensure_data_dir(&config.database.path)?;

    let manager = DbManager::connect(&config.database).await?;
    migrations::run(manager.pool()).await?;
    info!("database migrations completed");

    let factory = RepositoryFactory::new(manager);
    let app = handlers::router(factory.clone(), &config);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(address = %bind_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    factory.close().await;
    info!("server exited");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install shutdown signal handler");
    info!("shutdown signal received");
}

/// Create the parent directory for the database file if needed.
fn ensure_data_dir(db_path: &str) -> anyhow::Result<()> {
    if let Some(dir) = Path::new(db_path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}
