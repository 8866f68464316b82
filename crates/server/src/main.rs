use std::sync::Arc;

use anyhow::Context;
use db::DBService;
use services::services::{generative_api::GenerativeApiClient, reminder::ReminderService};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod error;
mod routes;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub config: Arc<Config>,
    pub generative: Option<GenerativeApiClient>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = DBService::new(&config.database_url)
        .await
        .context("failed to open database")?;

    // AI features degrade to fallbacks when the key is absent.
    let generative = match GenerativeApiClient::from_env() {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("generative API disabled: {}", e);
            None
        }
    };

    let _reminder_handle = ReminderService::spawn(db.clone()).await;

    let state = AppState {
        db,
        config: Arc::new(config),
        generative,
    };

    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = routes::router(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
