pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use ingest_core::{MemoryPreferences, Orchestrator, SourcePolicy, StaticCredential};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::{HttpExtractionService, WikipediaFetcher};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub preferences: Arc<MemoryPreferences>,
}

impl AppState {
    /// Wire the orchestrator to the HTTP-backed collaborators.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("flashcard-ingest/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let preferences = Arc::new(MemoryPreferences::new());
        preferences.set_simulated_mode(config.simulated_mode);

        let mut policy = SourcePolicy::default();
        policy.extend(&config.extra_source_hosts);

        let orchestrator = Orchestrator::new(
            Arc::new(WikipediaFetcher::new(client.clone())),
            Arc::new(HttpExtractionService::new(
                client,
                config.extraction_url.clone(),
                config.extraction_api_key.clone(),
                config.extraction_model.clone(),
            )),
            preferences.clone(),
            Arc::new(StaticCredential::new(config.extraction_api_key.clone())),
        )
        .with_source_policy(policy);

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            preferences,
        })
    }
}

/// All routes, without the outer middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/ingest/submit", post(routes::ingest::submit))
        .route("/api/ingest/import", post(routes::ingest::import))
        .route("/api/ingest/status", get(routes::ingest::status))
        .route("/api/ingest/export", post(routes::ingest::export))
        .route(
            "/api/preferences",
            get(routes::preferences::get).put(routes::preferences::update),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    if config.extraction_api_key.is_none() {
        tracing::warn!("EXTRACTION_API_KEY is not set; submit requests will be rejected");
    }
    if config.simulated_mode {
        tracing::info!("Simulated mode enabled; flashcards are generated offline");
    }

    let state = AppState::from_config(&config)?;

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
