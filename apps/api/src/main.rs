mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod models;
mod notifications;
mod qualification;
mod routes;
mod scoring;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::interview::AnswerClassifier;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::notifications::worker::run_notification_worker;
use crate::notifications::{NotificationScheduler, PgStore, WebhookDispatcher};
use crate::qualification::QualificationOrchestrator;
use crate::routes::build_router;
use crate::scoring::ScoringEngine;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (collaborator tables + notification_tasks)
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    // Text generation, shared by scoring and the interview classifier
    let llm: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm.model_name());

    let scoring = Arc::new(ScoringEngine::new(llm.clone(), config.scoring.clone()));
    let classifier = Arc::new(AnswerClassifier::new(llm, config.classifier.clone()));
    info!(
        "Engines initialized (threshold: {}, remote classifier: {})",
        config.scoring.default_threshold, config.classifier.remote_enabled
    );

    let dispatcher = Arc::new(WebhookDispatcher::new(
        config.notifications.webhook_url.clone(),
    )?);
    let scheduler = Arc::new(NotificationScheduler::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        dispatcher,
        config.notifications.clone(),
    ));
    let orchestrator = Arc::new(QualificationOrchestrator::new(
        scoring.clone(),
        store.clone(),
        store,
        scheduler.clone(),
    ));

    tokio::spawn(run_notification_worker(
        scheduler.clone(),
        config.worker_id.clone(),
    ));

    let state = AppState {
        scoring,
        classifier,
        orchestrator,
        scheduler,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
