//! Folio Agent - portfolio chat agent
//!
//! Answers visitor questions in the persona of a portfolio owner and records
//! leads, unanswered questions and job interest through push notifications.

mod api;
mod config;
mod dispatch;
mod llm;
mod notifier;
mod persona;
mod session;
mod tools;

use api::{create_router, AppState};
use config::AppConfig;
use dispatch::Dispatcher;
use llm::{LlmService, LoggingService, OpenAIService, RetryingService};
use notifier::{LogNotifier, Notifier, PushoverNotifier};
use persona::Persona;
use std::net::SocketAddr;
use std::sync::Arc;
use tools::ToolRegistry;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_agent=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env()?;
    let persona = Persona::load(&config.persona_dir, &config.persona_name)?;

    // Notifications
    let notifier: Arc<dyn Notifier> = match &config.pushover {
        Some(pushover) => {
            tracing::info!("Push notifications enabled");
            Arc::new(PushoverNotifier::new(&pushover.token, &pushover.user)?)
        }
        None => {
            tracing::warn!("PUSHOVER_TOKEN/PUSHOVER_USER not set; notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };

    // Model backend: OpenAI -> logging -> retry
    let backend: Arc<dyn LlmService> = Arc::new(OpenAIService::new(
        &config.api_key,
        &config.model,
        &config.base_url,
    )?);
    let logged: Arc<dyn LlmService> = Arc::new(LoggingService::new(backend));
    let llm: Arc<dyn LlmService> = Arc::new(RetryingService::new(logged, config.retry));
    tracing::info!(model = %llm.model_id(), base_url = %config.base_url, "Model backend configured");

    let tools = Arc::new(ToolRegistry::standard());
    tracing::info!(tools = tools.len(), "Tool registry initialized");

    let dispatcher = Dispatcher::new(llm, tools, notifier, config.limits);
    let state = AppState::new(Arc::new(dispatcher), persona);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Folio agent listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
