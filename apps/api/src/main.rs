mod analytics;
mod applications;
mod config;
mod db;
mod discovery;
mod errors;
mod letters;
mod llm_client;
mod mailer;
mod models;
mod profile;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::discovery::sources::SourceRegistry;
use crate::llm_client::LlmClient;
use crate::mailer::client::MailClient;
use crate::routes::build_router;
use crate::state::AppState;

const SOURCE_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobAgent API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and apply migrations
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize mail gateway client
    let mailer = MailClient::new(config.sendgrid_api_key.clone(), config.sender_email.clone());
    info!("Mail client initialized (sender: {})", mailer.sender());

    // Register search source adapters against one shared HTTP client
    let source_http = reqwest::Client::builder()
        .user_agent(SOURCE_USER_AGENT)
        .timeout(std::time::Duration::from_secs(config.source_timeout_secs))
        .build()
        .expect("Failed to build HTTP client");
    let sources = Arc::new(SourceRegistry::with_defaults(source_http));
    info!(
        "Source registry initialized: {:?}",
        sources.known_sources()
    );

    // Build app state
    let state = AppState {
        db,
        llm,
        mailer,
        sources,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
