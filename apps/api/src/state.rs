use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::discovery::sources::SourceRegistry;
use crate::llm_client::LlmClient;
use crate::mailer::client::MailClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub mailer: MailClient,
    /// Adapter lookup table. Built once at startup; discovery fan-out is
    /// bounded by its size.
    pub sources: Arc<SourceRegistry>,
    pub config: Config,
}
