//! HTTP chat shell: JSON API plus static front-end files.

pub mod routes;
pub mod session;

use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::kernel::{FallbackPrompts, SlotCatalog};
use crate::services::aws::Credentials;
use crate::services::lex::{LexModelsClient, LexRuntimeClient, Recognizer};
use crate::services::llm::OnPremClient;
use crate::services::suggestions::{SlotTypeSource, SuggestionProvider};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<SlotCatalog>,
    /// `None` when the Lex bot is not configured; aws-lex turns then fail.
    pub recognizer: Option<Arc<dyn Recognizer>>,
    pub suggestions: Arc<SuggestionProvider>,
    pub engines: Arc<OnPremClient>,
    pub region: Option<String>,
}

impl AppState {
    /// Wires every collaborator from config. Missing AWS settings are logged,
    /// not fatal, so on-prem engines keep working.
    pub fn from_config(config: &AppConfig) -> Self {
        let http = reqwest::Client::new();
        let catalog = SlotCatalog::reservation().with_prompts(FallbackPrompts::for_locale(&config.lex.locale_id));

        let credentials = Credentials::from_env()
            .map_err(|e| warn!("AWS credentials unavailable: {}", e))
            .ok();

        let recognizer = credentials.clone().and_then(|creds| {
            match LexRuntimeClient::from_settings(&config.lex, http.clone(), creds) {
                Ok(client) => Some(Arc::new(client) as Arc<dyn Recognizer>),
                Err(e) => {
                    warn!("Lex runtime disabled: {}", e);
                    None
                }
            }
        });

        // Suggestions from the models API are optional; no bot id means CSV only.
        let models = credentials
            .and_then(|creds| LexModelsClient::from_settings(&config.lex, http.clone(), creds).ok())
            .map(|client| Arc::new(client) as Arc<dyn SlotTypeSource>);

        Self {
            catalog: Arc::new(catalog),
            recognizer,
            suggestions: Arc::new(SuggestionProvider::new(&config.suggestions, models)),
            engines: Arc::new(OnPremClient::new(config.engines.clone())),
            region: config.lex.region.clone(),
        }
    }
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/engines", get(routes::list_engines))
        .route("/api/suggestions", get(routes::suggestions))
        .route("/api/chat", post(routes::chat))
        .route("/api/fulfillment", post(routes::fulfillment))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Serves until `shutdown` is cancelled.
pub async fn serve(config: AppConfig, shutdown: CancellationToken) -> anyhow::Result<()> {
    let state = AppState::from_config(&config);
    let app = build_router(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("[lex-chat] listening on http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("[lex-chat] stopped");
    Ok(())
}

/// Cancels `shutdown` once `signal` fires. If the signal cannot be awaited the
/// token is left alone and the server keeps running.
pub async fn cancel_on_signal<F>(signal: F, shutdown: CancellationToken)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("shutdown signal received");
            shutdown.cancel();
        }
        Err(e) => warn!("shutdown signal unavailable, not cancelling: {}", e),
    }
}
