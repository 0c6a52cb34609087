use lex_chat::config::AppConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment first so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lex_chat=info,tower_http=info")),
        )
        .init();
    tracing::info!("lex-chat booting...");

    let config = AppConfig::from_env();

    let shutdown = CancellationToken::new();
    tokio::spawn(lex_chat::server::cancel_on_signal(
        tokio::signal::ctrl_c(),
        shutdown.clone(),
    ));

    lex_chat::server::serve(config, shutdown).await
}
