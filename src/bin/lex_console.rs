use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use lex_chat::config::AppConfig;
use lex_chat::kernel::summary::filled_count;
use lex_chat::kernel::{format_lex_response, FallbackPrompts, SlotCatalog};
use lex_chat::server::session::new_session_id;
use lex_chat::services::aws::Credentials;
use lex_chat::services::lex::{LexRuntimeClient, Recognizer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 2. Setup Recognizer
    let config = AppConfig::from_env();
    let recognizer =
        LexRuntimeClient::from_settings(&config.lex, reqwest::Client::new(), Credentials::from_env()?)?;
    let catalog = SlotCatalog::reservation().with_prompts(FallbackPrompts::for_locale(&config.lex.locale_id));
    let session_id = new_session_id();

    println!("session: {}  (empty line to skip, Ctrl+D to quit)", session_id);

    // 3. Read stdin, one turn per line
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let turn = match recognizer.recognize(text, &session_id).await {
            Ok(raw) => format_lex_response(&catalog, &session_id, &raw).map_err(anyhow::Error::from),
            Err(e) => Err(e.into()),
        };

        match turn {
            Ok(out) => {
                println!("bot [{}]: {}", out.ui.mode(), out.ui.prompt().unwrap_or("..."));
                if !out.ui.quick_replies().is_empty() {
                    println!("    replies: {}", out.ui.quick_replies().join(" | "));
                }
                println!("    summary ({}/{}):", filled_count(&out.summary), out.summary.len());
                for item in &out.summary {
                    println!("      {}: {}", item.label, item.value.as_deref().unwrap_or("-"));
                }
            }
            Err(e) => tracing::error!("turn failed: {:#}", e),
        }
    }

    Ok(())
}
