//! Agency Assistant development binary.
//!
//! Reads one message per line from stdin and prints the assistant's reply.
//!
//! ```bash
//! OPENAI_API_KEY=sk-... agency-assistant
//! LOG_FORMAT=json RUST_LOG=agency_assistant=debug agency-assistant
//! ```

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use agency_assistant::adapters::storage::{
    InMemoryChatSessionRepository, InMemoryProjectBriefRepository,
};
use agency_assistant::application::{build_handler, build_workflow, SendChatMessageCommand};
use agency_assistant::config::AppConfig;
use agency_assistant::domain::foundation::SessionId;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::load()?;
    config.validate()?;

    let repository = Arc::new(InMemoryChatSessionRepository::new());
    let briefs = Arc::new(InMemoryProjectBriefRepository::new());
    let handler = build_handler(build_workflow(&config, briefs), repository, &config);
    let session_id = SessionId::new();

    tracing::info!(%session_id, "Chat session started; type a message, Ctrl-D to quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = handler
            .handle(SendChatMessageCommand::new(session_id, line))
            .await?;

        stdout
            .write_all(format!("assistant> {}\n", reply.text).as_bytes())
            .await?;
        stdout.flush().await?;
    }

    Ok(())
}
