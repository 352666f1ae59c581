// Terminal client: look up players through the relay and print their
// profile.
//
// Usage:
//   coc-stats [TAG...]
//
// With tags on the command line each one is searched in turn. Without, an
// interactive prompt reads one tag per line until EOF.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use coc_stats::config::ClientConfig;
use coc_stats::relay_client::RelayClient;
use coc_stats::render::render_session;
use coc_stats::session::Session;

const PROMPT: &str = "Enter game ID (e.g., #G9JVPPJ80): ";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the rendered profile.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::load();
    info!("Using relay at {}", config.relay_base_url);
    let client = RelayClient::new(&config).context("failed to create relay client")?;
    let mut session = Session::new();

    let tags: Vec<String> = std::env::args().skip(1).collect();
    if !tags.is_empty() {
        for tag in &tags {
            session.search(&client, tag.trim()).await;
            print!("{}", render_session(&session));
        }
        return Ok(());
    }

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        session.search(&client, line.trim()).await;
        stdout
            .write_all(render_session(&session).as_bytes())
            .await?;
        stdout.write_all(b"\n").await?;
    }
    Ok(())
}
