//! Subcommand implementations

use anyhow::Context;
use baseball_core::{serve_http, serve_stdio, McpServer, ServiceContext};
use baseball_foundation::{BaseballConfig, BlobStore, StoreStats};
use std::io::{self, BufRead, Write};
use tracing::info;

/// MCP over stdin/stdout
pub async fn run_stdio(config: &BaseballConfig) -> anyhow::Result<()> {
    let context = ServiceContext::from_config(config).context("Failed to start service")?;
    serve_stdio(McpServer::new(context)).await?;
    Ok(())
}

/// MCP over HTTP at `config.host:config.port`
pub async fn run_http(config: &BaseballConfig) -> anyhow::Result<()> {
    let context = ServiceContext::from_config(config).context("Failed to start service")?;
    serve_http(McpServer::new(context), &config.host, config.port).await?;
    Ok(())
}

pub fn cache_reset(config: &BaseballConfig, confirm: bool) -> anyhow::Result<()> {
    let store = BlobStore::open(Some(config.cache_location()));

    if !confirm {
        let prompt = format!(
            "This will delete all cached data at {}. Continue? [y/N] ",
            store.location()
        );
        let confirmed = ask(&mut io::stdin().lock(), &mut io::stdout(), &prompt)?;
        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    store.reset().context("Failed to reset cache")?;
    info!("Cache at {} reset", store.location());
    println!("Cache cleared.");
    Ok(())
}

pub fn cache_status(config: &BaseballConfig) -> anyhow::Result<()> {
    let store = BlobStore::open(Some(config.cache_location()));
    let stats = store.stats().context("Failed to read cache stats")?;
    print!("{}", render_status(&stats));
    Ok(())
}

/// Write `prompt`, read one line; only `y`/`yes` (any case) confirm
fn ask(input: &mut impl BufRead, output: &mut impl Write, prompt: &str) -> io::Result<bool> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn render_status(stats: &StoreStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("Location: {}\n", stats.location));
    out.push_str(&format!("Backend:  {}\n", stats.backend.as_str()));
    match &stats.degraded_reason {
        Some(reason) if stats.degraded => {
            out.push_str(&format!("Degraded: yes ({})\n", reason))
        }
        _ if stats.degraded => out.push_str("Degraded: yes\n"),
        _ => out.push_str("Degraded: no\n"),
    }
    out.push_str(&format!("Entries:  {}\n", stats.entries));
    out.push_str(&format!("Size:     {} bytes\n", stats.total_bytes));
    out
}
