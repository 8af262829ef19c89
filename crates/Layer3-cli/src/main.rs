//! baseball-mcp - Main entry point

mod commands;

use baseball_foundation::BaseballConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Baseball statistics MCP server
#[derive(Parser, Debug)]
#[command(name = "baseball-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Cache location: a file path or ':memory:'
    #[arg(long, global = true, value_name = "PATH")]
    cache: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Serve MCP over stdin/stdout (default)
    Run,
    /// Serve MCP over HTTP
    Http {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Delete every cached entry
    CacheReset {
        /// Skip the confirmation prompt
        #[arg(long)]
        confirm: bool,
    },
    /// Show cache location, backend and size
    CacheStatus,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries the protocol, so logs go to stderr
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut config = BaseballConfig::load();
    if let Some(cache) = args.cache {
        config = config.with_cache(cache);
    }

    match args.command.unwrap_or(Command::Run) {
        Command::Run => commands::run_stdio(&config).await,
        Command::Http { host, port } => {
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            commands::run_http(&config).await
        }
        Command::CacheReset { confirm } => commands::cache_reset(&config, confirm),
        Command::CacheStatus => commands::cache_status(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_stdio() {
        let args = Args::try_parse_from(["baseball-mcp"]).unwrap();
        assert_eq!(args.command, None);
        assert!(!args.debug);
    }

    #[test]
    fn test_http_flags() {
        let args =
            Args::try_parse_from(["baseball-mcp", "http", "--host", "0.0.0.0", "--port", "9000"])
                .unwrap();
        assert_eq!(
            args.command,
            Some(Command::Http {
                host: Some("0.0.0.0".to_string()),
                port: Some(9000)
            })
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["baseball-mcp", "cache-reset", "--confirm", "--cache", ":memory:", "--debug"])
                .unwrap();
        assert_eq!(args.command, Some(Command::CacheReset { confirm: true }));
        assert_eq!(args.cache.as_deref(), Some(":memory:"));
        assert!(args.debug);
    }

    #[test]
    fn test_bad_port_is_rejected() {
        assert!(Args::try_parse_from(["baseball-mcp", "http", "--port", "99999"]).is_err());
    }
}
