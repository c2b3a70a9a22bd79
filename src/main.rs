use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use beam::aggregator::{Aggregator, Scheduler};
use beam::config::Config;
use beam::feed::{build_client, Fetcher};
use beam::server::build_router;

#[derive(Parser, Debug)]
#[command(name = "beam", about = "BEAM feed aggregator")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, value_name = "FILE", default_value = "beam.toml")]
    config: PathBuf,

    /// Address to serve on, overriding `listen` from the config file
    #[arg(short, long, value_name = "ADDR")]
    listen: Option<SocketAddr>,

    /// Run a single aggregation cycle, print stats as JSON and exit
    #[arg(long)]
    once: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --verbose when set.
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from '{}'", args.config.display()))?;

    let client = build_client().context("Failed to build HTTP client")?;
    let fetcher = Fetcher::new(client, config.fetch_timeout());
    tracing::debug!(timeout = ?fetcher.timeout(), "Per-source fetch timeout");
    let aggregator = Arc::new(Aggregator::new(
        config.title.clone(),
        config.feed_url.clone(),
        fetcher,
    ));

    for source in &config.sources {
        aggregator
            .add_source(
                source.url.clone(),
                source.name.clone(),
                source.description.clone(),
            )
            .await;
    }

    if config.sources.is_empty() {
        tracing::warn!("No sources configured; the feed stays unavailable until sources are added");
    }

    if args.once {
        let report = aggregator
            .run_cycle()
            .await
            .context("Aggregation cycle failed")?;
        tracing::debug!(?report, "Cycle finished");
        let stats = serde_json::to_string_pretty(&aggregator.stats().await)
            .context("Failed to serialize stats")?;
        println!("{stats}");
        return Ok(());
    }

    // Held for the life of the server; dropping it stops the refresh loop.
    let _scheduler = match config.refresh_interval() {
        Some(period) if !config.sources.is_empty() => {
            Some(Scheduler::start(aggregator.clone(), period))
        }
        _ => {
            if !config.sources.is_empty() {
                if let Err(e) = aggregator.run_cycle().await {
                    tracing::warn!(error = %e, "Initial aggregation cycle failed");
                }
            }
            None
        }
    };

    let addr = args.listen.unwrap_or(config.listen);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "Serving aggregated feed at /feed.json");

    axum::serve(listener, build_router(aggregator))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("HTTP server failed")?;

    tracing::info!("Shutting down");
    Ok(())
}
