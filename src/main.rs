use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Team Lument website with a live Discord member roster
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Log at debug level
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Validate roster configuration and exit
    #[arg(long)]
    check_config: bool,
}

mod config;
mod discord;
mod error;
mod managers;
mod models;
mod web;

use config::{RosterSettings, UpstreamConfig};
use discord::{CachedDirectory, DiscordDirectory, GuildDirectory};
use managers::create_shared_roster_manager;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let level = if args.verbose {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true),
        )
        .with(level)
        .init();

    let settings = RosterSettings::from_env();
    let missing = settings.missing();

    if args.check_config {
        if missing.is_empty() {
            info!("Roster configuration is complete: {:?}", settings);
            return Ok(());
        }
        error!("Missing roster configuration: {}", missing.join(", "));
        return Err(anyhow::anyhow!(
            "Missing roster configuration: {}",
            missing.join(", ")
        ));
    }

    if !missing.is_empty() {
        // The site still serves; /api/members answers 500 until these are set
        warn!(
            "Roster configuration incomplete, /api/members will fail: missing {}",
            missing.join(", ")
        );
    }

    let upstream = UpstreamConfig::from_env();
    info!(
        "Discord API: {} (timeout {:?}, revalidate every {:?})",
        upstream.api_base, upstream.timeout, upstream.revalidate
    );

    let directory: Arc<dyn GuildDirectory> = Arc::new(CachedDirectory::new(
        DiscordDirectory::new(&upstream)?,
        upstream.revalidate,
    ));
    let roster = create_shared_roster_manager(settings, directory);

    let mut web_config = web::WebServerConfig::from_env();
    if let Some(port) = args.port {
        web_config.port = port;
    }

    info!("Starting web server on port {}...", web_config.port);
    if let Err(e) = web::start_web_server(web_config, roster).await {
        error!("Web server error: {}", e);
        return Err(e);
    }

    warn!("Web server ended.");
    Ok(())
}
