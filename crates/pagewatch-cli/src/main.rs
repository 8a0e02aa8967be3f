//! pagewatch CLI
//!
//! Watches one web page on a cron schedule and posts a diff to a Discord
//! webhook whenever its content changes. Every option can also be supplied
//! through the environment or a `.env` file.

use clap::Parser;
use pagewatch_core::core_types::schema::OP_LOAD_SETTINGS;
use pagewatch_core::log_op_error;
use pagewatch_core::logging_facility::{init, Profile};
use pagewatch_engine::{
    run_watch, DiscordWebhook, HttpFetcher, WatchSettings, DEFAULT_DISCORD_API_BASE,
};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "pagewatch")]
#[command(about = "pagewatch - Report web page changes to Discord", long_about = None)]
struct Cli {
    /// Cron expression, five fields or six with leading seconds
    #[arg(long, env = "CRON")]
    cron: String,

    /// Page to watch
    #[arg(long, env = "WATCH_URL")]
    watch_url: String,

    /// Display name used in notifications
    #[arg(long, env = "WATCH_NAME")]
    watch_name: String,

    #[arg(long, env = "DISCORD_WEBHOOK_ID")]
    discord_webhook_id: String,

    #[arg(long, env = "DISCORD_WEBHOOK_TOKEN", hide_env_values = true)]
    discord_webhook_token: String,

    /// Discord API root, overridable for testing
    #[arg(long, env = "DISCORD_API_BASE", default_value = DEFAULT_DISCORD_API_BASE)]
    discord_api_base: String,

    /// Log output: pretty or json
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty")]
    log_format: Profile,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init(cli.log_format);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let settings = WatchSettings::new(
        cli.cron,
        cli.watch_url,
        cli.watch_name,
        cli.discord_webhook_id,
        cli.discord_webhook_token,
    )
    .map_err(|err| {
        log_op_error!(OP_LOAD_SETTINGS, err.clone(), since = start);
        err
    })?;
    let fetcher = Arc::new(HttpFetcher::new()?);
    let sink = Arc::new(DiscordWebhook::new(&cli.discord_api_base, &settings.webhook)?);

    tracing::info!(
        watch_name = settings.target.name(),
        watch_url = settings.target.url(),
        "starting pagewatch"
    );
    run_watch(&settings, fetcher, sink).await?;
    Ok(())
}
