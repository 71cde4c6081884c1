//! keywatch CLI
//!
//! Run once per schedule tick (cron, CI schedule, systemd timer).

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use keywatch::{
    error::Result,
    models::{Config, Snapshot},
    pipeline,
    services::{HttpFactSource, LogNotifier, Notifier, NtfyNotifier},
    storage::{LocalStateStore, StateStore},
    utils::{SystemClock, http},
};

/// keywatch - game key giveaway and drop watcher
#[derive(Parser, Debug)]
#[command(
    name = "keywatch",
    version,
    about = "Watches game key giveaways and drops and notifies on change"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "keywatch.toml")]
    config: PathBuf,

    /// Snapshot file (overrides state.path from the config)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every source once and persist the snapshot
    Run {
        /// Log notifications instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration
    Validate,

    /// Show the current snapshot
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(path) = cli.state {
        config.state.path = path;
    }
    let config = Arc::new(config);
    let store = LocalStateStore::new(&config.state.path);

    match cli.command.unwrap_or(Command::Run { dry_run: false }) {
        Command::Run { dry_run } => {
            config.validate()?;
            log::info!("keywatch starting...");

            let client = http::create_client(&config.http)?;
            let source = HttpFactSource::new(Arc::clone(&config), client.clone());
            let notifier: Box<dyn Notifier> = if dry_run {
                log::info!("Dry run: notifications will be logged, not sent");
                Box::new(LogNotifier)
            } else {
                Box::new(NtfyNotifier::from_config(client, &config.ntfy))
            };

            let report = pipeline::run_once(
                &config,
                &store,
                &source,
                notifier.as_ref(),
                &SystemClock,
            )
            .await?;

            report.log_summary();
            if report.failed_checks() > 0 {
                log::warn!(
                    "{} of 3 checks failed; they will be retried next run",
                    report.failed_checks()
                );
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            match config.ntfy.resolve_topic() {
                Some(topic) => log::info!("Notifications go to {}/{}", config.ntfy.server, topic),
                None => log::warn!(
                    "No ntfy topic set ({} or ntfy.topic); notifications are disabled",
                    config.ntfy.topic_env
                ),
            }
        }

        Command::Info => {
            log::info!("Snapshot: {}", store.path().display());
            print_snapshot(&store.load().await);
        }
    }

    log::info!("Done!");

    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    log::info!("Schema version: {}", snapshot.schema_version);
    log::info!(
        "Giveaway: {}",
        snapshot.giveaway_title.as_deref().unwrap_or("(none)")
    );
    log::info!(
        "Vault: {}",
        snapshot
            .vault_status
            .map_or_else(|| "(unknown)".to_string(), |s| s.to_string())
    );
    log::info!("Tracked drops: {}", snapshot.drops.len());
    for (id, drop) in &snapshot.drops {
        let start = drop
            .start_time
            .map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339());
        log::info!(
            "    {} | {} | status {} | starts {} | 24h {} | 30m {}",
            id,
            drop.title,
            drop.status,
            start,
            if drop.reminded_24h { "sent" } else { "-" },
            if drop.reminded_30m { "sent" } else { "-" }
        );
    }
}
