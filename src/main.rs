use clap::{Parser, Subcommand};
use ledger_core::types::DepositEvent;
use ledger_core::RuntimeConfig;
use ledger_db::repositories::{BalanceRepository, TransactionRepository};
use ledger_db::{DatabaseConfig, DatabasePool};
use ledger_settlement::{ConfigCache, DepositProcessor, TokenRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Operator CLI for the wager-ledger core: migrations, reconciliation
/// exports and manual event replay.
#[derive(Parser)]
#[command(name = "wager-ledger", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Print the effective bot configuration
    Config {
        /// Bypass the cache and read the persisted row
        #[arg(long)]
        force: bool,
    },
    /// Show a user's balances (atomic units)
    Balance {
        #[arg(long)]
        user: i64,
    },
    /// Export recent audit entries as JSON lines, newest first
    Audit {
        #[arg(long, default_value_t = 50)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    /// Replay deposit events from a JSON file (array of listener events)
    Deposit {
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    let db_config = DatabaseConfig::from_env();
    let db = Arc::new(DatabasePool::new(&db_config).await?);

    match cli.command {
        Command::Migrate => {
            db.migrate().await?;
        }

        Command::Config { force } => {
            let cache = ConfigCache::new(db.clone(), Duration::from_secs(10));
            let config = cache.get(force).await?;
            println!("{config:#?}");
        }

        Command::Balance { user } => {
            let rows = BalanceRepository::get_for_user(db.inner(), user).await?;
            if rows.is_empty() {
                println!("no balances for user {user}");
            }
            for row in rows {
                println!("{}\t{}", row.token_id, row.amount);
            }
        }

        Command::Audit { limit, offset } => {
            let entries = TransactionRepository::list_recent(db.inner(), limit, offset).await?;
            for entry in entries {
                println!("{}", serde_json::to_string(&entry)?);
            }
        }

        Command::Deposit { file } => {
            let runtime = RuntimeConfig::from_env()?;
            let registry = Arc::new(TokenRegistry::new(
                db.clone(),
                Duration::from_secs(runtime.token_cache_ttl_secs),
            ));
            let config = Arc::new(ConfigCache::new(
                db.clone(),
                Duration::from_secs(runtime.config_cache_ttl_secs),
            ));
            let processor =
                DepositProcessor::new(db.clone(), registry, config, runtime.treasury_address);

            let raw = std::fs::read_to_string(&file)?;
            let events: Vec<DepositEvent> = serde_json::from_str(&raw)?;
            info!(count = events.len(), "Replaying deposit events");
            for event in &events {
                match processor.apply_deposit(event).await {
                    Ok(outcome) => println!("{}\t{}", event.tx_hash, outcome.label()),
                    Err(e) => {
                        error!(tx_hash = %event.tx_hash, error = %e, "Failed to apply deposit");
                    }
                }
            }
        }
    }

    db.close().await;
    Ok(())
}
