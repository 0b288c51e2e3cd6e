use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use core_logic::setup_logger;
use dotenv::dotenv;
use miden_spammer::account::{discover_accounts, recipient_pool, AccountBook};
use miden_spammer::bootstrap::create_clients;
use miden_spammer::config::ConfigSource;
use miden_spammer::{CliWalletExecutor, MidenCli, MidenConfig, Orchestrator};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every discovered account through its task cycles
    Run {
        #[arg(long)]
        cycles: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Create new private/public client pairs
    Create {
        #[arg(short, long, default_value = "1")]
        amount: usize,
    },
    /// Print discovered accounts and their recipient pools
    List,
}

fn list_accounts(config: &MidenConfig) {
    let book = AccountBook::load(&config.public_accounts_file, &config.private_accounts_file);
    let accounts = discover_accounts(&config.clients_dir, &book);
    let all_ids = book.all_ids();

    println!(
        "{} accounts ({} private, {} public ids saved)",
        accounts.len(),
        book.private.len(),
        book.public.len()
    );
    for (i, account) in accounts.iter().enumerate() {
        println!(
            "{:>3}. [{}] {} {} recipients:{}",
            i + 1,
            account.visibility,
            account.id,
            account.workdir.display(),
            recipient_pool(&all_ids, &account.id).len()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let (mut config, source) = MidenConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    let _log_guard = setup_logger(&config.log_settings());
    match source {
        ConfigSource::File => info!("Loaded configuration from {}", args.config),
        ConfigSource::Defaults => warn!("Config {} not found, using defaults", args.config),
    }

    let runner = MidenCli::new(config.cli_binary.clone());

    match args.command {
        Commands::Run { cycles, seed } => {
            if let Some(cycles) = cycles {
                config.max_cycles = cycles;
            }
            if seed.is_some() {
                config.rng_seed = seed;
            }
            config.validate()?;

            let wallet = Arc::new(CliWalletExecutor::new(runner, config.consume_settle()));
            let orchestrator = Orchestrator::new(config, wallet)?;
            let summary = orchestrator.run().await;

            if !summary.failed_workers.is_empty() {
                error!("Workers with errors: {}", summary.failed_workers.join(", "));
            }
        }
        Commands::Create { amount } => {
            let created = create_clients(&config, &runner, amount).await?;
            let saved = created.iter().filter(|c| c.account_id.is_some()).count();
            info!("Created {} clients, {} account ids saved", created.len(), saved);
        }
        Commands::List => list_accounts(&config),
    }

    Ok(())
}
