//! Creates new wallet client pairs on disk.
//!
//! Each pair is one private and one public client directory, initialised with
//! `init`, given a fresh mutable wallet, and recorded in the matching
//! account-id file.

use crate::account::{client_dir, count_client_dirs, visibility_dir, Visibility};
use crate::config::MidenConfig;
use crate::wallet::cli::args;
use crate::wallet::CommandRunner;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

pub const CLIENT_CONFIG_FILE: &str = "miden-client.toml";

/// Outcome for one side of a created pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedClient {
    pub visibility: Visibility,
    pub workdir: PathBuf,
    /// Saved account id, `None` when any step for this side failed
    pub account_id: Option<String>,
}

struct Side {
    visibility: Visibility,
    workdir: PathBuf,
    ok: bool,
}

fn new_wallet_args(visibility: Visibility) -> Vec<String> {
    match visibility {
        Visibility::Private => args(&["new-wallet", "--mutable"]),
        Visibility::Public => args(&["new-wallet", "--mutable", "-s", "public"]),
    }
}

fn accounts_file(config: &MidenConfig, visibility: Visibility) -> &Path {
    match visibility {
        Visibility::Private => config.private_accounts_file.as_path(),
        Visibility::Public => config.public_accounts_file.as_path(),
    }
}

/// Read `default_account_id` from a client's config file.
pub async fn read_default_account(workdir: &Path) -> Result<String> {
    let path = workdir.join(CLIENT_CONFIG_FILE);
    let content = fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: toml::Value =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    value
        .get("default_account_id")
        .and_then(|v| v.as_str())
        .filter(|id| !id.trim().is_empty())
        .map(|id| id.trim().to_string())
        .ok_or_else(|| anyhow!("{} has no default_account_id", path.display()))
}

async fn append_account_id(file: &Path, id: &str) -> Result<()> {
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let mut handle = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .await
        .with_context(|| format!("Failed to open {}", file.display()))?;
    handle.write_all(format!("{}\n", id).as_bytes()).await?;
    handle.flush().await?;
    Ok(())
}

async fn prepare_dir(clients_dir: &Path, visibility: Visibility) -> Result<PathBuf> {
    fs::create_dir_all(visibility_dir(clients_dir, visibility)).await?;
    let index = count_client_dirs(clients_dir, visibility) + 1;
    let dir = client_dir(clients_dir, visibility, index);
    fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    info!("Created {} client #{} at {}", visibility, index, dir.display());
    Ok(dir)
}

async fn create_pair<R>(config: &MidenConfig, runner: &R) -> Result<Vec<CreatedClient>>
where
    R: CommandRunner + ?Sized,
{
    let mut sides = Vec::new();
    for visibility in [Visibility::Private, Visibility::Public] {
        let workdir = prepare_dir(&config.clients_dir, visibility).await?;
        sides.push(Side {
            visibility,
            workdir,
            ok: true,
        });
    }

    let init = args(&["init", "--network", &config.network]);
    for side in sides.iter_mut() {
        if let Err(e) = runner.run(&init, &side.workdir).await {
            error!("Failed to init {} client: {}", side.visibility, e);
            side.ok = false;
        }
    }

    tokio::time::sleep(config.wallet_settle()).await;
    for side in sides.iter_mut().filter(|s| s.ok) {
        match runner.run(&new_wallet_args(side.visibility), &side.workdir).await {
            Ok(_) => info!("Created {} wallet in {}", side.visibility, side.workdir.display()),
            Err(e) => {
                error!("Failed to create {} wallet: {}", side.visibility, e);
                side.ok = false;
            }
        }
    }

    tokio::time::sleep(config.wallet_settle()).await;
    let mut created = Vec::new();
    for side in sides {
        let mut account_id = None;
        if side.ok {
            match read_default_account(&side.workdir).await {
                Ok(id) => match append_account_id(accounts_file(config, side.visibility), &id).await {
                    Ok(()) => {
                        info!("Saved {} account {}", side.visibility, id);
                        account_id = Some(id);
                    }
                    Err(e) => error!("Failed to save {} account id: {:#}", side.visibility, e),
                },
                Err(e) => error!("Failed to read {} account id: {:#}", side.visibility, e),
            }
        }
        created.push(CreatedClient {
            visibility: side.visibility,
            workdir: side.workdir,
            account_id,
        });
    }

    Ok(created)
}

/// Create `amount` private/public client pairs.
///
/// Only filesystem errors while laying out directories abort the run; command
/// failures are logged and leave that side without an account id.
pub async fn create_clients<R>(config: &MidenConfig, runner: &R, amount: usize) -> Result<Vec<CreatedClient>>
where
    R: CommandRunner + ?Sized,
{
    let mut created = Vec::with_capacity(amount * 2);
    for n in 1..=amount {
        info!("Creating client pair {}/{}", n, amount);
        created.extend(create_pair(config, runner).await?);
    }
    Ok(created)
}
