use super::parser::{parse_balance, parse_committed_notes};
use super::{ConsumeOutcome, SendRequest, WalletExecutor, WalletOperation, WalletOutput};
use crate::account::Account;
use async_trait::async_trait;
use core_logic::ToolError;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::{error, info, warn};

/// Executes one wallet CLI invocation in a working directory and returns
/// its stdout.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[String], workdir: &Path) -> Result<String, ToolError>;
}

/// Runs the real `miden` binary as a subprocess.
///
/// Any stderr output counts as failure, whatever the exit code.
#[derive(Debug, Clone)]
pub struct MidenCli {
    binary: String,
}

impl MidenCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn render(&self, args: &[String]) -> String {
        let mut command = self.binary.clone();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }
}

#[async_trait]
impl CommandRunner for MidenCli {
    async fn run(&self, args: &[String], workdir: &Path) -> Result<String, ToolError> {
        let command = self.render(args);
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(workdir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ToolError::Spawn {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            error!("Failed executing [{}] command: {}", command, stderr.trim());
            return Err(ToolError::Stderr {
                command,
                stderr: stderr.trim().to_string(),
            });
        }
        if !output.status.success() {
            return Err(ToolError::Stderr {
                command,
                stderr: format!("exited with {}", output.status),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

pub(crate) fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// [`WalletExecutor`] backed by the wallet CLI.
pub struct CliWalletExecutor<R> {
    runner: R,
    consume_settle: Duration,
}

impl<R: CommandRunner> CliWalletExecutor<R> {
    pub fn new(runner: R, consume_settle: Duration) -> Self {
        Self {
            runner,
            consume_settle,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    async fn run_sync(&self, account: &Account) -> Result<(), ToolError> {
        let short = account.short();
        info!("{} Trying to sync..", short);
        match self.runner.run(&args(&["sync"]), &account.workdir).await {
            Ok(_) => {
                info!("{} Successfully synced!", short);
                Ok(())
            }
            Err(e) => {
                error!("Failed syncing client #{}: {}", short, e);
                Err(e)
            }
        }
    }

    async fn run_balance(&self, account: &Account, faucet_id: &str) -> Result<Option<i64>, ToolError> {
        let output = self
            .runner
            .run(&args(&["account", "--show", &account.id]), &account.workdir)
            .await
            .inspect_err(|_| error!("{} Failed retrieving balance", account.short()))?;

        parse_balance(&output, faucet_id).map_err(|e| {
            warn!("{} {}", account.short(), e);
            ToolError::UnexpectedOutput {
                operation: "balance".to_string(),
            }
        })
    }

    async fn run_notes(&self, account: &Account) -> Result<WalletOutput, ToolError> {
        // Listing still works on stale state, so a failed sync is only logged.
        let _ = self.run_sync(account).await;

        let output = self
            .runner
            .run(&args(&["notes", "-l"]), &account.workdir)
            .await
            .inspect_err(|e| error!("{} Failed getting notes list: {}", account.short(), e))?;

        Ok(WalletOutput::Notes(parse_committed_notes(&output)))
    }

    async fn run_consume(&self, account: &Account, note: &str) -> Result<ConsumeOutcome, ToolError> {
        let short = account.short();
        info!(
            "{} Trying to consume note: {}",
            short,
            crate::account::truncate_note(note)
        );

        if self.run_sync(account).await.is_err() {
            return Ok(ConsumeOutcome::SyncUnavailable);
        }

        let command = args(&["consume-notes", "--account", &account.id, note, "--force"]);
        self.runner
            .run(&command, &account.workdir)
            .await
            .inspect_err(|e| error!("{} Failed consuming note: {}", short, e))?;

        info!("{} Successfully consumed note!", short);

        tokio::time::sleep(self.consume_settle).await;
        if self.run_sync(account).await.is_err() {
            warn!("{} Trailing sync failed after consumption", short);
        }

        Ok(ConsumeOutcome::Consumed)
    }

    async fn run_send(&self, account: &Account, request: &SendRequest) -> Result<(), ToolError> {
        let short = account.short();
        let target = crate::account::truncate_address(&request.target);
        info!(
            "{} is trying to {} send {} token to {}",
            short, request.note_type, request.amount, target
        );

        let asset = format!("{}::{}", request.amount, request.faucet_id);
        let command = args(&[
            "send",
            "--sender",
            &account.id,
            "--target",
            &request.target,
            "--asset",
            &asset,
            "--note-type",
            request.note_type.as_str(),
            "--force",
        ]);
        self.runner
            .run(&command, &account.workdir)
            .await
            .inspect_err(|e| error!("{} Failed sending token to {}: {}", short, target, e))?;

        info!("{} Successfully sending token to {}", short, target);
        Ok(())
    }
}

#[async_trait]
impl<R: CommandRunner> WalletExecutor for CliWalletExecutor<R> {
    async fn execute(
        &self,
        account: &Account,
        operation: WalletOperation,
    ) -> Result<WalletOutput, ToolError> {
        match operation {
            WalletOperation::Sync => self.run_sync(account).await.map(|_| WalletOutput::Synced),
            WalletOperation::Balance { faucet_id } => self
                .run_balance(account, &faucet_id)
                .await
                .map(WalletOutput::Balance),
            WalletOperation::NotesList => self.run_notes(account).await,
            WalletOperation::Consume { note } => self
                .run_consume(account, note.as_str())
                .await
                .map(WalletOutput::Consumed),
            WalletOperation::Send(request) => {
                self.run_send(account, &request).await.map(|_| WalletOutput::Sent)
            }
        }
    }
}
