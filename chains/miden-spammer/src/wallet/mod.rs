//! Wallet operations against the external wallet CLI.
//!
//! Schedulers and the faucet client only see the [`WalletExecutor`] trait:
//! one typed operation in, one typed output back. [`CliWalletExecutor`] is the
//! production implementation; it shells out through a [`CommandRunner`] and
//! scrapes the text output with the helpers in [`parser`].

pub mod cli;
pub mod parser;

use crate::account::{Account, NoteId, Visibility};
use async_trait::async_trait;
use core_logic::ToolError;

pub use cli::{CliWalletExecutor, CommandRunner, MidenCli};

/// A transfer from the executing account to `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub target: String,
    pub amount: u64,
    pub faucet_id: String,
    pub note_type: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletOperation {
    Sync,
    Balance { faucet_id: String },
    NotesList,
    Consume { note: NoteId },
    Send(SendRequest),
}

impl WalletOperation {
    pub fn name(&self) -> &'static str {
        match self {
            WalletOperation::Sync => "sync",
            WalletOperation::Balance { .. } => "balance",
            WalletOperation::NotesList => "notes",
            WalletOperation::Consume { .. } => "consume",
            WalletOperation::Send(_) => "send",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    Consumed,
    /// The pre-consumption sync failed, so nothing was attempted.
    SyncUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletOutput {
    Synced,
    Balance(Option<i64>),
    Notes(Vec<NoteId>),
    Consumed(ConsumeOutcome),
    Sent,
}

/// Runs one wallet operation scoped to an account's working directory.
///
/// Calls complete before returning; the caller's task is suspended until the
/// underlying command finishes.
#[async_trait]
pub trait WalletExecutor: Send + Sync {
    async fn execute(
        &self,
        account: &Account,
        operation: WalletOperation,
    ) -> Result<WalletOutput, ToolError>;
}

fn unexpected(operation: &str) -> ToolError {
    ToolError::UnexpectedOutput {
        operation: operation.to_string(),
    }
}

/// Typed shorthands over [`WalletExecutor::execute`].
#[async_trait]
pub trait WalletExecutorExt: WalletExecutor {
    async fn sync(&self, account: &Account) -> Result<(), ToolError> {
        match self.execute(account, WalletOperation::Sync).await? {
            WalletOutput::Synced => Ok(()),
            _ => Err(unexpected("sync")),
        }
    }

    async fn balance(&self, account: &Account, faucet_id: &str) -> Result<Option<i64>, ToolError> {
        let op = WalletOperation::Balance {
            faucet_id: faucet_id.to_string(),
        };
        match self.execute(account, op).await? {
            WalletOutput::Balance(amount) => Ok(amount),
            _ => Err(unexpected("balance")),
        }
    }

    async fn committed_notes(&self, account: &Account) -> Result<Vec<NoteId>, ToolError> {
        match self.execute(account, WalletOperation::NotesList).await? {
            WalletOutput::Notes(notes) => Ok(notes),
            _ => Err(unexpected("notes")),
        }
    }

    async fn consume(&self, account: &Account, note: &NoteId) -> Result<ConsumeOutcome, ToolError> {
        let op = WalletOperation::Consume { note: note.clone() };
        match self.execute(account, op).await? {
            WalletOutput::Consumed(outcome) => Ok(outcome),
            _ => Err(unexpected("consume")),
        }
    }

    async fn send(&self, account: &Account, request: SendRequest) -> Result<(), ToolError> {
        match self.execute(account, WalletOperation::Send(request)).await? {
            WalletOutput::Sent => Ok(()),
            _ => Err(unexpected("send")),
        }
    }
}

impl<T: WalletExecutor + ?Sized> WalletExecutorExt for T {}
