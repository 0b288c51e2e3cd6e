#![allow(dead_code)]

use async_trait::async_trait;
use core_logic::ToolError;
use miden_spammer::account::{Account, NoteId, Visibility};
use miden_spammer::config::MidenConfig;
use miden_spammer::faucet::FaucetSettings;
use miden_spammer::wallet::{ConsumeOutcome, WalletExecutor, WalletOperation, WalletOutput};
use std::sync::Mutex;

/// In-memory wallet that answers from fixed state and records every call.
#[derive(Default)]
pub struct MockWallet {
    pub balance: Option<i64>,
    pub notes: Vec<NoteId>,
    pub fail_sync: bool,
    pub fail_balance: bool,
    calls: Mutex<Vec<(String, WalletOperation)>>,
}

impl MockWallet {
    pub fn with_balance(balance: i64) -> Self {
        Self {
            balance: Some(balance),
            ..Default::default()
        }
    }

    pub fn with_notes(notes: &[&str]) -> Self {
        Self {
            notes: notes.iter().map(|n| NoteId::new(*n)).collect(),
            ..Default::default()
        }
    }

    /// Wallet whose `sync` always fails.
    pub fn failing_sync() -> Self {
        Self {
            fail_sync: true,
            ..Default::default()
        }
    }

    /// Wallet whose balance lookup always fails.
    pub fn failing_balance() -> Self {
        Self {
            fail_balance: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, WalletOperation)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ops(&self) -> Vec<WalletOperation> {
        self.calls().into_iter().map(|(_, op)| op).collect()
    }

    pub fn ops_for(&self, account_id: &str) -> Vec<WalletOperation> {
        self.calls()
            .into_iter()
            .filter(|(id, _)| id == account_id)
            .map(|(_, op)| op)
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.ops().iter().filter(|op| op.name() == name).count()
    }
}

#[async_trait]
impl WalletExecutor for MockWallet {
    async fn execute(
        &self,
        account: &Account,
        operation: WalletOperation,
    ) -> Result<WalletOutput, ToolError> {
        self.calls
            .lock()
            .unwrap()
            .push((account.id.clone(), operation.clone()));

        match operation {
            WalletOperation::Sync if self.fail_sync => Err(ToolError::Stderr {
                command: "miden sync".to_string(),
                stderr: "rpc unavailable".to_string(),
            }),
            WalletOperation::Sync => Ok(WalletOutput::Synced),
            WalletOperation::Balance { .. } if self.fail_balance => Err(ToolError::Stderr {
                command: "miden account --show".to_string(),
                stderr: "account not found".to_string(),
            }),
            WalletOperation::Balance { .. } => Ok(WalletOutput::Balance(self.balance)),
            WalletOperation::NotesList => Ok(WalletOutput::Notes(self.notes.clone())),
            WalletOperation::Consume { .. } => Ok(WalletOutput::Consumed(ConsumeOutcome::Consumed)),
            WalletOperation::Send(_) => Ok(WalletOutput::Sent),
        }
    }
}

pub fn account(id: &str) -> Account {
    Account::new(id, Visibility::Private, format!("clients/private/{}", id))
}

/// Config with every delay zeroed so tests run instantly.
pub fn fast_config(faucet_url: &str) -> MidenConfig {
    MidenConfig {
        faucet_url: faucet_url.to_string(),
        max_cycles: 1,
        task_interval_min: 0,
        task_interval_max: 0,
        retry_delay_ms: 0,
        faucet_settle_ms: 0,
        consume_settle_ms: 0,
        wallet_settle_ms: 0,
        http_timeout_secs: 5,
        rng_seed: Some(7),
        ..MidenConfig::default()
    }
}

pub fn fast_settings(faucet_url: &str) -> FaucetSettings {
    FaucetSettings::from_config(&fast_config(faucet_url))
}

pub fn challenge_body(difficulty: u32) -> serde_json::Value {
    serde_json::json!({
        "seed": "c0ffee",
        "difficulty": difficulty,
        "server_signature": "sig-123",
        "timestamp": 1718000000
    })
}

pub fn claim_body(note_id: &str) -> String {
    format!(
        "data: {{\"status\":\"minting\"}}\n\ndata: {{\"note_id\":\"{}\",\"tx_id\":\"0x1\"}}\n\n",
        note_id
    )
}
