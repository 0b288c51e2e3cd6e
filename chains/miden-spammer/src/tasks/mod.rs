use crate::account::Account;
use crate::config::{MidenConfig, TaskKind};
use crate::faucet::FaucetClient;
use crate::wallet::WalletExecutor;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, PoisonError};

pub mod t01_claim_faucet;
pub mod t02_send_token;
pub mod t03_consume_note;

pub use self::t01_claim_faucet::ClaimFaucetTask;
pub use self::t02_send_token::SendTokenTask;
pub use self::t03_consume_note::ConsumeNoteTask;

pub use core_logic::traits::{Task, TaskResult};

/// Everything one account's tasks need, owned by that account's scheduler.
pub struct TaskContext {
    pub account: Account,
    /// Other known accounts, self excluded
    pub recipients: Arc<Vec<String>>,
    pub faucet: Arc<FaucetClient>,
    pub wallet: Arc<dyn WalletExecutor>,
    pub config: Arc<MidenConfig>,
    pub rng: Mutex<StdRng>,
}

impl TaskContext {
    /// Borrow the scheduler's RNG for a synchronous draw.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

pub type MidenTask = dyn Task<TaskContext> + Send + Sync;

pub fn task_for(kind: TaskKind) -> Box<MidenTask> {
    match kind {
        TaskKind::Faucet => Box::new(ClaimFaucetTask),
        TaskKind::Send => Box::new(SendTokenTask),
        TaskKind::Consume => Box::new(ConsumeNoteTask),
    }
}
