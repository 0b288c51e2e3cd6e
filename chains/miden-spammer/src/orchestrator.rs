use crate::account::{discover_accounts, recipient_pool, Account, AccountBook};
use crate::config::MidenConfig;
use crate::faucet::{FaucetClient, FaucetSettings};
use crate::spammer::AccountSpammer;
use crate::tasks::TaskContext;
use crate::wallet::WalletExecutor;
use anyhow::Result;
use core_logic::traits::Spammer;
use core_logic::{RunSummary, WorkerRunner};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Seed for the k-th account's RNG, or `None` for entropy.
pub fn account_seed(base: Option<u64>, index: usize) -> Option<u64> {
    base.map(|s| s.wrapping_add(index as u64))
}

fn account_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Builds one scheduler per account and runs them all to completion.
pub struct Orchestrator {
    config: Arc<MidenConfig>,
    wallet: Arc<dyn WalletExecutor>,
    faucet: Arc<FaucetClient>,
}

impl Orchestrator {
    pub fn new(config: MidenConfig, wallet: Arc<dyn WalletExecutor>) -> Result<Self> {
        let faucet = FaucetClient::new(FaucetSettings::from_config(&config), wallet.clone())?;
        Ok(Self {
            config: Arc::new(config),
            wallet,
            faucet: Arc::new(faucet),
        })
    }

    /// Accounts that have both a saved id and a client directory, plus every
    /// saved id (private first) for recipient pools.
    pub fn discover(&self) -> (Vec<Account>, Vec<String>) {
        let book = AccountBook::load(
            &self.config.public_accounts_file,
            &self.config.private_accounts_file,
        );
        let accounts = discover_accounts(&self.config.clients_dir, &book);
        (accounts, book.all_ids())
    }

    pub fn build_spammers(&self, accounts: Vec<Account>, all_ids: &[String]) -> Vec<AccountSpammer> {
        accounts
            .into_iter()
            .enumerate()
            .map(|(k, account)| {
                let recipients = Arc::new(recipient_pool(all_ids, &account.id));
                let rng = account_rng(account_seed(self.config.rng_seed, k));
                let ctx = TaskContext {
                    account,
                    recipients,
                    faucet: self.faucet.clone(),
                    wallet: self.wallet.clone(),
                    config: self.config.clone(),
                    rng: Mutex::new(rng),
                };
                AccountSpammer::new(k + 1, ctx)
            })
            .collect()
    }

    /// Run the given accounts concurrently and wait for every one of them.
    pub async fn run_accounts(&self, accounts: Vec<Account>, all_ids: &[String]) -> RunSummary {
        let spammers: Vec<Box<dyn Spammer>> = self
            .build_spammers(accounts, all_ids)
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn Spammer>)
            .collect();

        WorkerRunner::run_spammers(spammers).await
    }

    pub async fn run(&self) -> RunSummary {
        let (accounts, all_ids) = self.discover();
        if accounts.is_empty() {
            warn!(
                "No accounts found under {}. Run `create` first.",
                self.config.clients_dir.display()
            );
            return RunSummary::default();
        }

        info!(
            "Discovered {} accounts ({} known ids)",
            accounts.len(),
            all_ids.len()
        );
        self.run_accounts(accounts, &all_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_offset_by_account_index() {
        assert_eq!(account_seed(Some(10), 0), Some(10));
        assert_eq!(account_seed(Some(10), 3), Some(13));
        assert_eq!(account_seed(Some(u64::MAX), 1), Some(0));
        assert_eq!(account_seed(None, 3), None);
    }

    #[test]
    fn seeded_rngs_are_reproducible() {
        use rand::Rng;
        let a: u64 = account_rng(Some(7)).gen();
        let b: u64 = account_rng(Some(7)).gen();
        assert_eq!(a, b);
    }
}
