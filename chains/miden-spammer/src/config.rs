//! Configuration loader for miden-spammer

use core_logic::{ConfigError, LogSettings, RetryConfig, SpamConfig};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where a loaded [`MidenConfig`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Defaults,
}

/// Kinds of work a scheduler can pick each cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Faucet,
    Send,
    Consume,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Faucet, TaskKind::Send, TaskKind::Consume];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Faucet => "faucet",
            TaskKind::Send => "send",
            TaskKind::Consume => "consume",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the miden spammer
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MidenConfig {
    /// Base URL of the faucet service (`/pow` and `/get_tokens` live below it)
    pub faucet_url: String,
    /// Faucet account whose fungible asset is claimed and transferred
    pub faucet_asset_id: String,
    /// Amount requested per faucet claim
    pub claim_amount: u64,
    /// Whether the faucet should mint a private note
    pub claim_private_note: bool,
    /// Network passed to `init --network`
    pub network: String,
    /// Wallet CLI executable
    pub cli_binary: String,
    /// Task cycles per account per run
    pub max_cycles: u32,
    /// Minimum cooldown between tasks in milliseconds
    pub task_interval_min: u64,
    /// Maximum cooldown between tasks in milliseconds
    pub task_interval_max: u64,
    pub send_amount_min: u64,
    pub send_amount_max: u64,
    /// Attempts for challenge fetch and for the whole claim
    pub max_attempts: u32,
    /// Fixed delay between attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Wait after a claim before sync and again before consumption
    pub faucet_settle_ms: u64,
    /// Wait after consuming a note before the trailing sync
    pub consume_settle_ms: u64,
    /// Wait between bootstrap steps
    pub wallet_settle_ms: u64,
    pub http_timeout_secs: u64,
    /// Task kinds the scheduler chooses from, uniformly
    pub tasks: Vec<TaskKind>,
    /// Seed for reproducible runs; account k uses `seed + k`
    pub rng_seed: Option<u64>,
    pub clients_dir: PathBuf,
    pub public_accounts_file: PathBuf,
    pub private_accounts_file: PathBuf,
    pub log_level: String,
    pub log_timezone: String,
}

impl Default for MidenConfig {
    fn default() -> Self {
        Self {
            faucet_url: "https://faucet.testnet.miden.io".to_string(),
            faucet_asset_id: "mtst1qzm09dk5guhtjgqqqzzzp8f2fvkz9vtx".to_string(),
            claim_amount: 1000,
            claim_private_note: false,
            network: "testnet".to_string(),
            cli_binary: "miden".to_string(),
            max_cycles: 5,
            task_interval_min: 8000,
            task_interval_max: 28000,
            send_amount_min: 1,
            send_amount_max: 52,
            max_attempts: 3,
            retry_delay_ms: 15000,
            faucet_settle_ms: 10000,
            consume_settle_ms: 15000,
            wallet_settle_ms: 15000,
            http_timeout_secs: 60,
            tasks: TaskKind::ALL.to_vec(),
            rng_seed: None,
            clients_dir: PathBuf::from("clients"),
            public_accounts_file: PathBuf::from("publicAccountId.txt"),
            private_accounts_file: PathBuf::from("privateAccountId.txt"),
            log_level: "info".to_string(),
            log_timezone: "Asia/Jakarta".to_string(),
        }
    }
}

impl MidenConfig {
    /// Load configuration from a TOML file
    ///
    /// # Example
    /// ```ignore
    /// let config = MidenConfig::from_path("config/config.toml")?;
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            return Err(ConfigError::FileNotFound { path: display });
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: display.clone(),
            msg: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Parse { reason, .. } => ConfigError::Parse {
                path: display,
                reason,
            },
            other => other,
        })
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    ///
    /// Nothing is logged here; the caller reports the source once logging is up.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<(Self, ConfigSource), ConfigError> {
        match Self::from_path(path) {
            Ok(config) => Ok((config, ConfigSource::File)),
            Err(ConfigError::FileNotFound { .. }) => Ok((Self::default(), ConfigSource::Defaults)),
            Err(e) => Err(e),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.faucet_url.starts_with("http") {
            return Err(invalid("faucet_url", "must be an http(s) URL"));
        }
        if self.faucet_asset_id.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "faucet_asset_id".to_string(),
            });
        }
        if self.max_cycles == 0 {
            return Err(invalid("max_cycles", "must be greater than 0"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be greater than 0"));
        }
        if self.task_interval_min > self.task_interval_max {
            return Err(invalid(
                "task_interval_min",
                "must not exceed task_interval_max",
            ));
        }
        if self.send_amount_min == 0 || self.send_amount_min > self.send_amount_max {
            return Err(invalid(
                "send_amount_min",
                "must be at least 1 and not exceed send_amount_max",
            ));
        }
        if self.tasks.is_empty() {
            return Err(invalid("tasks", "at least one task kind is required"));
        }
        Ok(())
    }

    pub fn spam_config(&self) -> SpamConfig {
        SpamConfig {
            max_cycles: self.max_cycles,
            task_interval_min: self.task_interval_min,
            task_interval_max: self.task_interval_max,
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::fixed(self.max_attempts, self.retry_delay_ms)
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.log_level.clone(),
            timezone: self.log_timezone.clone(),
            ..LogSettings::default()
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn faucet_settle(&self) -> Duration {
        Duration::from_millis(self.faucet_settle_ms)
    }

    pub fn consume_settle(&self) -> Duration {
        Duration::from_millis(self.consume_settle_ms)
    }

    pub fn wallet_settle(&self) -> Duration {
        Duration::from_millis(self.wallet_settle_ms)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
