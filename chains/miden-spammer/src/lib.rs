//! Miden Spammer - faucet and transfer activity bot for the Miden testnet
//!
//! Drives a pool of wallet accounts through randomized cycles of faucet
//! claims, peer transfers and note consumption.
//!
//! # Architecture
//!
//! - [`pow`]: proof-of-work solver for faucet challenges
//! - [`faucet`]: challenge fetch, claim submission and note consumption
//! - [`wallet`]: typed operations over the external wallet CLI
//! - [`tasks`]: the three task kinds a scheduler picks from
//! - [`spammer`]: per-account task loop
//! - [`orchestrator`]: account discovery and concurrent scheduling
//! - [`bootstrap`]: creation of new client directories and wallets
//!
//! # Quick Start
//!
//! ```bash
//! # Create two private/public client pairs
//! cargo run -p miden-spammer -- create --amount 2
//!
//! # Run every discovered account
//! cargo run -p miden-spammer -- run
//! ```

pub mod account;
pub mod bootstrap;
pub mod config;
pub mod faucet;
pub mod orchestrator;
pub mod pow;
pub mod spammer;
pub mod tasks;
pub mod wallet;

pub use account::{Account, AccountBook, NoteId, Visibility};
pub use config::{MidenConfig, TaskKind};
pub use faucet::{FaucetClient, FaucetError, FaucetSettings, PowChallenge};
pub use orchestrator::Orchestrator;
pub use spammer::AccountSpammer;
pub use wallet::{CliWalletExecutor, CommandRunner, MidenCli, WalletExecutor};
