//! # Core Logic - Shared Utilities for Testnet Framework
//!
//! This crate provides shared utilities used across all chain implementations:
//! typed errors, worker traits, logging, retry and the concurrent runner.
//!
//! ## Modules
//!
//! - [`config`] - Configuration structures shared by every spammer
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Core trait definitions
//! - `utils` - Logger, retry helper and worker runner

pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

pub use config::{LogSettings, SpamConfig};
pub use error::{ConfigError, NetworkError, ParseError, ToolError};
pub use traits::{Spammer as SpammerTrait, SpammerStats, Task, TaskResult, TaskStatus};

pub use utils::{setup_logger, RunSummary, WorkerRunner};

pub use utils::retry::{with_retry, with_retry_if, RetryConfig};
