use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-worker loop settings shared by every chain spammer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamConfig {
    /// Number of task cycles a worker runs before it stops
    pub max_cycles: u32,
    /// Minimum cooldown between tasks in milliseconds
    pub task_interval_min: u64,
    /// Maximum cooldown between tasks in milliseconds
    pub task_interval_max: u64,
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            max_cycles: 5,
            task_interval_min: 8000,
            task_interval_max: 28000,
        }
    }
}

impl SpamConfig {
    /// Draw a cooldown uniformly from `[task_interval_min, task_interval_max]`.
    pub fn random_interval<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let lo = self.task_interval_min.min(self.task_interval_max);
        let hi = self.task_interval_max.max(self.task_interval_min);
        Duration::from_millis(rng.gen_range(lo..=hi))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Fallback filter when `RUST_LOG` is unset
    pub level: String,
    /// IANA timezone used for console timestamps
    pub timezone: String,
    /// Directory for the rolling log file
    pub directory: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            timezone: "Asia/Jakarta".to_string(),
            directory: "logs".to_string(),
        }
    }
}
