use crate::tasks::{task_for, MidenTask, TaskContext};
use anyhow::Result;
use async_trait::async_trait;
use core_logic::traits::{Spammer, SpammerStats, TaskResult, TaskStatus};
use core_logic::SpamConfig;
use rand::seq::SliceRandom;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const MESSAGE_LIMIT: usize = 125;

/// Task loop for a single account.
///
/// Each cycle picks one enabled task uniformly, runs it to completion, logs
/// the outcome and cools down before the next cycle. Task errors are recorded
/// as failures and never end the loop early.
pub struct AccountSpammer {
    worker_id: usize,
    spam: SpamConfig,
    tasks: Vec<Box<MidenTask>>,
    ctx: TaskContext,
}

impl AccountSpammer {
    pub fn new(worker_id: usize, ctx: TaskContext) -> Self {
        let tasks = ctx.config.tasks.iter().copied().map(task_for).collect();
        Self {
            worker_id,
            spam: ctx.config.spam_config(),
            tasks,
            ctx,
        }
    }

    pub fn context(&self) -> &TaskContext {
        &self.ctx
    }

    fn log_result(&self, task: &str, result: &TaskResult, elapsed: Duration) {
        let status = match result.status {
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Skipped => "SKIPPED",
            TaskStatus::Failed => "FAILED",
        };
        let message = clip_message(&result.message);
        let secs = elapsed.as_secs_f64();

        match result.status {
            TaskStatus::Failed => warn!(
                target: "task_result",
                "[WK:{:03}][AC:{}] {} [{}] {} t:{:.1}s",
                self.worker_id,
                self.ctx.account.short(),
                status,
                task,
                message,
                secs
            ),
            _ => info!(
                target: "task_result",
                "[WK:{:03}][AC:{}] {} [{}] {} t:{:.1}s",
                self.worker_id,
                self.ctx.account.short(),
                status,
                task,
                message,
                secs
            ),
        }
    }
}

/// Flatten and clip a task message so result lines stay on one row.
pub fn clip_message(raw: &str) -> String {
    let flat = raw.replace('\n', " | ");
    if flat.chars().count() > MESSAGE_LIMIT {
        let truncated: String = flat.chars().take(MESSAGE_LIMIT - 3).collect();
        format!("{}...", truncated)
    } else {
        flat
    }
}

#[async_trait]
impl Spammer for AccountSpammer {
    fn label(&self) -> String {
        format!(
            "{}:{}",
            self.ctx.account.visibility,
            self.ctx.account.short()
        )
    }

    async fn start(&self) -> Result<SpammerStats> {
        let mut stats = SpammerStats::default();
        info!(
            "Worker {:03} started for {} ({} cycles)",
            self.worker_id,
            self.label(),
            self.spam.max_cycles
        );

        for _ in 0..self.spam.max_cycles {
            let Some(task) = self.ctx.with_rng(|rng| self.tasks.choose(rng)) else {
                warn!("No tasks enabled, stopping worker {:03}", self.worker_id);
                break;
            };

            let start_time = Instant::now();
            let result = match task.run(&self.ctx).await {
                Ok(result) => result,
                Err(e) => TaskResult::failed(format!("{:#}", e)),
            };
            stats.record(result.status);
            self.log_result(task.name(), &result, start_time.elapsed());

            let cooldown = self.ctx.with_rng(|rng| self.spam.random_interval(rng));
            tokio::time::sleep(cooldown).await;
        }

        info!(
            "Worker {:03} finished: {} success, {} skipped, {} failed",
            self.worker_id, stats.success, stats.skipped, stats.failed
        );
        Ok(stats)
    }
}
