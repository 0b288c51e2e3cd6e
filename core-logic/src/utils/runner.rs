use crate::traits::{Spammer, SpammerStats};
use std::collections::HashMap;
use tokio::task::JoinSet;
use tracing::{error, info, Instrument};

/// Aggregated outcome of one orchestrated run.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub workers: usize,
    pub totals: SpammerStats,
    /// Labels of workers that returned an error or panicked
    pub failed_workers: Vec<String>,
}

impl RunSummary {
    pub fn success_rate(&self) -> f64 {
        let total = self.totals.total();
        if total > 0 {
            (self.totals.success as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

pub struct WorkerRunner;

impl WorkerRunner {
    /// Spawns every spammer as a concurrent task and waits for all of them.
    ///
    /// Workers are independent: one failing or panicking worker is recorded in
    /// the summary and never stops the others.
    pub async fn run_spammers(spammers: Vec<Box<dyn Spammer>>) -> RunSummary {
        let mut set = JoinSet::new();
        let mut labels = HashMap::new();
        let mut summary = RunSummary {
            workers: spammers.len(),
            ..Default::default()
        };

        let start_time = std::time::Instant::now();
        info!("Starting {} spammer workers...", spammers.len());

        for (i, spammer) in spammers.into_iter().enumerate() {
            let id = i + 1;
            let label = spammer.label();
            let span = tracing::info_span!("worker", worker_id = format!("{:03}", id));

            let handle = set.spawn(
                async move {
                    match spammer.start().await {
                        Ok(stats) => Ok(stats),
                        Err(e) => {
                            error!("Worker {} failed: {:#}", id, e);
                            Err(e)
                        }
                    }
                }
                .instrument(span),
            );
            labels.insert(handle.id(), label);
        }

        while let Some(res) = set.join_next_with_id().await {
            let label_of = |id: tokio::task::Id| {
                labels
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| id.to_string())
            };
            match res {
                Ok((_, Ok(stats))) => {
                    summary.totals.success += stats.success;
                    summary.totals.skipped += stats.skipped;
                    summary.totals.failed += stats.failed;
                }
                Ok((task_id, Err(_))) => {
                    summary.failed_workers.push(label_of(task_id));
                }
                Err(e) => {
                    error!("A worker task panicked or failed to join: {:?}", e);
                    summary.failed_workers.push(label_of(e.id()));
                }
            }
        }
        summary.failed_workers.sort();

        let total_duration = start_time.elapsed();
        info!("All process done!");
        info!(
            "Total Time: {:.1}s | Success: {} | Skipped: {} | Fail: {} | Success Rate: {:.2}%",
            total_duration.as_secs_f64(),
            summary.totals.success,
            summary.totals.skipped,
            summary.totals.failed,
            summary.success_rate()
        );

        summary
    }
}
