use anyhow::Result;
use async_trait::async_trait;
use core_logic::{SpammerStats, SpammerTrait, WorkerRunner};

struct FixedSpammer {
    label: String,
    stats: SpammerStats,
}

#[async_trait]
impl SpammerTrait for FixedSpammer {
    fn label(&self) -> String {
        self.label.clone()
    }

    async fn start(&self) -> Result<SpammerStats> {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        Ok(self.stats.clone())
    }
}

struct FailingSpammer;

#[async_trait]
impl SpammerTrait for FailingSpammer {
    fn label(&self) -> String {
        "broken".to_string()
    }

    async fn start(&self) -> Result<SpammerStats> {
        Err(anyhow::anyhow!("no working directory"))
    }
}

struct PanickingSpammer;

#[async_trait]
impl SpammerTrait for PanickingSpammer {
    fn label(&self) -> String {
        "panicky".to_string()
    }

    async fn start(&self) -> Result<SpammerStats> {
        panic!("worker blew up");
    }
}

#[tokio::test]
async fn test_runner_aggregates_all_workers() {
    let spammers: Vec<Box<dyn SpammerTrait>> = vec![
        Box::new(FixedSpammer {
            label: "a".to_string(),
            stats: SpammerStats {
                success: 2,
                skipped: 1,
                failed: 0,
            },
        }),
        Box::new(FixedSpammer {
            label: "b".to_string(),
            stats: SpammerStats {
                success: 1,
                skipped: 0,
                failed: 3,
            },
        }),
    ];

    let summary = WorkerRunner::run_spammers(spammers).await;

    assert_eq!(summary.workers, 2);
    assert_eq!(summary.totals.success, 3);
    assert_eq!(summary.totals.skipped, 1);
    assert_eq!(summary.totals.failed, 3);
    assert!(summary.failed_workers.is_empty());
}

#[tokio::test]
async fn test_runner_reports_failed_and_panicked_workers() {
    let spammers: Vec<Box<dyn SpammerTrait>> = vec![
        Box::new(FailingSpammer),
        Box::new(PanickingSpammer),
        Box::new(FixedSpammer {
            label: "healthy".to_string(),
            stats: SpammerStats {
                success: 1,
                skipped: 0,
                failed: 0,
            },
        }),
    ];

    let summary = WorkerRunner::run_spammers(spammers).await;

    assert_eq!(summary.totals.success, 1);
    assert_eq!(
        summary.failed_workers,
        vec!["broken".to_string(), "panicky".to_string()]
    );
}

#[tokio::test]
async fn test_runner_with_no_workers() {
    let summary = WorkerRunner::run_spammers(Vec::new()).await;

    assert_eq!(summary.workers, 0);
    assert_eq!(summary.success_rate(), 0.0);
}
