use crate::tasks::{Task, TaskContext, TaskResult};
use crate::wallet::{ConsumeOutcome, WalletExecutorExt};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::seq::SliceRandom;

pub struct ConsumeNoteTask;

#[async_trait]
impl Task<TaskContext> for ConsumeNoteTask {
    fn name(&self) -> &str {
        "consume"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<TaskResult> {
        let notes = ctx
            .wallet
            .committed_notes(&ctx.account)
            .await
            .context("Listing notes failed")?;

        let Some(note) = ctx.with_rng(|rng| notes.choose(rng).cloned()) else {
            return Ok(TaskResult::skipped("No committed notes"));
        };

        let outcome = ctx
            .wallet
            .consume(&ctx.account, &note)
            .await
            .context("Consume failed")?;

        let result = match outcome {
            ConsumeOutcome::Consumed => {
                TaskResult::success(format!("Consumed note {}", note.short()))
            }
            ConsumeOutcome::SyncUnavailable => TaskResult::success(format!(
                "Sync unavailable, left note {} for later",
                note.short()
            )),
        };
        Ok(result.with_reference(note.as_str()))
    }
}
