use crate::tasks::{Task, TaskContext, TaskResult};
use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;

pub struct ClaimFaucetTask;

#[async_trait]
impl Task<TaskContext> for ClaimFaucetTask {
    fn name(&self) -> &str {
        "faucet"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<TaskResult> {
        let solver_seed: u64 = ctx.with_rng(|rng| rng.gen());
        match ctx.faucet.claim(&ctx.account, solver_seed).await {
            Ok(receipt) if receipt.consumed => Ok(TaskResult::success(format!(
                "Claimed and consumed note {}",
                receipt.note.short()
            ))
            .with_reference(receipt.note.as_str())),
            Ok(receipt) => Ok(TaskResult::success(format!(
                "Claimed note {}, consumption deferred",
                receipt.note.short()
            ))
            .with_reference(receipt.note.as_str())),
            Err(e) => Ok(TaskResult::failed(format!("Claim abandoned: {}", e))),
        }
    }
}
