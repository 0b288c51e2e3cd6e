use crate::account::{truncate_address, Visibility};
use crate::tasks::{Task, TaskContext, TaskResult};
use crate::wallet::{SendRequest, WalletExecutorExt};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;

pub struct SendTokenTask;

#[async_trait]
impl Task<TaskContext> for SendTokenTask {
    fn name(&self) -> &str {
        "send"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<TaskResult> {
        let config = &ctx.config;

        let request = ctx.with_rng(|rng| {
            let target = ctx.recipients.choose(rng)?.clone();
            let amount = rng.gen_range(config.send_amount_min..=config.send_amount_max);
            let note_type = *Visibility::ALL.choose(rng)?;
            Some(SendRequest {
                target,
                amount,
                faucet_id: config.faucet_asset_id.clone(),
                note_type,
            })
        });

        let Some(request) = request else {
            return Ok(TaskResult::skipped("No recipients available"));
        };

        let balance = ctx
            .wallet
            .balance(&ctx.account, &config.faucet_asset_id)
            .await
            .context("Balance lookup failed")?;

        let amount = request.amount;
        match balance {
            None => return Ok(TaskResult::skipped("No balance for faucet asset")),
            Some(b) if b < amount as i64 => {
                return Ok(TaskResult::skipped(format!(
                    "Balance {} below amount {}",
                    b, amount
                )))
            }
            Some(_) => {}
        }

        let target = request.target.clone();
        let note_type = request.note_type;
        ctx.wallet
            .send(&ctx.account, request)
            .await
            .context("Send failed")?;

        Ok(TaskResult::success(format!(
            "Sent {} to {} as {} note",
            amount,
            truncate_address(&target),
            note_type
        ))
        .with_reference(target))
    }
}
