//! Faucet client: PoW challenge, claim submission, and consumption of the
//! minted note.
//!
//! # Protocol
//!
//! 1. `GET /pow` returns a challenge (`seed`, `difficulty`, `server_signature`,
//!    `timestamp`); retried with a fixed delay on failure.
//! 2. The challenge is solved locally (see [`crate::pow`]).
//! 3. `GET /get_tokens?...` submits the claim with the solved nonce. A failed
//!    submission re-runs steps 1-3 within the same attempt budget.
//! 4. The last non-empty line of the response body, minus its 5-character
//!    prefix, is JSON carrying the `note_id`.
//! 5. After a settle delay the wallet is synced and the note consumed.

use crate::account::{Account, NoteId};
use crate::pow;
use crate::wallet::{ConsumeOutcome, WalletExecutor, WalletExecutorExt};
use core_logic::{with_retry_if, NetworkError, ParseError, RetryConfig, ToolError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, PRAGMA, USER_AGENT};
use serde::{Deserialize, Deserializer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const RESPONSE_PREFIX_LEN: usize = 5;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36 Edg/137.0.0.0";

#[derive(Error, Debug)]
pub enum FaucetError {
    #[error("PoW challenge unavailable: {0}")]
    Challenge(NetworkError),

    #[error("Claim submission failed: {0}")]
    Submission(NetworkError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Nonce {nonce} does not satisfy difficulty {difficulty} for seed {seed}")]
    InvalidSolution {
        seed: String,
        difficulty: u32,
        nonce: u64,
    },

    #[error("PoW solver stopped: {0}")]
    Solver(String),

    #[error("Wallet operation failed: {0}")]
    Wallet(#[from] ToolError),
}

impl FaucetError {
    /// Only a failed submission re-runs the claim; everything else abandons it.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FaucetError::Submission(_))
    }
}

/// Server-issued proof-of-work challenge
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PowChallenge {
    pub seed: String,
    #[serde(deserialize_with = "deserialize_difficulty")]
    pub difficulty: u32,
    pub server_signature: String,
    #[serde(deserialize_with = "deserialize_opaque")]
    pub timestamp: String,
}

impl PowChallenge {
    pub fn is_solved_by(&self, nonce: u64) -> bool {
        pow::verify(&self.seed, self.difficulty, nonce)
    }
}

fn deserialize_difficulty<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct DifficultyVisitor;

    impl serde::de::Visitor<'_> for DifficultyVisitor {
        type Value = u32;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a non-negative integer or numeric string")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u32::try_from(value).map_err(|_| E::custom("difficulty out of range"))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u32::try_from(value).map_err(|_| E::custom("negative difficulty"))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value
                .trim()
                .parse()
                .map_err(|_| E::custom("invalid difficulty"))
        }
    }

    deserializer.deserialize_any(DifficultyVisitor)
}

fn deserialize_opaque<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct ClaimEvent {
    note_id: String,
}

/// Extract the note id from a `/get_tokens` response body.
pub fn parse_claim_response(body: &str) -> Result<NoteId, ParseError> {
    let last = body
        .trim()
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .last()
        .ok_or_else(|| ParseError::invalid("claim response", "empty body"))?;

    let payload = last
        .get(RESPONSE_PREFIX_LEN..)
        .ok_or_else(|| ParseError::invalid("claim response", "last line shorter than prefix"))?;

    let event: ClaimEvent = serde_json::from_str(payload)
        .map_err(|e| ParseError::invalid("claim response", e.to_string()))?;

    Ok(NoteId::new(event.note_id))
}

#[derive(Debug, Clone)]
pub struct FaucetSettings {
    pub base_url: String,
    pub asset_amount: u64,
    pub private_note: bool,
    pub retry: RetryConfig,
    /// Wait before the post-claim sync and again before consumption
    pub settle: Duration,
    pub timeout: Duration,
}

impl FaucetSettings {
    pub fn from_config(config: &crate::config::MidenConfig) -> Self {
        Self {
            base_url: config.faucet_url.clone(),
            asset_amount: config.claim_amount,
            private_note: config.claim_private_note,
            retry: config.retry_config(),
            settle: config.faucet_settle(),
            timeout: config.http_timeout(),
        }
    }
}

/// What a completed claim produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimReceipt {
    pub note: NoteId,
    /// False when the post-claim sync failed and consumption was deferred
    pub consumed: bool,
}

pub struct FaucetClient {
    http: reqwest::Client,
    settings: FaucetSettings,
    wallet: Arc<dyn WalletExecutor>,
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert("dnt", HeaderValue::from_static("1"));
    headers.insert(
        "sec-ch-ua",
        HeaderValue::from_static(
            "\"Microsoft Edge\";v=\"137\", \"Chromium\";v=\"137\", \"Not(A:Brand\";v=\"24\"",
        ),
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Windows\""));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers
}

impl FaucetClient {
    pub fn new(settings: FaucetSettings, wallet: Arc<dyn WalletExecutor>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            http,
            settings,
            wallet,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn request_challenge(&self) -> Result<PowChallenge, FaucetError> {
        let endpoint = self.endpoint("pow");
        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| {
                FaucetError::Challenge(NetworkError::Transport {
                    endpoint: endpoint.clone(),
                    reason: e.to_string(),
                })
            })?;

        if !response.status().is_success() {
            return Err(FaucetError::Challenge(NetworkError::HttpStatus {
                status_code: response.status().as_u16(),
                endpoint,
            }));
        }

        let challenge: PowChallenge = response
            .json()
            .await
            .map_err(|e| ParseError::invalid("pow challenge", e.to_string()))?;

        if challenge.difficulty > pow::MAX_DIFFICULTY {
            return Err(ParseError::invalid(
                "pow challenge",
                format!("difficulty {} is unsatisfiable", challenge.difficulty),
            )
            .into());
        }

        Ok(challenge)
    }

    /// Fetch a challenge, retrying failed requests within the attempt budget.
    pub async fn fetch_challenge(&self, account: &Account) -> Result<PowChallenge, FaucetError> {
        let short = account.short();
        info!("{} is trying to get the pow challenge..", short);

        let challenge = with_retry_if(
            self.settings.retry,
            &format!("{} pow challenge", short),
            || self.request_challenge(),
            |e| matches!(e, FaucetError::Challenge(_)),
        )
        .await?;

        info!("{} successfully retrieved pow challenge data", short);
        Ok(challenge)
    }

    async fn submit(
        &self,
        account: &Account,
        challenge: &PowChallenge,
        nonce: u64,
    ) -> Result<String, FaucetError> {
        if !challenge.is_solved_by(nonce) {
            return Err(FaucetError::InvalidSolution {
                seed: challenge.seed.clone(),
                difficulty: challenge.difficulty,
                nonce,
            });
        }

        let endpoint = self.endpoint("get_tokens");
        let query = [
            ("account_id", account.id.clone()),
            ("is_private_note", self.settings.private_note.to_string()),
            ("asset_amount", self.settings.asset_amount.to_string()),
            ("pow_seed", challenge.seed.clone()),
            ("pow_solution", nonce.to_string()),
            ("pow_difficulty", challenge.difficulty.to_string()),
            ("server_signature", challenge.server_signature.clone()),
            ("server_timestamp", challenge.timestamp.clone()),
        ];

        let transport = |e: reqwest::Error| {
            FaucetError::Submission(NetworkError::Transport {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })
        };

        let response = self
            .http
            .get(&endpoint)
            .query(&query)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(FaucetError::Submission(NetworkError::HttpStatus {
                status_code: response.status().as_u16(),
                endpoint: endpoint.clone(),
            }));
        }

        response.text().await.map_err(transport)
    }

    /// One full pass of challenge, solve and submission.
    async fn claim_once(&self, account: &Account, solver_seed: u64) -> Result<NoteId, FaucetError> {
        let challenge = self.fetch_challenge(account).await?;

        let nonce = pow::solve_blocking(challenge.seed.clone(), challenge.difficulty, Some(solver_seed))
            .await
            .map_err(|e| FaucetError::Solver(e.to_string()))?;

        let body = self.submit(account, &challenge, nonce).await?;
        Ok(parse_claim_response(&body)?)
    }

    /// Claim tokens for `account` and consume the resulting note.
    ///
    /// Attempt `n` solves its challenge with nonces drawn from `solver_seed + n`.
    pub async fn claim(&self, account: &Account, solver_seed: u64) -> Result<ClaimReceipt, FaucetError> {
        let short = account.short();
        let attempt = AtomicU64::new(0);

        let note = with_retry_if(
            self.settings.retry,
            &format!("{} faucet claim", short),
            || {
                let n = attempt.fetch_add(1, Ordering::Relaxed);
                self.claim_once(account, solver_seed.wrapping_add(n))
            },
            FaucetError::is_retryable,
        )
        .await?;

        info!("{} Successfully received notes! ({})", short, note.short());

        tokio::time::sleep(self.settings.settle).await;
        if let Err(e) = self.wallet.sync(account).await {
            warn!("{} Sync after claim failed, leaving note for later: {}", short, e);
            return Ok(ClaimReceipt {
                note,
                consumed: false,
            });
        }

        tokio::time::sleep(self.settings.settle).await;
        let outcome = self.wallet.consume(account, &note).await?;

        info!("{} Successfully claiming faucet", short);
        Ok(ClaimReceipt {
            note,
            consumed: outcome == ConsumeOutcome::Consumed,
        })
    }
}
