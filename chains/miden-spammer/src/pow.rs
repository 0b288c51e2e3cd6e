//! Proof-of-work solver for faucet challenges.
//!
//! A nonce solves a challenge when the hex SHA3-256 digest of
//! `seed ++ nonce.to_string()` starts with `difficulty` `'0'` characters.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha3::{Digest, Sha3_256};

/// Largest nonce candidate; the faucet's browser client never exceeds it.
pub const MAX_NONCE: u64 = (1 << 53) - 1;

/// A SHA3-256 hex digest has 64 characters, so no nonce can satisfy more.
pub const MAX_DIFFICULTY: u32 = 64;

pub fn digest_hex(seed: &str, nonce: u64) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(seed.as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

pub fn meets_difficulty(digest_hex: &str, difficulty: u32) -> bool {
    let required = difficulty as usize;
    digest_hex.len() >= required && digest_hex.bytes().take(required).all(|b| b == b'0')
}

pub fn verify(seed: &str, difficulty: u32, nonce: u64) -> bool {
    meets_difficulty(&digest_hex(seed, nonce), difficulty)
}

/// Draw random nonces until one satisfies the challenge.
///
/// Never returns for `difficulty > MAX_DIFFICULTY`; callers validate first.
pub fn solve<R: Rng + ?Sized>(seed: &str, difficulty: u32, rng: &mut R) -> u64 {
    loop {
        let nonce = rng.gen_range(0..=MAX_NONCE);
        if verify(seed, difficulty, nonce) {
            return nonce;
        }
    }
}

/// Run [`solve`] on the blocking pool so async workers keep making progress.
pub async fn solve_blocking(
    seed: String,
    difficulty: u32,
    rng_seed: Option<u64>,
) -> Result<u64, tokio::task::JoinError> {
    tokio::task::spawn_blocking(move || {
        let mut rng = match rng_seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        solve(&seed, difficulty, &mut rng)
    })
    .await
}
