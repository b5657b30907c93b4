//! Single-use battle tokens.
//!
//! Every pairing handed to a client carries a token bound to exactly
//! that pair of profile ids. A result submission is only accepted when
//! it redeems a live token for the same pair, so a client cannot replay
//! an old battle or submit two ids it was never shown. Token state is
//! in-memory on purpose: the window is short and a restart simply
//! invalidates whatever was outstanding.

use dashmap::DashMap;
use rand::RngCore;
use thiserror::Error;
use tokio::time::{Duration, Instant};
use uuid::Uuid;

/// Why a redemption was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeError {
    #[error("unknown or already redeemed battle token")]
    UnknownToken,
    #[error("battle token expired")]
    ExpiredToken,
    #[error("winner and loser are the same profile")]
    DegenerateSubmission,
    #[error("submitted profiles do not match the issued pair")]
    PairMismatch,
}

#[derive(Debug, Clone)]
struct BattleToken {
    pair: (Uuid, Uuid),
    expires_at: Instant,
}

/// Issues and redeems battle tokens. Owns its map so separate
/// instances (one per test, say) never share state.
pub struct BattleTokenAuthority {
    tokens: DashMap<String, BattleToken>,
    ttl: Duration,
}

impl BattleTokenAuthority {
    pub fn new(ttl: Duration) -> Self {
        Self {
            tokens: DashMap::new(),
            ttl,
        }
    }

    /// Mint a token redeemable once, for this pair only, until `ttl`
    /// elapses. 128 bits of entropy, hex-encoded.
    pub fn issue(&self, a: Uuid, b: Uuid) -> String {
        debug_assert_ne!(a, b);
        let mut raw = [0u8; 16];
        rand::rng().fill_bytes(&mut raw);
        let token = hex::encode(raw);

        self.tokens.insert(
            token.clone(),
            BattleToken {
                pair: (a, b),
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Validate and redeem `token` for the submitted result.
    ///
    /// Checks run in a fixed order and every failure is terminal for
    /// the call: unknown token, expired (entry dropped lazily),
    /// degenerate submission, pair mismatch. A mismatch leaves the
    /// token redeemable so the client may retry with the right pair
    /// inside the window.
    pub fn consume(&self, token: &str, winner: Uuid, loser: Uuid) -> Result<(), ConsumeError> {
        // Clone the entry out and release the shard guard before any
        // removal below, or the same-key remove would deadlock.
        let entry = match self.tokens.get(token) {
            Some(e) => e.value().clone(),
            None => return Err(ConsumeError::UnknownToken),
        };

        if Instant::now() >= entry.expires_at {
            self.tokens
                .remove_if(token, |_, t| Instant::now() >= t.expires_at);
            return Err(ConsumeError::ExpiredToken);
        }

        if winner == loser {
            return Err(ConsumeError::DegenerateSubmission);
        }

        let (a, b) = entry.pair;
        if !((winner == a && loser == b) || (winner == b && loser == a)) {
            return Err(ConsumeError::PairMismatch);
        }

        // Removal IS consumption. Of two racing redeemers exactly one
        // wins the remove; the loser lands here with `None` and reports
        // the token as unknown, same as any later attempt.
        match self.tokens.remove(token) {
            Some(_) => Ok(()),
            None => Err(ConsumeError::UnknownToken),
        }
    }

    /// Drop every expired entry. Hygiene only; `consume` rejects
    /// expired tokens whether or not a sweep got there first.
    pub fn sweep_expired(&self) {
        let now = Instant::now();
        self.tokens.retain(|_, t| t.expires_at > now);
    }

    /// Number of live (unredeemed, not yet swept) tokens.
    pub fn outstanding(&self) -> usize {
        self.tokens.len()
    }
}
