//! Battle arena core: pairing issue, result recording, rating update.

pub mod scoring;
pub mod tokens;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use crate::db::models::Profile;
use crate::db::profile_repo::ProfileStore;
use tokens::{BattleTokenAuthority, ConsumeError};

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("need at least two profiles to start a battle")]
    InsufficientPopulation,
    #[error(transparent)]
    Token(#[from] ConsumeError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// One blurred pairing handed to a client, plus the token that must
/// accompany its result.
#[derive(Debug, Serialize)]
pub struct Pairing {
    pub profile_a: Profile,
    pub profile_b: Profile,
    pub battle_token: String,
}

/// Updated ratings after a recorded battle.
#[derive(Debug, Serialize)]
pub struct BattleOutcome {
    pub new_winner_rating: i32,
    pub new_loser_rating: i32,
}

/// The two operations the HTTP layer calls. Generic over the profile
/// store so tests can swap in an in-memory one.
pub struct ArenaService<S> {
    store: S,
    tokens: Arc<BattleTokenAuthority>,
    k_factor: f64,
}

impl<S: Clone> Clone for ArenaService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            tokens: Arc::clone(&self.tokens),
            k_factor: self.k_factor,
        }
    }
}

impl<S: ProfileStore> ArenaService<S> {
    pub fn new(store: S, token_ttl: Duration, k_factor: f64) -> Self {
        Self {
            store,
            tokens: Arc::new(BattleTokenAuthority::new(token_ttl)),
            k_factor,
        }
    }

    /// Pick two distinct random profiles and mint a token for the pair.
    pub async fn issue_pairing(&self) -> Result<Pairing, ArenaError> {
        // Opportunistic hygiene; the interval sweeper also runs.
        self.tokens.sweep_expired();

        let (profile_a, profile_b) = self
            .store
            .sample_pair()
            .await?
            .ok_or(ArenaError::InsufficientPopulation)?;

        let battle_token = self.tokens.issue(profile_a.id, profile_b.id);
        log::debug!(
            "issued battle token for {} vs {}",
            profile_a.id,
            profile_b.id
        );

        Ok(Pairing {
            profile_a,
            profile_b,
            battle_token,
        })
    }

    /// Redeem `token` for a decided battle and apply the Elo update.
    ///
    /// The token must be live and bound to exactly `{winner_id,
    /// loser_id}`; redemption is atomic, so a duplicate submission can
    /// never count a battle twice.
    pub async fn record_battle(
        &self,
        token: &str,
        winner_id: Uuid,
        loser_id: Uuid,
    ) -> Result<BattleOutcome, ArenaError> {
        self.tokens.consume(token, winner_id, loser_id)?;

        let winner_rating = self.store.rating(winner_id).await?;
        let loser_rating = self.store.rating(loser_id).await?;
        let (new_winner_rating, new_loser_rating) =
            scoring::rating_update(winner_rating, loser_rating, self.k_factor);

        self.store.store_rating(winner_id, new_winner_rating).await?;
        self.store.store_rating(loser_id, new_loser_rating).await?;

        log::info!(
            "battle settled: {winner_id} {winner_rating}->{new_winner_rating}, \
             {loser_id} {loser_rating}->{new_loser_rating}"
        );

        Ok(BattleOutcome {
            new_winner_rating,
            new_loser_rating,
        })
    }

    /// Spawn the periodic expired-token sweep as a Tokio task.
    pub fn start_sweeper(&self, interval: Duration) {
        let tokens = Arc::clone(&self.tokens);
        tokio::spawn(async move {
            loop {
                sleep(interval).await;
                let before = tokens.outstanding();
                tokens.sweep_expired();
                let swept = before.saturating_sub(tokens.outstanding());
                if swept > 0 {
                    log::debug!("swept {swept} expired battle tokens");
                }
            }
        });
    }

    /// Live tokens right now (metrics / tests).
    pub fn outstanding_tokens(&self) -> usize {
        self.tokens.outstanding()
    }
}
