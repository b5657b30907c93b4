//! End-to-end arena flows against an in-memory profile store.

use std::sync::{Arc, Mutex};

use aura_arena::arena::tokens::ConsumeError;
use aura_arena::arena::{ArenaError, ArenaService};
use aura_arena::db::models::Profile;
use aura_arena::db::profile_repo::ProfileStore;
use chrono::Utc;
use tokio::time::Duration;
use uuid::Uuid;

/// Store double: hands out the first two profiles and keeps rating
/// writes visible to the test.
#[derive(Clone, Default)]
struct MemStore {
    profiles: Arc<Mutex<Vec<Profile>>>,
}

impl MemStore {
    fn add(&self, rating: i32) -> Uuid {
        let id = Uuid::new_v4();
        self.profiles.lock().unwrap().push(Profile {
            id,
            name: format!("profile-{id}"),
            linkedin_url: format!("https://linkedin.com/in/{id}"),
            avatar_url: None,
            elo_rating: rating,
            created_at: Utc::now(),
        });
        id
    }

    fn rating_of(&self, id: Uuid) -> i32 {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .expect("profile exists")
            .elo_rating
    }
}

impl ProfileStore for MemStore {
    async fn sample_pair(&self) -> anyhow::Result<Option<(Profile, Profile)>> {
        let profiles = self.profiles.lock().unwrap();
        Ok(match (profiles.first(), profiles.get(1)) {
            (Some(a), Some(b)) => Some((a.clone(), b.clone())),
            _ => None,
        })
    }

    async fn rating(&self, id: Uuid) -> anyhow::Result<i32> {
        Ok(self.rating_of(id))
    }

    async fn store_rating(&self, id: Uuid, rating: i32) -> anyhow::Result<()> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .expect("profile exists");
        profile.elo_rating = rating;
        Ok(())
    }
}

fn arena(store: &MemStore) -> ArenaService<MemStore> {
    ArenaService::new(store.clone(), Duration::from_secs(60), 32.0)
}

#[tokio::test]
async fn full_battle_flow_updates_both_ratings() {
    let store = MemStore::default();
    let a = store.add(1000);
    let b = store.add(1000);
    let svc = arena(&store);

    let pairing = svc.issue_pairing().await.unwrap();
    assert_ne!(pairing.profile_a.id, pairing.profile_b.id);
    assert_eq!(svc.outstanding_tokens(), 1);

    let outcome = svc
        .record_battle(&pairing.battle_token, a, b)
        .await
        .unwrap();
    assert_eq!(outcome.new_winner_rating, 1016);
    assert_eq!(outcome.new_loser_rating, 984);
    assert_eq!(store.rating_of(a), 1016);
    assert_eq!(store.rating_of(b), 984);
    assert_eq!(svc.outstanding_tokens(), 0);
}

#[tokio::test]
async fn replayed_token_cannot_double_count() {
    let store = MemStore::default();
    let a = store.add(1000);
    let b = store.add(1000);
    let svc = arena(&store);

    let pairing = svc.issue_pairing().await.unwrap();
    svc.record_battle(&pairing.battle_token, a, b)
        .await
        .unwrap();

    let err = svc
        .record_battle(&pairing.battle_token, a, b)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ArenaError::Token(ConsumeError::UnknownToken)
    ));
    // ratings unchanged by the replay
    assert_eq!(store.rating_of(a), 1016);
    assert_eq!(store.rating_of(b), 984);
}

#[tokio::test]
async fn submission_without_issued_token_never_touches_ratings() {
    let store = MemStore::default();
    let a = store.add(1500);
    let b = store.add(900);
    let svc = arena(&store);

    let err = svc
        .record_battle("0123456789abcdef0123456789abcdef", a, b)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ArenaError::Token(ConsumeError::UnknownToken)
    ));
    assert_eq!(store.rating_of(a), 1500);
    assert_eq!(store.rating_of(b), 900);
}

#[tokio::test]
async fn pairing_needs_two_profiles() {
    let store = MemStore::default();
    let svc = arena(&store);
    assert!(matches!(
        svc.issue_pairing().await.unwrap_err(),
        ArenaError::InsufficientPopulation
    ));

    store.add(1000);
    assert!(matches!(
        svc.issue_pairing().await.unwrap_err(),
        ArenaError::InsufficientPopulation
    ));

    store.add(1000);
    assert!(svc.issue_pairing().await.is_ok());
}

#[tokio::test]
async fn mismatched_result_leaves_token_and_ratings_alone() {
    let store = MemStore::default();
    let a = store.add(1000);
    let b = store.add(1000);
    let outsider = Uuid::new_v4();
    let svc = arena(&store);

    let pairing = svc.issue_pairing().await.unwrap();
    let err = svc
        .record_battle(&pairing.battle_token, a, outsider)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ArenaError::Token(ConsumeError::PairMismatch)
    ));
    assert_eq!(store.rating_of(a), 1000);
    assert_eq!(store.rating_of(b), 1000);

    // the same token still settles the real pairing
    assert!(svc.record_battle(&pairing.battle_token, a, b).await.is_ok());
}

#[tokio::test]
async fn expired_token_is_refused_by_the_service() {
    let store = MemStore::default();
    let a = store.add(1000);
    let b = store.add(1000);
    let svc = ArenaService::new(store.clone(), Duration::ZERO, 32.0);

    let pairing = svc.issue_pairing().await.unwrap();
    let err = svc
        .record_battle(&pairing.battle_token, a, b)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ArenaError::Token(ConsumeError::ExpiredToken)
    ));
    assert_eq!(store.rating_of(a), 1000);
    assert_eq!(store.rating_of(b), 1000);
}

#[tokio::test]
async fn ratings_accumulate_across_battles() {
    let store = MemStore::default();
    let a = store.add(1000);
    let b = store.add(1000);
    let svc = arena(&store);

    let first = svc.issue_pairing().await.unwrap();
    svc.record_battle(&first.battle_token, a, b).await.unwrap();

    let second = svc.issue_pairing().await.unwrap();
    let outcome = svc.record_battle(&second.battle_token, a, b).await.unwrap();

    // a is now the favorite, so the second win is worth less
    assert!(outcome.new_winner_rating - 1016 < 16);
    assert!(outcome.new_winner_rating > 1016);
    assert_eq!(store.rating_of(a), outcome.new_winner_rating);
    assert_eq!(store.rating_of(b), outcome.new_loser_rating);
}
