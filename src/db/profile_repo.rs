//! Profile store seam.
//!
//! The arena only needs three things from persistence: two distinct
//! random profiles, a rating read, and an atomic per-row rating write.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Profile;

#[allow(async_fn_in_trait)]
pub trait ProfileStore {
    /// Two distinct random profiles, or `None` when the population is
    /// under two.
    async fn sample_pair(&self) -> Result<Option<(Profile, Profile)>>;

    /// Current rating of one profile.
    async fn rating(&self, id: Uuid) -> Result<i32>;

    /// Persist an updated rating (atomic single-row write).
    async fn store_rating(&self, id: Uuid, rating: i32) -> Result<()>;
}

#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProfileStore for PgProfileStore {
    async fn sample_pair(&self) -> Result<Option<(Profile, Profile)>> {
        // ORDER BY random() is fine at this table size; revisit with
        // TABLESAMPLE if profiles ever number in the millions.
        let rows: Vec<Profile> = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, name, linkedin_url, avatar_url, elo_rating, created_at
              FROM profiles
             ORDER BY random()
             LIMIT 2
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut rows = rows.into_iter();
        Ok(match (rows.next(), rows.next()) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        })
    }

    async fn rating(&self, id: Uuid) -> Result<i32> {
        let rating =
            sqlx::query_scalar::<_, i32>("SELECT elo_rating FROM profiles WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(rating)
    }

    async fn store_rating(&self, id: Uuid, rating: i32) -> Result<()> {
        sqlx::query("UPDATE profiles SET elo_rating = $2 WHERE id = $1")
            .bind(id)
            .bind(rating)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
