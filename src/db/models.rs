use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub linkedin_url: String,
    pub avatar_url: Option<String>,
    pub elo_rating: i32,
    pub created_at: DateTime<Utc>,
}
