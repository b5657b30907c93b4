//! Battle pairing & result endpoints.

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use uuid::Uuid;

use crate::arena::tokens::ConsumeError;
use crate::arena::{ArenaError, ArenaService};
use crate::db::profile_repo::PgProfileStore;

/// Body for POST /api/battles/record.
#[derive(Deserialize)]
pub struct RecordRequest {
    pub winner_id: Uuid,
    pub loser_id: Uuid,
    pub battle_token: String,
}

/// GET /api/battle/pair
#[get("/battle/pair")]
pub async fn battle_pair(arena: web::Data<ArenaService<PgProfileStore>>) -> impl Responder {
    match arena.issue_pairing().await {
        Ok(pairing) => HttpResponse::Ok().json(pairing),
        Err(e) => error_response(e),
    }
}

/// POST /api/battles/record
#[post("/battles/record")]
pub async fn record_battle(
    info: web::Json<RecordRequest>,
    arena: web::Data<ArenaService<PgProfileStore>>,
) -> impl Responder {
    match arena
        .record_battle(&info.battle_token, info.winner_id, info.loser_id)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(e),
    }
}

fn error_response(err: ArenaError) -> HttpResponse {
    match err {
        ArenaError::InsufficientPopulation => {
            HttpResponse::Conflict().body("Not enough profiles for a battle")
        }
        ArenaError::Token(ConsumeError::UnknownToken) => {
            HttpResponse::NotFound().body("Invalid or already redeemed battle token")
        }
        ArenaError::Token(ConsumeError::ExpiredToken) => {
            HttpResponse::Gone().body("Battle token expired; request a new pairing")
        }
        ArenaError::Token(ConsumeError::DegenerateSubmission) => {
            HttpResponse::UnprocessableEntity().body("Winner and loser must differ")
        }
        ArenaError::Token(ConsumeError::PairMismatch) => {
            HttpResponse::UnprocessableEntity().body("Submitted profiles do not match the pairing")
        }
        ArenaError::Store(e) => {
            log::error!("profile store failure: {e:?}");
            HttpResponse::InternalServerError().body("DB error")
        }
    }
}

/// Mount
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(battle_pair).service(record_battle);
}
