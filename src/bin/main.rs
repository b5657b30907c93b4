use actix_web::{middleware::Logger, web, App, HttpServer};
use aura_arena::{arena::ArenaService, config::settings, db::profile_repo::PgProfileStore, http, metrics};
use sqlx::postgres::PgPoolOptions;
use std::env;
use tokio::time::Duration;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Configuration
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:4000".into());

    // Postgres pool
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create Postgres pool");

    // Arena core: token authority + rating engine over the profile table
    let arena = ArenaService::new(
        PgProfileStore::new(db_pool.clone()),
        Duration::from_secs(settings().battle_token_ttl),
        settings().k_factor,
    );
    arena.start_sweeper(Duration::from_secs(settings().sweep_interval));

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(metrics::METRICS.clone())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(arena.clone()))
            .configure(http::routes::init_routes)
    })
    .bind(&server_addr)?
    .run()
    .await
}
