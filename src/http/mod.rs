pub mod battle;
pub mod health;
pub mod routes;
