pub mod models;
pub mod profile_repo;
