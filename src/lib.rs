pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod services;

pub use config::Config;
pub use db::{create_pool, run_migrations};
pub use routes::{AppState, router};
