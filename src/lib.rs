pub mod bot;
pub mod config;
pub mod db;
pub mod migrate;
pub mod observability;
pub mod routes;

pub use config::Config;
pub use db::create_pool;
pub use routes::{AppState, router};
