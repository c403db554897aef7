use axum::{
    Router,
    routing::{get, post},
};
use sqlx::SqlitePool;

mod health;
mod interactions;

pub use interactions::{Interaction, InteractionResponse};

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub bot: crate::bot::Bot,
    pub pool: SqlitePool,
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/interactions", post(interactions::handle))
        .with_state(app_state)
}
