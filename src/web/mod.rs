pub mod auth;
pub mod questions;
pub mod reports;
pub mod results;
pub mod tests;

use crate::state::SharedState;
use axum::{routing::get, Router};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(auth::router(state.clone()))
        .merge(questions::router(state.clone()))
        .merge(tests::router(state.clone()))
        .merge(results::router(state.clone()))
        .merge(reports::router(state))
}
