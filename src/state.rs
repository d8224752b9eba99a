use crate::services::completion::CompletionClient;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub completion: Arc<dyn CompletionClient>,
}

pub type SharedState = Arc<AppState>;
