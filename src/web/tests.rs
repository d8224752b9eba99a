use crate::db;
use crate::domain::models::TestKind;
use crate::error::ApiError;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct NewTest {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: TestKind,
    pub description: Option<String>,
    #[serde(rename = "questionIds", default)]
    pub question_ids: Vec<Uuid>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/tests", get(list_tests).post(create_test))
        .route("/tests/:id", get(get_test))
        .route("/tests/:id/questions", get(test_questions))
        .with_state(state)
}

async fn list_tests(State(state): State<SharedState>) -> Result<Json<Vec<db::Test>>, ApiError> {
    let tests = db::list_tests(&state.pool).await?;
    Ok(Json(tests))
}

async fn get_test(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<db::Test>, ApiError> {
    let test = db::find_test(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Тест не найден"))?;
    Ok(Json(test))
}

async fn test_questions(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<db::TestQuestion>>, ApiError> {
    db::find_test(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Тест не найден"))?;

    let questions = db::questions_for_test(&state.pool, id).await?;
    Ok(Json(questions))
}

async fn create_test(
    State(state): State<SharedState>,
    Json(payload): Json<NewTest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Не указано название теста"));
    }

    let test = db::insert_test(
        &state.pool,
        &payload.title,
        payload.kind,
        payload.description.as_deref(),
        &payload.question_ids,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(test)))
}
