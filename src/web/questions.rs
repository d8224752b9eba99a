use crate::db;
use crate::error::ApiError;
use crate::state::SharedState;
use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct NewQuestion {
    /// Psychotype name the admin UI calls the question's "topic".
    pub topic: String,
    #[serde(rename = "questionText")]
    pub question_text: String,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: bool,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .with_state(state)
}

async fn list_questions(
    State(state): State<SharedState>,
) -> Result<Json<Vec<db::Question>>, ApiError> {
    let questions = db::list_questions(&state.pool).await?;
    Ok(Json(questions))
}

/// An unknown topic is 404, and the handler never reaches the insert.
fn resolve_topic(psychotype: Option<db::Psychotype>) -> Result<db::Psychotype, ApiError> {
    psychotype.ok_or(ApiError::NotFound("Психотип не найден"))
}

async fn create_question(
    State(state): State<SharedState>,
    Json(payload): Json<NewQuestion>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.question_text.trim().is_empty() {
        return Err(ApiError::Validation("Не указан текст вопроса"));
    }

    let psychotype =
        resolve_topic(db::find_psychotype_by_name(&state.pool, &payload.topic).await?)?;

    let question = db::insert_question(
        &state.pool,
        &payload.question_text,
        payload.correct_answer,
        psychotype.id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(question)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_unknown_topic_is_not_found() {
        let err = resolve_topic(None).unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Психотип не найден")));
    }

    #[test]
    fn test_known_topic_resolves() {
        let id = Uuid::new_v4();
        let psychotype = db::Psychotype {
            id,
            name: "ШИЗОИД".to_string(),
            description: None,
            created_at: Utc::now(),
        };

        assert_eq!(resolve_topic(Some(psychotype)).unwrap().id, id);
    }
}
