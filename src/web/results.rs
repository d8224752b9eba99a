use crate::db::{self, NewResult};
use crate::error::ApiError;
use crate::services::report;
use crate::state::SharedState;
use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use serde::Serialize;

/// Echo of the completion service's message, as the submitting client
/// renders it directly.
#[derive(Serialize)]
pub struct ReportMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Serialize)]
pub struct SubmissionResponse {
    #[serde(rename = "responseText")]
    pub response_text: ReportMessage,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/results", post(submit_results))
        .with_state(state)
}

/// Records a batch of answers and turns the attempt into a stored
/// narrative report. The attempt is identified by the first entry's
/// (test_id, user_id); the tally covers every answer recorded for that
/// pair, so resubmission double-counts. Answer rows are written before
/// the completion call and survive its failure; the report row does not
/// exist unless the call succeeded.
async fn submit_results(
    State(state): State<SharedState>,
    Json(answers): Json<Vec<NewResult>>,
) -> Result<impl IntoResponse, ApiError> {
    let first = answers
        .first()
        .ok_or(ApiError::Validation("Нет данных для сохранения"))?;
    let (test_id, user_id) = (first.test_id, first.user_id);

    db::insert_results(&state.pool, &answers).await?;
    tracing::info!(%test_id, %user_id, "stored {} answers", answers.len());

    let content =
        report::generate_report(&state.pool, state.completion.as_ref(), test_id, user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            response_text: ReportMessage {
                role: "assistant",
                content,
            },
        }),
    ))
}
