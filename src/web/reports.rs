use crate::db::{self, ReportView};
use crate::error::ApiError;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/reports/:user_id", get(reports_for_user))
        .route("/report/:id", get(report_by_id))
        .with_state(state)
}

/// A user with no reports gets 404, not an empty array. The shipped
/// client treats that status as "no reports yet".
fn require_reports(reports: Vec<ReportView>) -> Result<Vec<ReportView>, ApiError> {
    if reports.is_empty() {
        return Err(ApiError::NotFound("Нет отчетов для данного пользователя"));
    }
    Ok(reports)
}

async fn reports_for_user(
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ReportView>>, ApiError> {
    let reports = require_reports(db::reports_for_user(&state.pool, user_id).await?)?;
    Ok(Json(reports))
}

async fn report_by_id(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportView>, ApiError> {
    let report = db::find_report(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("Отчет не найден"))?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_reports_is_not_found() {
        let err = require_reports(vec![]).unwrap_err();
        assert!(matches!(
            err,
            ApiError::NotFound("Нет отчетов для данного пользователя")
        ));
    }

    #[test]
    fn test_existing_reports_pass_through() {
        let reports = vec![ReportView {
            report_content: "Доминирующий психотип: ШИЗОИД".to_string(),
            test_title: "Малый тест".to_string(),
        }];

        let passed = require_reports(reports).unwrap();
        assert_eq!(passed.len(), 1);
        assert_eq!(passed[0].test_title, "Малый тест");
    }
}
