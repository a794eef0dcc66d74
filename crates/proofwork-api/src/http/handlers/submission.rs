//! Submission handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use proofwork_core::service::page_request;
use proofwork_types::page::Page;
use proofwork_types::submission::{CreateSubmissionRequest, Submission, SubmissionId};
use proofwork_types::vacancy::VacancyId;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentPrincipal;
use crate::http::extractors::query::PageQuery;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// POST /api/v1/vacancies/{id}/submissions - Respond to a published vacancy.
pub async fn create_submission(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(vacancy_id): Path<VacancyId>,
    Json(body): Json<CreateSubmissionRequest>,
) -> Result<Response, AppError> {
    let clock = RequestClock::start();
    let submission = state
        .submissions
        .create_submission(&principal, &vacancy_id, body)
        .await?;

    let location = format!("/api/v1/submissions/{}", submission.id);
    let resp = clock
        .finish(submission)
        .with_link("self", &location)
        .with_link("vacancy", &format!("/api/v1/vacancies/{vacancy_id}"));
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(resp)).into_response())
}

/// GET /api/v1/vacancies/{id}/submissions - For the vacancy owner.
pub async fn list_for_vacancy(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(vacancy_id): Path<VacancyId>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<Submission>>>, AppError> {
    let clock = RequestClock::start();
    let page = page_request(&state.config, query.page, query.size);
    let submissions = state
        .submissions
        .list_for_vacancy(&principal, &vacancy_id, page)
        .await?;

    Ok(Json(clock.finish(submissions)))
}

/// GET /api/v1/submissions/{id}
pub async fn get_submission(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<SubmissionId>,
) -> Result<Json<ApiResponse<Submission>>, AppError> {
    let clock = RequestClock::start();
    let submission = state.submissions.get_submission(&principal, &id).await?;

    Ok(Json(clock.finish(submission)))
}
