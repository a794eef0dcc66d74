//! Vacancy handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use proofwork_core::service::page_request;
use proofwork_types::page::Page;
use proofwork_types::vacancy::{
    CreateVacancyRequest, ModifyVacancyRequest, Vacancy, VacancyDetail, VacancyId,
};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentPrincipal;
use crate::http::extractors::query::PageQuery;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// POST /api/v1/vacancies - Create a vacancy owned by the caller.
///
/// Responds 201 with a `Location` header pointing at the new vacancy.
pub async fn create_vacancy(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Json(body): Json<CreateVacancyRequest>,
) -> Result<Response, AppError> {
    let clock = RequestClock::start();
    let vacancy = state.vacancies.create_vacancy(&principal, body).await?;

    let location = format!("/api/v1/vacancies/{}", vacancy.id);
    let resp = clock.finish(vacancy).with_link("self", &location);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(resp)).into_response())
}

/// GET /api/v1/vacancies - Published vacancies, most recent first.
pub async fn list_published(
    State(state): State<AppState>,
    CurrentPrincipal(_principal): CurrentPrincipal,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<Vacancy>>>, AppError> {
    let clock = RequestClock::start();
    let page = page_request(&state.config, query.page, query.size);
    let vacancies = state.vacancies.list_published(page).await?;

    Ok(Json(clock.finish(vacancies).with_link("self", "/api/v1/vacancies")))
}

/// GET /api/v1/vacancies/{id}
pub async fn get_vacancy(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<VacancyId>,
) -> Result<Json<ApiResponse<VacancyDetail>>, AppError> {
    let clock = RequestClock::start();
    let vacancy = state.vacancies.get_vacancy(&principal, &id).await?;

    Ok(Json(
        clock
            .finish(vacancy)
            .with_link("self", &format!("/api/v1/vacancies/{id}"))
            .with_link("submissions", &format!("/api/v1/vacancies/{id}/submissions")),
    ))
}

/// PUT /api/v1/vacancies/{id} - Apply the transition selected by `status`.
pub async fn modify_vacancy(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<VacancyId>,
    Json(body): Json<ModifyVacancyRequest>,
) -> Result<Json<ApiResponse<VacancyDetail>>, AppError> {
    let clock = RequestClock::start();
    let vacancy = state.vacancies.modify_vacancy(&principal, &id, body).await?;

    Ok(Json(
        clock
            .finish(vacancy)
            .with_link("self", &format!("/api/v1/vacancies/{id}")),
    ))
}
