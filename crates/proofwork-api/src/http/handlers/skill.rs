//! Skill catalog handler.

use axum::Json;
use axum::extract::State;

use proofwork_types::skill::Skill;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentPrincipal;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// GET /api/v1/skills - The full catalog, by name.
pub async fn list_skills(
    State(state): State<AppState>,
    CurrentPrincipal(_principal): CurrentPrincipal,
) -> Result<Json<ApiResponse<Vec<Skill>>>, AppError> {
    let clock = RequestClock::start();
    let skills = state.skills.list_skills().await?;

    Ok(Json(clock.finish(skills).with_link("self", "/api/v1/skills")))
}
