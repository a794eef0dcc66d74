//! Kudos ledger and endorsement read handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use proofwork_core::service::page_request;
use proofwork_types::error::KudosError;
use proofwork_types::kudos::{
    KudosHistoryItem, KudosReceipt, KudosedProof, PostKudosRequest, ProofKudosSummary,
    SkillKudosTotal,
};
use proofwork_types::page::Page;
use proofwork_types::proof::ProofId;
use proofwork_types::sponsor::SponsorId;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentPrincipal;
use crate::http::extractors::query::{KudosedProofsQuery, PageQuery};
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// POST /api/v1/proofs/{id}/kudos - Spend kudos on a proof's skills.
pub async fn post_kudos(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(proof_id): Path<ProofId>,
    Json(body): Json<PostKudosRequest>,
) -> Result<Json<ApiResponse<KudosReceipt>>, AppError> {
    let clock = RequestClock::start();
    let receipt = state
        .kudos_ledger
        .post_kudos(&principal, &proof_id, &body.skills)
        .await?;

    Ok(Json(
        clock
            .finish(receipt)
            .with_link("proof_kudos", &format!("/api/v1/proofs/{proof_id}/kudos")),
    ))
}

/// GET /api/v1/proofs/{id}/kudos - Proof totals as seen by the caller.
pub async fn proof_kudos(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(proof_id): Path<ProofId>,
) -> Result<Json<ApiResponse<ProofKudosSummary>>, AppError> {
    let clock = RequestClock::start();
    let summary = state.endorsement.summary(&principal, &proof_id).await?;

    Ok(Json(clock.finish(summary).with_link(
        "self",
        &format!("/api/v1/proofs/{proof_id}/kudos"),
    )))
}

/// GET /api/v1/proofs/{id}/kudos/mine - The calling sponsor's per-skill breakdown.
pub async fn my_skill_breakdown(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(proof_id): Path<ProofId>,
) -> Result<Json<ApiResponse<Vec<SkillKudosTotal>>>, AppError> {
    let clock = RequestClock::start();
    let sponsor_id = principal.as_sponsor().ok_or_else(|| {
        KudosError::UnrelatedContent("only sponsors have a kudos breakdown".to_string())
    })?;
    let breakdown = state
        .endorsement
        .skill_breakdown(&principal, &sponsor_id, &proof_id)
        .await?;

    Ok(Json(clock.finish(breakdown)))
}

/// GET /api/v1/sponsors/{id}/kudos/proofs - Proofs the sponsor endorsed.
pub async fn kudosed_proofs(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(sponsor_id): Path<SponsorId>,
    Query(query): Query<KudosedProofsQuery>,
) -> Result<Json<ApiResponse<Page<KudosedProof>>>, AppError> {
    let clock = RequestClock::start();
    let page = page_request(&state.config, query.page, query.size);
    let proofs = state
        .endorsement
        .ranked_proofs(&principal, &sponsor_id, page, query.sort)
        .await?;

    Ok(Json(clock.finish(proofs)))
}

/// GET /api/v1/sponsors/{id}/kudos/proofs/{proof_id}/history - Submission history.
pub async fn kudos_history(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path((sponsor_id, proof_id)): Path<(SponsorId, ProofId)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Page<KudosHistoryItem>>>, AppError> {
    let clock = RequestClock::start();
    let page = page_request(&state.config, query.page, query.size);
    let history = state
        .endorsement
        .history(&principal, &sponsor_id, &proof_id, page)
        .await?;

    Ok(Json(clock.finish(history)))
}
