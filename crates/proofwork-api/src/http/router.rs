//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/` and require an API key; `/health` does not.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Skill catalog
        .route("/skills", get(handlers::skill::list_skills))
        // Kudos
        .route(
            "/proofs/{id}/kudos",
            get(handlers::kudos::proof_kudos).post(handlers::kudos::post_kudos),
        )
        .route(
            "/proofs/{id}/kudos/mine",
            get(handlers::kudos::my_skill_breakdown),
        )
        .route(
            "/sponsors/{id}/kudos/proofs",
            get(handlers::kudos::kudosed_proofs),
        )
        .route(
            "/sponsors/{id}/kudos/proofs/{proof_id}/history",
            get(handlers::kudos::kudos_history),
        )
        // Vacancies
        .route(
            "/vacancies",
            get(handlers::vacancy::list_published).post(handlers::vacancy::create_vacancy),
        )
        .route(
            "/vacancies/{id}",
            get(handlers::vacancy::get_vacancy).put(handlers::vacancy::modify_vacancy),
        )
        // Submissions
        .route(
            "/vacancies/{id}/submissions",
            get(handlers::submission::list_for_vacancy)
                .post(handlers::submission::create_submission),
        )
        .route(
            "/submissions/{id}",
            get(handlers::submission::get_submission),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
