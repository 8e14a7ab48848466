//! API routes for board-server

pub mod health;
pub mod ideas;
pub mod live;
pub mod public;

use axum::Router;
use axum::routing::{get, post, put};
use shared::ApiResponse;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ServiceError;
use crate::state::AppState;

pub type ApiResult<T> = Result<ApiResponse<T>, ServiceError>;

/// Routes without middleware or state
pub fn build_router() -> Router<AppState> {
    // Owner API (bearer token)
    let owner = Router::new()
        .route(
            "/api/boards/{board_id}/ideas",
            post(ideas::create_idea).get(ideas::list_ideas),
        )
        .route(
            "/api/ideas/{id}",
            put(ideas::update_idea).delete(ideas::delete_idea),
        )
        .route("/api/ideas/{id}/position", put(ideas::update_position))
        .route("/api/ideas/{id}/status", put(ideas::update_status));

    // Anonymous feedback and public reads
    let public = Router::new()
        .route("/api/public/ideas/{id}/thumbs-up", post(public::thumbs_up))
        .route("/api/public/ideas/{id}/reactions", post(public::add_reaction))
        .route("/api/public/boards/{board_id}/ideas", get(public::list_ideas));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/boards/{board_id}/live", get(live::handle_board_ws))
        .merge(owner)
        .merge(public)
}

/// Fully configured application
pub fn build_app(state: AppState) -> Router {
    build_router()
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
