//! Application API 模块 (申请与审批)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/applications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::submit))
        .route("/queue", get(handler::queue))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/co-review", post(handler::co_review))
        .route("/{id}/dealer-review", post(handler::dealer_review))
        .route("/{id}/awo-decision", post(handler::awo_decision))
}
