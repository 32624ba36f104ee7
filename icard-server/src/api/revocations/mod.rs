//! Revocation API 模块 (I-Card 吊销)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/icards", icard_routes())
        .nest("/api/revocations", revocation_routes())
}

fn icard_routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_icard))
        .route("/{id}/revocations", post(handler::create))
}

fn revocation_routes() -> Router<ServerState> {
    Router::new()
        .route("/pending", get(handler::pending))
        .route("/{id}/decision", post(handler::decide))
}
