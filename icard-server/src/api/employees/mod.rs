//! Employee API 模块 (员工与 Controlling Officer 档案)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/employees", employee_routes())
        .nest("/api/controlling-officers", officer_routes())
}

fn employee_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{hrms_id}", get(handler::get_by_id).put(handler::update))
        .route("/{hrms_id}/icards", get(handler::list_icards))
        .route("/{hrms_id}/applications", get(handler::list_applications))
}

fn officer_routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::list_officers).post(handler::create_officer))
}
