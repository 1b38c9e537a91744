//! Route definitions for the Approvals domain API

use axum::{
    routing::{post, put},
    Router,
};

use super::handlers::approvals;
use super::middleware::ApprovalsState;

/// Create approval workflow routes
fn approval_routes() -> Router<ApprovalsState> {
    Router::new()
        .route("/v1/approvals", post(approvals::submit_approval))
        .route(
            "/v1/approvals/{id}",
            put(approvals::decide_approval).delete(approvals::delete_approval),
        )
}

/// Create all routes for the Approvals domain
pub fn routes() -> Router<ApprovalsState> {
    approval_routes()
}
