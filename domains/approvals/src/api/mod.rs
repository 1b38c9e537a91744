//! API layer for the Approvals domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::ApprovalsState;
pub use routes::routes;
