//! Approvals domain: review requests, decisions, and entity status sync

pub mod api;
pub mod domain;
pub mod ledger;
pub mod memory;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{ApprovalRequest, ApprovalStatus};

// Re-export ledger implementations
pub use ledger::ApprovalLedger;
pub use memory::MemoryApprovalLedger;
pub use repository::PgApprovalLedger;

// Re-export services
pub use service::{ApprovalService, StatusSynchronizer};

// Re-export API types
pub use api::routes;
pub use api::ApprovalsState;
