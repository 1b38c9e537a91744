//! Workflow services for the Approvals domain

pub mod approvals;
pub mod sync;

pub use approvals::ApprovalService;
pub use sync::StatusSynchronizer;
