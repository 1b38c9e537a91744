//! Activity domain: append-only log of workflow and asset actions

pub mod domain;
pub mod memory;
pub mod recorder;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{ActivityEntry, ActivityType};

// Re-export recorder implementations
pub use memory::MemoryActivityRecorder;
pub use recorder::ActivityRecorder;
pub use repository::PgActivityRecorder;
