//! Content domain: managed entities, their publish lifecycle, and the directory over them

pub mod directory;
pub mod domain;
pub mod memory;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    Article, Document, EntityKind, EntitySummary, Event, Finance, Letter, PublishStatus,
    WorkProgram,
};
pub use domain::state::{
    transition_for, ArticlePublication, PublishTransition, ReviewDecision,
};

// Re-export directory implementations
pub use directory::EntityDirectory;
pub use memory::MemoryEntityDirectory;
pub use repository::PgEntityDirectory;
