//! Assets domain: external file lifecycle bound to entity asset slots

pub mod api;
pub mod domain;
pub mod manager;
pub mod normalize;

// Re-export domain types at the crate root for convenience
pub use domain::state::{plan_transition, SlotPlan, SlotState};

// Re-export the manager and its outcomes
pub use manager::{AssetManager, AttachOutcome, DegradedStep, PurgeOutcome};

// Re-export reference normalization
pub use normalize::{is_canonical_ref, normalize_asset_ref};

// Re-export API types
pub use api::routes;
pub use api::AssetsState;
