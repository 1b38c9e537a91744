//! Entity directory capability
//!
//! The workflow engine and the asset manager never talk to entity tables
//! directly; they go through this trait so the same orchestration code runs
//! against Postgres in production and against the in-memory directory in
//! tests.

use uuid::Uuid;

use orgdesk_common::Result;

use crate::domain::entities::{EntityKind, EntitySummary, PublishStatus};
use crate::domain::state::PublishTransition;

/// Kind-dispatched access to the six entity tables.
///
/// Write methods return whether a row was updated; writes are plain
/// overwrites, so repeating one is safe.
#[async_trait::async_trait]
pub trait EntityDirectory: Send + Sync {
    /// Load the workflow-relevant slice of an entity, if it exists.
    async fn find_summary(&self, kind: EntityKind, id: Uuid) -> Result<Option<EntitySummary>>;

    /// Overwrite the entity's publication status.
    async fn set_status(&self, kind: EntityKind, id: Uuid, status: PublishStatus) -> Result<bool>;

    /// Apply a decision transition: status plus, for articles, the
    /// publication flags.
    async fn apply_transition(
        &self,
        kind: EntityKind,
        id: Uuid,
        transition: &PublishTransition,
    ) -> Result<bool>;

    /// Point the entity's asset slot at an external object.
    async fn set_asset_ref(&self, kind: EntityKind, id: Uuid, file_id: &str) -> Result<bool>;

    /// Clear the entity's asset slot.
    async fn clear_asset_ref(&self, kind: EntityKind, id: Uuid) -> Result<bool>;

    /// Delete the entity row.
    async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<bool>;
}
