//! Storage seam for approval request rows
//!
//! One live request per (entity_type, entity_id) pair; submission re-uses
//! the existing row instead of stacking new ones.

use async_trait::async_trait;
use uuid::Uuid;

use orgdesk_common::Result;

use crate::domain::entities::{ApprovalRequest, ApprovalStatus};

#[async_trait]
pub trait ApprovalLedger: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<ApprovalRequest>>;

    /// The live request bound to an entity, if any
    async fn find_for_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Option<ApprovalRequest>>;

    async fn insert(&self, request: &ApprovalRequest) -> Result<ApprovalRequest>;

    /// Re-submission: replace the note and reset the row to PENDING.
    /// Returns `None` when the row no longer exists.
    async fn update_submission(
        &self,
        id: Uuid,
        note: Option<&str>,
    ) -> Result<Option<ApprovalRequest>>;

    /// Record a reviewer's decision on the row.
    /// Returns `None` when the row no longer exists.
    async fn update_decision(
        &self,
        id: Uuid,
        status: ApprovalStatus,
        note: Option<&str>,
    ) -> Result<Option<ApprovalRequest>>;

    /// Remove one request; `true` when a row was deleted
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Remove every request bound to an entity, returning the count
    async fn delete_for_entity(&self, entity_type: &str, entity_id: Uuid) -> Result<u64>;
}
