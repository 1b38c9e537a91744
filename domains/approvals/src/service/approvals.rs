//! Approval workflow service
//!
//! Owns the submit/decide/withdraw lifecycle of review requests. Writes go
//! through capability traits so the workflow runs identically against
//! Postgres and the in-memory fakes.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use orgdesk_activity::{ActivityEntry, ActivityRecorder, ActivityType};
use orgdesk_common::{Error, Result};
use orgdesk_content::{EntityDirectory, EntityKind, PublishStatus, ReviewDecision};

use crate::domain::entities::ApprovalRequest;
use crate::ledger::ApprovalLedger;
use crate::service::sync::StatusSynchronizer;

#[derive(Clone)]
pub struct ApprovalService {
    ledger: Arc<dyn ApprovalLedger>,
    directory: Arc<dyn EntityDirectory>,
    activity: Arc<dyn ActivityRecorder>,
    synchronizer: StatusSynchronizer,
}

impl ApprovalService {
    pub fn new(
        ledger: Arc<dyn ApprovalLedger>,
        directory: Arc<dyn EntityDirectory>,
        activity: Arc<dyn ActivityRecorder>,
    ) -> Self {
        let synchronizer = StatusSynchronizer::new(directory.clone());
        Self {
            ledger,
            directory,
            activity,
            synchronizer,
        }
    }

    /// Submit an entity for review.
    ///
    /// Re-submission reuses the existing request row: the note is replaced
    /// and the status reset to PENDING. The bound entity is always moved to
    /// PENDING as a side effect.
    pub async fn submit(
        &self,
        kind: EntityKind,
        entity_id: Uuid,
        requested_by: Uuid,
        note: Option<String>,
    ) -> Result<ApprovalRequest> {
        let summary = self
            .directory
            .find_summary(kind, entity_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("{} {} not found", kind, entity_id)))?;

        let request = match self.ledger.find_for_entity(kind.tag(), entity_id).await? {
            Some(existing) => self
                .ledger
                .update_submission(existing.id, note.as_deref())
                .await?
                .ok_or_else(|| Error::NotFound("Approval request not found".to_string()))?,
            None => {
                let request = ApprovalRequest::new(kind, entity_id, requested_by, note);
                self.ledger.insert(&request).await?
            }
        };

        let marked = self
            .directory
            .set_status(kind, entity_id, PublishStatus::Pending)
            .await?;
        if !marked {
            tracing::warn!(
                kind = %kind,
                %entity_id,
                "Entity disappeared between submission and status update"
            );
        }

        let entry = ActivityEntry::new(
            requested_by,
            ActivityType::Submit,
            kind.tag().to_string(),
            entity_id,
            format!("Submitted {} \"{}\" for review", kind, summary.title),
        )
        .with_metadata(json!({ "request_id": request.id }));
        if let Err(e) = self.activity.record(entry).await {
            tracing::error!(error = %e, "Failed to record submission activity");
        }

        Ok(request)
    }

    /// Record a reviewer's decision and push it onto the bound entity.
    ///
    /// Both writes are idempotent overwrites, so a failed call is safe to
    /// retry end to end.
    pub async fn decide(
        &self,
        request_id: Uuid,
        decision: ReviewDecision,
        reviewer: Uuid,
        note: Option<String>,
    ) -> Result<ApprovalRequest> {
        let request = self
            .ledger
            .find(request_id)
            .await?
            .ok_or_else(|| Error::NotFound("Approval request not found".to_string()))?;

        // For a recognized kind the bound entity must still exist, checked
        // before any write so a stale request fails without side effects.
        // A retired kind tag skips the check; sync degrades to a no-op.
        let summary = match request.entity_type.parse::<EntityKind>() {
            Ok(kind) => Some(
                self.directory
                    .find_summary(kind, request.entity_id)
                    .await?
                    .ok_or_else(|| {
                        Error::NotFound(format!(
                            "{} {} no longer exists",
                            request.entity_type, request.entity_id
                        ))
                    })?,
            ),
            Err(_) => None,
        };

        let updated = self
            .ledger
            .update_decision(request_id, decision.into(), note.as_deref())
            .await?
            .ok_or_else(|| Error::NotFound("Approval request not found".to_string()))?;

        self.synchronizer
            .sync(&updated.entity_type, updated.entity_id, decision)
            .await?;

        let verb = match decision {
            ReviewDecision::Approved => "Approved",
            ReviewDecision::Rejected => "Rejected",
        };
        let description = match &summary {
            Some(summary) => format!("{} {} \"{}\"", verb, updated.entity_type, summary.title),
            None => format!("{} {} {}", verb, updated.entity_type, updated.entity_id),
        };
        let entry = ActivityEntry::new(
            reviewer,
            ActivityType::Decide,
            updated.entity_type.clone(),
            updated.entity_id,
            description,
        )
        .with_metadata(json!({ "request_id": updated.id, "decision": decision }));
        if let Err(e) = self.activity.record(entry).await {
            tracing::error!(error = %e, "Failed to record decision activity");
        }

        Ok(updated)
    }

    /// Withdraw a request from review without touching the bound entity
    pub async fn delete_request(&self, request_id: Uuid, actor: Uuid) -> Result<()> {
        let request = self
            .ledger
            .find(request_id)
            .await?
            .ok_or_else(|| Error::NotFound("Approval request not found".to_string()))?;

        if !self.ledger.delete(request_id).await? {
            return Err(Error::NotFound("Approval request not found".to_string()));
        }

        let entry = ActivityEntry::new(
            actor,
            ActivityType::Withdraw,
            request.entity_type.clone(),
            request.entity_id,
            format!(
                "Withdrew approval request for {} {}",
                request.entity_type, request.entity_id
            ),
        )
        .with_metadata(json!({ "request_id": request.id }));
        if let Err(e) = self.activity.record(entry).await {
            tracing::error!(error = %e, "Failed to record withdrawal activity");
        }

        Ok(())
    }
}
