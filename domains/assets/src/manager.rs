//! Asset lifecycle manager
//!
//! Orchestrates the external drive, the entity directory, the approval
//! ledger, and the activity log around one rule: the entity row must never
//! point at an object we failed to store. Degraded drive steps keep the
//! operation alive; only a failed upload aborts it.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use orgdesk_activity::{ActivityEntry, ActivityRecorder, ActivityType};
use orgdesk_approvals::ApprovalLedger;
use orgdesk_common::{Error, Result};
use orgdesk_content::{EntityDirectory, EntityKind};
use orgdesk_drive::{DriveFolders, DriveStore, DriveUpload};

use crate::domain::state::{plan_transition, SlotPlan};
use crate::normalize::{is_canonical_ref, normalize_asset_ref};

/// A post-upload step that failed without sinking the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DegradedStep {
    /// Object kept its temporary upload name
    Rename,
    /// Object stored but not publicly readable
    PublicAccess,
}

/// Result of an attach or replace
#[derive(Debug, Clone, Serialize)]
pub struct AttachOutcome {
    /// Confirmed id of the stored object
    pub file_id: String,
    pub url: String,
    /// Steps that failed after the upload itself succeeded
    pub degraded: Vec<DegradedStep>,
}

/// Per-item result of a bulk purge
///
/// `deleted: false` with no error means the id matched nothing.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeOutcome {
    pub id: Uuid,
    pub deleted: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct AssetManager {
    drive: Arc<dyn DriveStore>,
    directory: Arc<dyn EntityDirectory>,
    ledger: Arc<dyn ApprovalLedger>,
    activity: Arc<dyn ActivityRecorder>,
    folders: DriveFolders,
}

impl AssetManager {
    pub fn new(
        drive: Arc<dyn DriveStore>,
        directory: Arc<dyn EntityDirectory>,
        ledger: Arc<dyn ApprovalLedger>,
        activity: Arc<dyn ActivityRecorder>,
        folders: DriveFolders,
    ) -> Self {
        Self {
            drive,
            directory,
            ledger,
            activity,
            folders,
        }
    }

    /// Upload an object and prepare it for sharing.
    ///
    /// The object goes up under a throwaway name, is renamed to its
    /// descriptive one, then marked publicly readable. The last two steps
    /// degrade instead of failing: the caller gets a usable id either way.
    pub async fn attach(
        &self,
        upload: DriveUpload,
        target_name: &str,
        folder: &str,
    ) -> Result<AttachOutcome> {
        let temporary_name = format!("upload-{}", Uuid::new_v4());
        let file_id = self
            .drive
            .upload(upload, &temporary_name, folder)
            .await
            .map_err(|e| Error::Internal(format!("Asset upload failed: {}", e)))?;

        let mut degraded = Vec::new();

        if let Err(e) = self.drive.rename(&file_id, target_name).await {
            tracing::warn!(error = %e, %file_id, "Keeping temporary name after rename failure");
            degraded.push(DegradedStep::Rename);
        }

        if let Err(e) = self.drive.allow_public_access(&file_id).await {
            tracing::warn!(error = %e, %file_id, "Object stored but not publicly readable");
            degraded.push(DegradedStep::PublicAccess);
        }

        let url = self.drive.resolve_url(&file_id);
        Ok(AttachOutcome {
            file_id,
            url,
            degraded,
        })
    }

    /// Swap the object behind a slot.
    ///
    /// The new object must be confirmed before the old one is touched;
    /// dropping the old object is best-effort after that. References we
    /// cannot reduce to a canonical id belong to someone else's store and
    /// are left alone.
    pub async fn replace(
        &self,
        old_ref: &str,
        upload: DriveUpload,
        target_name: &str,
        folder: &str,
    ) -> Result<AttachOutcome> {
        let outcome = self.attach(upload, target_name, folder).await?;

        let old_id = normalize_asset_ref(old_ref);
        if is_canonical_ref(&old_id) {
            if let Err(e) = self.drive.delete(&old_id).await {
                tracing::warn!(error = %e, file_id = %old_id, "Failed to delete replaced object");
            }
        } else {
            tracing::debug!(reference = %old_ref, "Leaving external reference in place");
        }

        Ok(outcome)
    }

    /// Handle an upload against an entity's slot: attach when the slot is
    /// empty, replace when it holds a reference. Writes the confirmed id
    /// onto the entity and records the action.
    pub async fn store(
        &self,
        kind: EntityKind,
        entity_id: Uuid,
        upload: DriveUpload,
        original_filename: Option<&str>,
        actor: Uuid,
    ) -> Result<AttachOutcome> {
        let summary = self
            .directory
            .find_summary(kind, entity_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("{} {} not found", kind, entity_id)))?;

        let folder = folder_for(&self.folders, kind).to_string();
        let name = target_name(kind, &summary.title, original_filename);

        let (outcome, activity_type) =
            match plan_transition(summary.asset_ref.as_deref(), true, false) {
                SlotPlan::Replace { current } => (
                    self.replace(&current, upload, &name, &folder).await?,
                    ActivityType::AssetReplace,
                ),
                _ => (
                    self.attach(upload, &name, &folder).await?,
                    ActivityType::AssetAttach,
                ),
            };

        let updated = self
            .directory
            .set_asset_ref(kind, entity_id, &outcome.file_id)
            .await?;
        if !updated {
            tracing::warn!(
                kind = %kind,
                %entity_id,
                file_id = %outcome.file_id,
                "Entity disappeared before its asset reference could be written"
            );
        }

        let verb = match activity_type {
            ActivityType::AssetReplace => "Replaced asset on",
            _ => "Attached asset to",
        };
        let entry = ActivityEntry::new(
            actor,
            activity_type,
            kind.tag().to_string(),
            entity_id,
            format!("{} {} \"{}\"", verb, kind, summary.title),
        )
        .with_metadata(json!({ "file_id": outcome.file_id, "degraded": outcome.degraded }));
        if let Err(e) = self.activity.record(entry).await {
            tracing::error!(error = %e, "Failed to record asset activity");
        }

        Ok(outcome)
    }

    /// Clear an entity's slot and drop the object behind it.
    ///
    /// The column is cleared before the drive call: a leaked object is
    /// recoverable, a dangling reference is not. An empty slot is a no-op.
    pub async fn detach(&self, kind: EntityKind, entity_id: Uuid, actor: Uuid) -> Result<()> {
        let summary = self
            .directory
            .find_summary(kind, entity_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("{} {} not found", kind, entity_id)))?;

        let reference = match plan_transition(summary.asset_ref.as_deref(), false, true) {
            SlotPlan::Remove { current } => current,
            _ => return Ok(()),
        };

        self.directory.clear_asset_ref(kind, entity_id).await?;
        self.delete_drive_object(&reference).await;

        let entry = ActivityEntry::new(
            actor,
            ActivityType::AssetRemove,
            kind.tag().to_string(),
            entity_id,
            format!("Removed asset from {} \"{}\"", kind, summary.title),
        )
        .with_metadata(json!({ "reference": reference }));
        if let Err(e) = self.activity.record(entry).await {
            tracing::error!(error = %e, "Failed to record asset activity");
        }

        Ok(())
    }

    /// Delete a batch of entities of one kind with their approval requests
    /// and stored objects. Items are processed in order and isolated: one
    /// failure is reported in its own outcome and the loop moves on.
    pub async fn purge(&self, kind: EntityKind, ids: &[Uuid], actor: Uuid) -> Vec<PurgeOutcome> {
        let mut outcomes = Vec::with_capacity(ids.len());
        for &id in ids {
            let outcome = match self.purge_one(kind, id, actor).await {
                Ok(deleted) => PurgeOutcome {
                    id,
                    deleted,
                    error: None,
                },
                Err(e) => PurgeOutcome {
                    id,
                    deleted: false,
                    error: Some(e.to_string()),
                },
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn purge_one(&self, kind: EntityKind, id: Uuid, actor: Uuid) -> Result<bool> {
        let summary = match self.directory.find_summary(kind, id).await? {
            Some(summary) => summary,
            None => return Ok(false),
        };

        // Requests first: an approval row must never outlive its entity,
        // and this order keeps a failed item safe to purge again.
        self.ledger.delete_for_entity(kind.tag(), id).await?;

        let deleted = self.directory.delete(kind, id).await?;
        if !deleted {
            return Ok(false);
        }

        if let Some(reference) = &summary.asset_ref {
            self.delete_drive_object(reference).await;
        }

        let entry = ActivityEntry::new(
            actor,
            ActivityType::Purge,
            kind.tag().to_string(),
            id,
            format!("Purged {} \"{}\"", kind, summary.title),
        );
        if let Err(e) = self.activity.record(entry).await {
            tracing::error!(error = %e, "Failed to record purge activity");
        }

        Ok(true)
    }

    /// Best-effort deletion of the object behind a reference
    async fn delete_drive_object(&self, reference: &str) {
        let file_id = normalize_asset_ref(reference);
        if is_canonical_ref(&file_id) {
            if let Err(e) = self.drive.delete(&file_id).await {
                tracing::warn!(error = %e, %file_id, "Failed to delete drive object");
            }
        } else {
            tracing::debug!(reference = %reference, "Leaving external reference in place");
        }
    }
}

/// Destination folder for a kind's attachments
fn folder_for(folders: &DriveFolders, kind: EntityKind) -> &str {
    match kind {
        EntityKind::Article => &folders.images,
        EntityKind::Finance => &folders.proofs,
        EntityKind::WorkProgram
        | EntityKind::Event
        | EntityKind::Document
        | EntityKind::Letter => &folders.documents,
    }
}

/// Descriptive drive name: kind tag, entity title, original extension
fn target_name(kind: EntityKind, title: &str, original_filename: Option<&str>) -> String {
    let extension = original_filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    let title: String = title
        .trim()
        .chars()
        .map(|c| if c == '/' || c.is_control() { '-' } else { c })
        .collect();

    format!("{} - {}{}", kind.tag(), title, extension)
}
