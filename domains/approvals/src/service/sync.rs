//! Entity status synchronizer
//!
//! Pushes a reviewer's decision onto the entity the request is bound to.
//! Runs downstream of an already-committed ledger write, so an unknown kind
//! tag must degrade to a logged no-op rather than an error. The applied
//! transition is a plain overwrite, which keeps a repeated decision safe.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use orgdesk_common::Result;
use orgdesk_content::{transition_for, EntityDirectory, EntityKind, ReviewDecision};

#[derive(Clone)]
pub struct StatusSynchronizer {
    directory: Arc<dyn EntityDirectory>,
}

impl StatusSynchronizer {
    pub fn new(directory: Arc<dyn EntityDirectory>) -> Self {
        Self { directory }
    }

    /// Apply the decision to the entity behind the raw kind tag
    pub async fn sync(
        &self,
        entity_type: &str,
        entity_id: Uuid,
        decision: ReviewDecision,
    ) -> Result<()> {
        let kind: EntityKind = match entity_type.parse() {
            Ok(kind) => kind,
            Err(_) => {
                tracing::warn!(
                    entity_type,
                    %entity_id,
                    "Skipping status sync for unrecognized entity kind"
                );
                return Ok(());
            }
        };

        let transition = transition_for(kind, decision, Utc::now());
        let updated = self
            .directory
            .apply_transition(kind, entity_id, &transition)
            .await?;
        if !updated {
            tracing::warn!(
                kind = %kind,
                %entity_id,
                "Entity disappeared before its status could sync"
            );
        }
        Ok(())
    }
}
