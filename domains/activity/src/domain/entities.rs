use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Kind of action being recorded
///
/// Stored as TEXT so the log survives vocabulary changes without a type
/// migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Submit,
    Decide,
    Withdraw,
    AssetAttach,
    AssetReplace,
    AssetRemove,
    Purge,
}

impl ActivityType {
    pub fn tag(&self) -> &'static str {
        match self {
            ActivityType::Submit => "SUBMIT",
            ActivityType::Decide => "DECIDE",
            ActivityType::Withdraw => "WITHDRAW",
            ActivityType::AssetAttach => "ASSET_ATTACH",
            ActivityType::AssetReplace => "ASSET_REPLACE",
            ActivityType::AssetRemove => "ASSET_REMOVE",
            ActivityType::Purge => "PURGE",
        }
    }
}

impl std::fmt::Display for ActivityType {
    #[mutants::skip] // Delegates to tag()
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One recorded action
///
/// `entity_type` is the raw kind tag rather than a typed enum: entries must
/// outlive the entities they describe, including kinds that are later
/// retired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub activity_type: ActivityType,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub description: String,
    pub metadata: Option<Json<serde_json::Value>>,
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    /// Create a new activity entry
    pub fn new(
        user_id: Uuid,
        activity_type: ActivityType,
        entity_type: String,
        entity_id: Uuid,
        description: String,
    ) -> Self {
        ActivityEntry {
            id: Uuid::new_v4(),
            user_id,
            activity_type,
            entity_type,
            entity_id,
            description,
            metadata: None,
            created_at: Utc::now(),
        }
    }

    /// Attach structured context to the entry
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(Json(metadata));
        self
    }
}
