//! Asset lifecycle API handlers

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use orgdesk_common::{AuthUser, Error, Result, ReviewerUser, ValidatedJson};
use orgdesk_content::EntityKind;
use orgdesk_drive::DriveUpload;

use crate::api::middleware::AssetsState;
use crate::manager::{AttachOutcome, DegradedStep, PurgeOutcome};

/// Request body for purging a batch of entities
#[derive(Debug, Deserialize, Validate)]
pub struct PurgeRequest {
    #[validate(length(min = 1, max = 100))]
    pub ids: Vec<Uuid>,
}

/// Stored-asset response for upload operations
#[derive(Debug, Serialize)]
pub struct AssetResponse {
    pub file_id: String,
    pub url: String,
    /// Post-upload steps that failed without sinking the upload
    pub degraded: Vec<DegradedStep>,
}

impl From<AttachOutcome> for AssetResponse {
    fn from(outcome: AttachOutcome) -> Self {
        Self {
            file_id: outcome.file_id,
            url: outcome.url,
            degraded: outcome.degraded,
        }
    }
}

/// Pull the first `file` field out of a multipart body.
///
/// Unknown fields are skipped. Filename and content type are captured
/// before the field is consumed for its bytes.
async fn read_upload(multipart: &mut Multipart) -> Result<(DriveUpload, Option<String>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(|name| name.to_string());
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(format!("Failed to read uploaded file: {}", e)))?;

        if bytes.is_empty() {
            return Err(Error::Validation("Uploaded file is empty".to_string()));
        }

        return Ok((DriveUpload::new(bytes.to_vec(), content_type), filename));
    }

    Err(Error::Validation(
        "Multipart body must contain a \"file\" field".to_string(),
    ))
}

/// Upload or replace the asset in an entity's slot
///
/// **PUT /v1/entities/{kind}/{id}/asset**
///
/// Attaches when the slot is empty, replaces when it holds a reference.
/// Expects a multipart body with a `file` field.
pub async fn upload_asset(
    AuthUser(actor): AuthUser,
    State(state): State<AssetsState>,
    Path((kind, id)): Path<(String, Uuid)>,
    mut multipart: Multipart,
) -> Result<Json<AssetResponse>> {
    let kind: EntityKind = kind.parse()?;
    let (upload, filename) = read_upload(&mut multipart).await?;

    let outcome = state
        .manager
        .store(kind, id, upload, filename.as_deref(), actor.id)
        .await?;

    Ok(Json(outcome.into()))
}

/// Clear an entity's asset slot
///
/// **DELETE /v1/entities/{kind}/{id}/asset**
///
/// Removes the stored object behind the slot; an empty slot is a no-op.
pub async fn remove_asset(
    AuthUser(actor): AuthUser,
    State(state): State<AssetsState>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<StatusCode> {
    let kind: EntityKind = kind.parse()?;
    state.manager.detach(kind, id, actor.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Purge a batch of entities of one kind
///
/// **POST /v1/entities/{kind}/purge**
///
/// Reviewer only. Deletes each entity with its approval requests and stored
/// object. Items are isolated; the response reports one outcome per id.
pub async fn purge_entities(
    ReviewerUser(reviewer): ReviewerUser,
    State(state): State<AssetsState>,
    Path(kind): Path<String>,
    ValidatedJson(request): ValidatedJson<PurgeRequest>,
) -> Result<Json<Vec<PurgeOutcome>>> {
    let kind: EntityKind = kind.parse()?;
    let outcomes = state.manager.purge(kind, &request.ids, reviewer.id).await;

    Ok(Json(outcomes))
}
