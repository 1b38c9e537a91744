//! Approval workflow API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use orgdesk_common::{AuthUser, Error, Result, ReviewerUser, ValidatedJson};
use orgdesk_content::{EntityKind, ReviewDecision};

use crate::api::middleware::ApprovalsState;
use crate::domain::entities::{ApprovalRequest, ApprovalStatus};

/// Request body for submitting an entity for review
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    /// Kind tag of the entity under review (`LETTER`, `ARTICLE`, ...)
    pub entity_type: EntityKind,

    pub entity_id: Uuid,

    /// Optional note for the reviewer
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Request body for deciding a pending request
///
/// `decision` is optional at the type level so that an absent field produces
/// a validation error instead of a deserialization failure.
#[derive(Debug, Deserialize, Validate)]
pub struct DecideRequest {
    pub decision: Option<ReviewDecision>,

    /// Optional reviewer note, replaces the submitted one
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Approval request response for API operations
#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub requested_by: Uuid,
    pub status: ApprovalStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApprovalRequest> for ApprovalResponse {
    fn from(request: ApprovalRequest) -> Self {
        Self {
            id: request.id,
            entity_type: request.entity_type,
            entity_id: request.entity_id,
            requested_by: request.requested_by,
            status: request.status,
            note: request.note,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// Submit an entity for review
///
/// **POST /v1/approvals**
///
/// Creates the request row, or resets the existing one for this entity to
/// PENDING. The entity itself is marked PENDING as a side effect.
pub async fn submit_approval(
    AuthUser(actor): AuthUser,
    State(state): State<ApprovalsState>,
    ValidatedJson(request): ValidatedJson<SubmitRequest>,
) -> Result<(StatusCode, Json<ApprovalResponse>)> {
    let created = state
        .service
        .submit(request.entity_type, request.entity_id, actor.id, request.note)
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Decide a pending request
///
/// **PUT /v1/approvals/{id}**
///
/// Reviewer only. Applies the decision to the request and syncs the bound
/// entity's publish status.
pub async fn decide_approval(
    ReviewerUser(reviewer): ReviewerUser,
    State(state): State<ApprovalsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<DecideRequest>,
) -> Result<Json<ApprovalResponse>> {
    let decision = request.decision.ok_or_else(|| {
        Error::Validation("A decision of APPROVED or REJECTED is required".to_string())
    })?;

    let updated = state
        .service
        .decide(id, decision, reviewer.id, request.note)
        .await?;

    Ok(Json(updated.into()))
}

/// Withdraw a request from review
///
/// **DELETE /v1/approvals/{id}**
///
/// Reviewer only. Removes the request row; the bound entity keeps its
/// current status.
pub async fn delete_approval(
    ReviewerUser(reviewer): ReviewerUser,
    State(state): State<ApprovalsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service.delete_request(id, reviewer.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
