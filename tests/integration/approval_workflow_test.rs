//! Approval workflow integration tests
//!
//! Exercises the full submit / decide / withdraw cycle over the HTTP surface,
//! wired against in-memory capabilities. Covers entity status side effects,
//! role enforcement, request reuse on resubmission, and the audit trail.

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use orgdesk_activity::ActivityType;
use orgdesk_approvals::{ApprovalLedger, ApprovalRequest, ApprovalStatus};
use orgdesk_content::{EntityDirectory, EntityKind, PublishStatus};

use crate::common::{create_test_jwt, TestApp};

/// Helper: build an authenticated request
fn authed_request(method: Method, uri: &str, jwt: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", jwt));

    if let Some(b) = body {
        builder = builder.header("content-type", "application/json");
        builder
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Helper: build an unauthenticated request
fn unauthed_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(b) = body {
        builder = builder.header("content-type", "application/json");
        builder
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    }
}

/// Helper: parse response body as JSON Value
async fn parse_body(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Helper: submit an entity for review and return the parsed response
async fn submit_entity(
    app: &TestApp,
    jwt: &str,
    kind_tag: &str,
    entity_id: Uuid,
    note: Option<&str>,
) -> (StatusCode, Value) {
    let mut body = json!({ "entity_type": kind_tag, "entity_id": entity_id });
    if let Some(n) = note {
        body["note"] = json!(n);
    }

    let req = authed_request(Method::POST, "/v1/approvals", jwt, Some(body));
    let resp = app.test_router().oneshot(req).await.unwrap();
    let status = resp.status();
    let parsed = parse_body(resp).await;
    (status, parsed)
}

/// Helper: decide a request and return the parsed response
async fn decide_request(
    app: &TestApp,
    jwt: &str,
    request_id: &str,
    body: Value,
) -> (StatusCode, Value) {
    let uri = format!("/v1/approvals/{}", request_id);
    let req = authed_request(Method::PUT, &uri, jwt, Some(body));
    let resp = app.test_router().oneshot(req).await.unwrap();
    let status = resp.status();
    let parsed = parse_body(resp).await;
    (status, parsed)
}

// ============================================================================
// Submission
// ============================================================================
mod test_submission {
    use super::*;

    /// Submitting a letter creates a PENDING request and marks the entity
    #[tokio::test]
    async fn test_submit_letter_creates_pending_request() {
        let app = TestApp::new();
        let letter_id = app.seed_entity(EntityKind::Letter, "Sponsorship letter").unwrap();
        let member = Uuid::new_v4();
        let jwt = create_test_jwt(member, "member", &app.config.jwt_secret).unwrap();

        let (status, body) =
            submit_entity(&app, &jwt, "LETTER", letter_id, Some("Please review")).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["entity_type"], "LETTER");
        assert_eq!(body["entity_id"], letter_id.to_string());
        assert_eq!(body["requested_by"], member.to_string());
        assert_eq!(body["status"], "PENDING");
        assert_eq!(body["note"], "Please review");
        assert!(body.get("id").is_some(), "missing 'id'");
        assert!(body.get("created_at").is_some(), "missing 'created_at'");

        assert_eq!(
            app.directory.status_of(EntityKind::Letter, letter_id),
            Some(PublishStatus::Pending),
            "Submission should mark the entity PENDING"
        );
    }

    /// Every kind tag is accepted on the submission endpoint
    #[tokio::test]
    async fn test_submit_accepts_every_kind() {
        let app = TestApp::new();
        let jwt = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();

        for kind in EntityKind::ALL {
            let id = app.seed_entity(kind, "Kind coverage").unwrap();
            let (status, body) = submit_entity(&app, &jwt, kind.tag(), id, None).await;

            assert_eq!(status, StatusCode::CREATED, "kind {} should submit", kind);
            assert_eq!(body["entity_type"], kind.tag());
            assert_eq!(
                app.directory.status_of(kind, id),
                Some(PublishStatus::Pending)
            );
        }
    }

    /// Submitting a missing entity is a 404 and writes nothing
    #[tokio::test]
    async fn test_submit_missing_entity_returns_404() {
        let app = TestApp::new();
        let jwt = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();

        let (status, body) = submit_entity(&app, &jwt, "DOCUMENT", Uuid::new_v4(), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(app.ledger.count(), 0, "No request row should be created");
        assert_eq!(app.activity.count(), 0, "No activity should be recorded");
    }

    /// Resubmission reuses the existing request row
    #[tokio::test]
    async fn test_resubmission_reuses_request_row() {
        let app = TestApp::new();
        let event_id = app.seed_entity(EntityKind::Event, "Orientation week").unwrap();
        let jwt = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();

        let (status1, body1) =
            submit_entity(&app, &jwt, "EVENT", event_id, Some("first draft")).await;
        let (status2, body2) =
            submit_entity(&app, &jwt, "EVENT", event_id, Some("second draft")).await;

        assert_eq!(status1, StatusCode::CREATED);
        assert_eq!(status2, StatusCode::CREATED);
        assert_eq!(body1["id"], body2["id"], "Row should be reused, not duplicated");
        assert_eq!(body2["note"], "second draft", "Note should be replaced");
        assert_eq!(app.ledger.count(), 1);
    }

    /// Submission without a bearer token is rejected
    #[tokio::test]
    async fn test_submit_requires_authentication() {
        let app = TestApp::new();
        let letter_id = app.seed_entity(EntityKind::Letter, "Sponsorship letter").unwrap();

        let body = json!({ "entity_type": "LETTER", "entity_id": letter_id });
        let req = unauthed_request(Method::POST, "/v1/approvals", Some(body));
        let resp = app.test_router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            app.directory.status_of(EntityKind::Letter, letter_id),
            Some(PublishStatus::Draft),
            "Entity must be untouched"
        );
    }

    /// Unknown kind tags fail deserialization with a 400
    #[tokio::test]
    async fn test_submit_unknown_kind_returns_400() {
        let app = TestApp::new();
        let jwt = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();

        let (status, body) = submit_entity(&app, &jwt, "GALLERY", Uuid::new_v4(), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    /// Notes above the length limit are rejected by validation
    #[tokio::test]
    async fn test_submit_oversized_note_returns_400() {
        let app = TestApp::new();
        let letter_id = app.seed_entity(EntityKind::Letter, "Sponsorship letter").unwrap();
        let jwt = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();

        let oversized = "x".repeat(501);
        let (status, body) =
            submit_entity(&app, &jwt, "LETTER", letter_id, Some(&oversized)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

// ============================================================================
// Decision
// ============================================================================
mod test_decision {
    use super::*;

    /// Approval publishes the bound entity
    #[tokio::test]
    async fn test_approve_publishes_entity() {
        let app = TestApp::new();
        let letter_id = app.seed_entity(EntityKind::Letter, "Sponsorship letter").unwrap();
        let member = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();
        let reviewer = create_test_jwt(Uuid::new_v4(), "reviewer", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "LETTER", letter_id, None).await;
        let request_id = submitted["id"].as_str().unwrap();

        let (status, body) = decide_request(
            &app,
            &reviewer,
            request_id,
            json!({ "decision": "APPROVED", "note": "Looks good" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "APPROVED");
        assert_eq!(body["note"], "Looks good");
        assert_eq!(
            app.directory.status_of(EntityKind::Letter, letter_id),
            Some(PublishStatus::Publish)
        );
    }

    /// Rejection returns the bound entity to draft
    #[tokio::test]
    async fn test_reject_returns_entity_to_draft() {
        let app = TestApp::new();
        let finance_id = app.seed_entity(EntityKind::Finance, "Q2 expense report").unwrap();
        let member = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();
        let reviewer = create_test_jwt(Uuid::new_v4(), "reviewer", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "FINANCE", finance_id, None).await;
        let request_id = submitted["id"].as_str().unwrap();

        let (status, body) =
            decide_request(&app, &reviewer, request_id, json!({ "decision": "REJECTED" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "REJECTED");
        assert_eq!(
            app.directory.status_of(EntityKind::Finance, finance_id),
            Some(PublishStatus::Draft)
        );
    }

    /// Approving an article also flips its publication flags
    #[tokio::test]
    async fn test_approve_article_sets_publication_flags() {
        let app = TestApp::new();
        let article_id = app.seed_entity(EntityKind::Article, "Recap of the gala").unwrap();
        let member = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();
        let reviewer = create_test_jwt(Uuid::new_v4(), "reviewer", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "ARTICLE", article_id, None).await;
        let request_id = submitted["id"].as_str().unwrap();

        decide_request(&app, &reviewer, request_id, json!({ "decision": "APPROVED" })).await;

        let article = app.directory.article(article_id).unwrap();
        assert_eq!(article.status, PublishStatus::Publish);
        assert!(article.is_published);
        assert!(article.published_at.is_some());
    }

    /// Rejecting an article clears its publication flags
    #[tokio::test]
    async fn test_reject_article_clears_publication_flags() {
        let app = TestApp::new();
        let article_id = app.seed_entity(EntityKind::Article, "Recap of the gala").unwrap();
        let member = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();
        let reviewer = create_test_jwt(Uuid::new_v4(), "reviewer", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "ARTICLE", article_id, None).await;
        let request_id = submitted["id"].as_str().unwrap();

        decide_request(&app, &reviewer, request_id, json!({ "decision": "REJECTED" })).await;

        let article = app.directory.article(article_id).unwrap();
        assert_eq!(article.status, PublishStatus::Draft);
        assert!(!article.is_published);
        assert!(article.published_at.is_none());
    }

    /// Replaying the same decision is harmless
    #[tokio::test]
    async fn test_decision_is_idempotent() {
        let app = TestApp::new();
        let doc_id = app.seed_entity(EntityKind::Document, "Bylaws v3").unwrap();
        let member = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();
        let reviewer = create_test_jwt(Uuid::new_v4(), "reviewer", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "DOCUMENT", doc_id, None).await;
        let request_id = submitted["id"].as_str().unwrap();

        let (status1, _) =
            decide_request(&app, &reviewer, request_id, json!({ "decision": "APPROVED" })).await;
        let (status2, body2) =
            decide_request(&app, &reviewer, request_id, json!({ "decision": "APPROVED" })).await;

        assert_eq!(status1, StatusCode::OK);
        assert_eq!(status2, StatusCode::OK);
        assert_eq!(body2["status"], "APPROVED");
        assert_eq!(
            app.directory.status_of(EntityKind::Document, doc_id),
            Some(PublishStatus::Publish)
        );
    }

    /// Approval after resubmission follows the full cycle back to publish
    #[tokio::test]
    async fn test_reject_then_resubmit_then_approve() {
        let app = TestApp::new();
        let wp_id = app.seed_entity(EntityKind::WorkProgram, "Annual plan").unwrap();
        let member = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();
        let reviewer = create_test_jwt(Uuid::new_v4(), "reviewer", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "WORK_PROGRAM", wp_id, None).await;
        let request_id = submitted["id"].as_str().unwrap().to_string();

        decide_request(&app, &reviewer, &request_id, json!({ "decision": "REJECTED" })).await;
        assert_eq!(
            app.directory.status_of(EntityKind::WorkProgram, wp_id),
            Some(PublishStatus::Draft)
        );

        let (_, resubmitted) =
            submit_entity(&app, &member, "WORK_PROGRAM", wp_id, Some("revised")).await;
        assert_eq!(resubmitted["id"].as_str().unwrap(), request_id);
        assert_eq!(resubmitted["status"], "PENDING");

        let (status, _) =
            decide_request(&app, &reviewer, &request_id, json!({ "decision": "APPROVED" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            app.directory.status_of(EntityKind::WorkProgram, wp_id),
            Some(PublishStatus::Publish)
        );
    }

    /// Members cannot decide requests
    #[tokio::test]
    async fn test_decide_requires_reviewer_role() {
        let app = TestApp::new();
        let letter_id = app.seed_entity(EntityKind::Letter, "Sponsorship letter").unwrap();
        let member = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "LETTER", letter_id, None).await;
        let request_id = submitted["id"].as_str().unwrap();

        let (status, body) =
            decide_request(&app, &member, request_id, json!({ "decision": "APPROVED" })).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "NOT_REVIEWER");
        assert_eq!(
            app.directory.status_of(EntityKind::Letter, letter_id),
            Some(PublishStatus::Pending),
            "Entity must stay pending"
        );
    }

    /// A missing decision field is a validation error, not a parse failure
    #[tokio::test]
    async fn test_decide_without_decision_returns_400() {
        let app = TestApp::new();
        let letter_id = app.seed_entity(EntityKind::Letter, "Sponsorship letter").unwrap();
        let member = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();
        let reviewer = create_test_jwt(Uuid::new_v4(), "reviewer", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "LETTER", letter_id, None).await;
        let request_id = submitted["id"].as_str().unwrap();

        let (status, body) =
            decide_request(&app, &reviewer, request_id, json!({ "note": "no verdict" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    /// Deciding an unknown request id is a 404
    #[tokio::test]
    async fn test_decide_unknown_request_returns_404() {
        let app = TestApp::new();
        let reviewer = create_test_jwt(Uuid::new_v4(), "reviewer", &app.config.jwt_secret).unwrap();

        let (status, body) = decide_request(
            &app,
            &reviewer,
            &Uuid::new_v4().to_string(),
            json!({ "decision": "APPROVED" }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    /// A stale request whose entity is gone fails without side effects
    #[tokio::test]
    async fn test_decide_on_deleted_entity_returns_404() {
        let app = TestApp::new();
        let letter_id = app.seed_entity(EntityKind::Letter, "Sponsorship letter").unwrap();
        let member = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();
        let reviewer = create_test_jwt(Uuid::new_v4(), "reviewer", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "LETTER", letter_id, None).await;
        let request_id: Uuid = submitted["id"].as_str().unwrap().parse().unwrap();

        app.directory
            .delete(EntityKind::Letter, letter_id)
            .await
            .unwrap();

        let (status, _) = decide_request(
            &app,
            &reviewer,
            &request_id.to_string(),
            json!({ "decision": "APPROVED" }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);

        let request = app.ledger.find(request_id).await.unwrap().unwrap();
        assert_eq!(
            request.status,
            ApprovalStatus::Pending,
            "Request must stay pending when the precondition fails"
        );
    }

    /// Requests bound to a retired kind tag still take decisions
    #[tokio::test]
    async fn test_decide_on_retired_kind_tag_updates_request_only() {
        let app = TestApp::new();
        let reviewer = create_test_jwt(Uuid::new_v4(), "reviewer", &app.config.jwt_secret).unwrap();

        let request = ApprovalRequest {
            id: Uuid::new_v4(),
            entity_type: "GALLERY".to_string(),
            entity_id: Uuid::new_v4(),
            requested_by: Uuid::new_v4(),
            status: ApprovalStatus::Pending,
            note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let request_id = app.ledger.seed(request);

        let (status, body) = decide_request(
            &app,
            &reviewer,
            &request_id.to_string(),
            json!({ "decision": "APPROVED" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "APPROVED");
        assert_eq!(body["entity_type"], "GALLERY");
    }
}

// ============================================================================
// Withdrawal
// ============================================================================
mod test_withdrawal {
    use super::*;

    /// Withdrawing removes the request and leaves the entity alone
    #[tokio::test]
    async fn test_withdraw_removes_request_keeps_entity_status() {
        let app = TestApp::new();
        let letter_id = app.seed_entity(EntityKind::Letter, "Sponsorship letter").unwrap();
        let member = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();
        let reviewer = create_test_jwt(Uuid::new_v4(), "reviewer", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "LETTER", letter_id, None).await;
        let request_id = submitted["id"].as_str().unwrap();

        let uri = format!("/v1/approvals/{}", request_id);
        let req = authed_request(Method::DELETE, &uri, &reviewer, None);
        let resp = app.test_router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(app.ledger.count(), 0);
        assert_eq!(
            app.directory.status_of(EntityKind::Letter, letter_id),
            Some(PublishStatus::Pending),
            "Withdrawal must not touch the entity"
        );
    }

    /// Members cannot withdraw requests
    #[tokio::test]
    async fn test_withdraw_requires_reviewer_role() {
        let app = TestApp::new();
        let letter_id = app.seed_entity(EntityKind::Letter, "Sponsorship letter").unwrap();
        let member = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "LETTER", letter_id, None).await;
        let request_id = submitted["id"].as_str().unwrap();

        let uri = format!("/v1/approvals/{}", request_id);
        let req = authed_request(Method::DELETE, &uri, &member, None);
        let resp = app.test_router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(app.ledger.count(), 1, "Request must survive");
    }

    /// Withdrawing an unknown request id is a 404
    #[tokio::test]
    async fn test_withdraw_unknown_request_returns_404() {
        let app = TestApp::new();
        let reviewer = create_test_jwt(Uuid::new_v4(), "reviewer", &app.config.jwt_secret).unwrap();

        let uri = format!("/v1/approvals/{}", Uuid::new_v4());
        let req = authed_request(Method::DELETE, &uri, &reviewer, None);
        let resp = app.test_router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

// ============================================================================
// Audit trail
// ============================================================================
mod test_audit_trail {
    use super::*;

    /// The full cycle leaves one entry per action, in order
    #[tokio::test]
    async fn test_workflow_records_activity_entries() {
        let app = TestApp::new();
        let letter_id = app.seed_entity(EntityKind::Letter, "Sponsorship letter").unwrap();
        let member_id = Uuid::new_v4();
        let reviewer_id = Uuid::new_v4();
        let member = create_test_jwt(member_id, "member", &app.config.jwt_secret).unwrap();
        let reviewer = create_test_jwt(reviewer_id, "reviewer", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "LETTER", letter_id, None).await;
        let request_id = submitted["id"].as_str().unwrap().to_string();

        decide_request(&app, &reviewer, &request_id, json!({ "decision": "APPROVED" })).await;

        let uri = format!("/v1/approvals/{}", request_id);
        let req = authed_request(Method::DELETE, &uri, &reviewer, None);
        app.test_router().oneshot(req).await.unwrap();

        let entries = app.activity.entries();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].activity_type, ActivityType::Submit);
        assert_eq!(entries[0].user_id, member_id);
        assert_eq!(entries[0].entity_type, "LETTER");
        assert_eq!(entries[0].entity_id, letter_id);

        assert_eq!(entries[1].activity_type, ActivityType::Decide);
        assert_eq!(entries[1].user_id, reviewer_id);

        assert_eq!(entries[2].activity_type, ActivityType::Withdraw);
        assert_eq!(entries[2].user_id, reviewer_id);
    }

    /// Request metadata carries the request id for cross-referencing
    #[tokio::test]
    async fn test_activity_metadata_links_request() {
        let app = TestApp::new();
        let letter_id = app.seed_entity(EntityKind::Letter, "Sponsorship letter").unwrap();
        let member = create_test_jwt(Uuid::new_v4(), "member", &app.config.jwt_secret).unwrap();

        let (_, submitted) = submit_entity(&app, &member, "LETTER", letter_id, None).await;
        let request_id = submitted["id"].as_str().unwrap();

        let entries = app.activity.entries();
        let metadata = entries[0].metadata.as_ref().unwrap();
        assert_eq!(metadata.0["request_id"], request_id);
    }
}
