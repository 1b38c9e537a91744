//! Approval request repository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use orgdesk_common::Result;

use crate::domain::entities::{ApprovalRequest, ApprovalStatus};
use crate::ledger::ApprovalLedger;

#[derive(Clone)]
pub struct PgApprovalLedger {
    pool: PgPool,
}

impl PgApprovalLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApprovalLedger for PgApprovalLedger {
    async fn find(&self, id: Uuid) -> Result<Option<ApprovalRequest>> {
        let row = sqlx::query_as::<_, ApprovalRequest>(
            r#"
            SELECT id, entity_type, entity_id, requested_by, status, note, created_at, updated_at
            FROM approval_requests WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_for_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Option<ApprovalRequest>> {
        let row = sqlx::query_as::<_, ApprovalRequest>(
            r#"
            SELECT id, entity_type, entity_id, requested_by, status, note, created_at, updated_at
            FROM approval_requests WHERE entity_type = $1 AND entity_id = $2
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, request: &ApprovalRequest) -> Result<ApprovalRequest> {
        let row = sqlx::query_as::<_, ApprovalRequest>(
            r#"
            INSERT INTO approval_requests (id, entity_type, entity_id, requested_by, status, note,
                                           created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, entity_type, entity_id, requested_by, status, note, created_at, updated_at
            "#,
        )
        .bind(request.id)
        .bind(&request.entity_type)
        .bind(request.entity_id)
        .bind(request.requested_by)
        .bind(request.status)
        .bind(&request.note)
        .bind(request.created_at)
        .bind(request.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_submission(
        &self,
        id: Uuid,
        note: Option<&str>,
    ) -> Result<Option<ApprovalRequest>> {
        let row = sqlx::query_as::<_, ApprovalRequest>(
            r#"
            UPDATE approval_requests
            SET status = $2, note = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, entity_type, entity_id, requested_by, status, note, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(ApprovalStatus::Pending)
        .bind(note)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_decision(
        &self,
        id: Uuid,
        status: ApprovalStatus,
        note: Option<&str>,
    ) -> Result<Option<ApprovalRequest>> {
        let row = sqlx::query_as::<_, ApprovalRequest>(
            r#"
            UPDATE approval_requests
            SET status = $2, note = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, entity_type, entity_id, requested_by, status, note, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(note)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM approval_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_entity(&self, entity_type: &str, entity_id: Uuid) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM approval_requests WHERE entity_type = $1 AND entity_id = $2")
                .bind(entity_type)
                .bind(entity_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
