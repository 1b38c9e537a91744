//! Postgres entity directory

use sqlx::PgPool;
use uuid::Uuid;

use orgdesk_common::Result;

use crate::directory::EntityDirectory;
use crate::domain::entities::{EntityKind, EntitySummary, PublishStatus};
use crate::domain::state::PublishTransition;

/// Entity directory backed by the six per-kind tables.
///
/// Table and column names come from the `EntityKind` dispatch methods, which
/// are closed over the six kinds; no identifier in these statements is ever
/// caller-supplied.
#[derive(Clone)]
pub struct PgEntityDirectory {
    pool: PgPool,
}

impl PgEntityDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl EntityDirectory for PgEntityDirectory {
    async fn find_summary(&self, kind: EntityKind, id: Uuid) -> Result<Option<EntitySummary>> {
        let query = format!(
            "SELECT id, title, status, {} AS asset_ref, created_by FROM {} WHERE id = $1",
            kind.asset_column(),
            kind.table()
        );
        let summary = sqlx::query_as::<_, EntitySummary>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(summary)
    }

    async fn set_status(&self, kind: EntityKind, id: Uuid, status: PublishStatus) -> Result<bool> {
        let query = format!(
            "UPDATE {} SET status = $2, updated_at = NOW() WHERE id = $1",
            kind.table()
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn apply_transition(
        &self,
        kind: EntityKind,
        id: Uuid,
        transition: &PublishTransition,
    ) -> Result<bool> {
        let result = match (kind, transition.article) {
            (EntityKind::Article, Some(flags)) => {
                sqlx::query(
                    "UPDATE articles \
                     SET status = $2, is_published = $3, published_at = $4, updated_at = NOW() \
                     WHERE id = $1",
                )
                .bind(id)
                .bind(transition.status)
                .bind(flags.is_published)
                .bind(flags.published_at)
                .execute(&self.pool)
                .await?
            }
            _ => {
                let query = format!(
                    "UPDATE {} SET status = $2, updated_at = NOW() WHERE id = $1",
                    kind.table()
                );
                sqlx::query(&query)
                    .bind(id)
                    .bind(transition.status)
                    .execute(&self.pool)
                    .await?
            }
        };

        Ok(result.rows_affected() > 0)
    }

    async fn set_asset_ref(&self, kind: EntityKind, id: Uuid, file_id: &str) -> Result<bool> {
        let query = format!(
            "UPDATE {} SET {} = $2, updated_at = NOW() WHERE id = $1",
            kind.table(),
            kind.asset_column()
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(file_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_asset_ref(&self, kind: EntityKind, id: Uuid) -> Result<bool> {
        let query = format!(
            "UPDATE {} SET {} = NULL, updated_at = NOW() WHERE id = $1",
            kind.table(),
            kind.asset_column()
        );
        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, kind: EntityKind, id: Uuid) -> Result<bool> {
        let query = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
