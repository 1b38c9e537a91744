//! Activity log repository

use async_trait::async_trait;
use sqlx::PgPool;

use orgdesk_common::Result;

use crate::domain::entities::ActivityEntry;
use crate::recorder::ActivityRecorder;

#[derive(Clone)]
pub struct PgActivityRecorder {
    pool: PgPool,
}

impl PgActivityRecorder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRecorder for PgActivityRecorder {
    async fn record(&self, entry: ActivityEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO activity_log (id, user_id, activity_type, entity_type, entity_id, description, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.activity_type)
        .bind(&entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.description)
        .bind(&entry.metadata)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
