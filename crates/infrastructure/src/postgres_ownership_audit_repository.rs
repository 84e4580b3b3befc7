use async_trait::async_trait;
use sqlx::PgPool;

use sentra_application::{OwnershipAuditEntry, OwnershipAuditRepository};
use sentra_core::{AppError, AppResult};

/// PostgreSQL-backed append-only ownership audit log.
#[derive(Clone)]
pub struct PostgresOwnershipAuditRepository {
    pool: PgPool,
}

impl PostgresOwnershipAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnershipAuditRepository for PostgresOwnershipAuditRepository {
    async fn append_entry(&self, entry: OwnershipAuditEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO ownership_audit_entries (
                action,
                tracked_entity_id,
                program_id,
                actor_id,
                detail,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, now())
            "#,
        )
        .bind(entry.action.as_str())
        .bind(entry.tracked_entity.as_uuid())
        .bind(entry.program.as_uuid())
        .bind(entry.actor.as_uuid())
        .bind(entry.detail)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to append ownership audit entry: {error}"))
        })?;

        Ok(())
    }
}
