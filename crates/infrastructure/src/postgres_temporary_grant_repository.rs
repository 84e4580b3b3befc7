use async_trait::async_trait;
use sqlx::PgPool;

use sentra_application::TemporaryGrantRepository;
use sentra_core::{AppError, AppResult};
use sentra_domain::TemporaryGrant;

/// PostgreSQL-backed append-only store for temporary ownership grants.
#[derive(Clone)]
pub struct PostgresTemporaryGrantRepository {
    pool: PgPool,
}

impl PostgresTemporaryGrantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemporaryGrantRepository for PostgresTemporaryGrantRepository {
    async fn append_grant(&self, grant: &TemporaryGrant) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO temporary_ownership_grants (
                tracked_entity_id,
                program_id,
                user_id,
                reason,
                granted_at,
                expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(grant.tracked_entity().as_uuid())
        .bind(grant.program().as_uuid())
        .bind(grant.user().as_uuid())
        .bind(grant.reason().as_str())
        .bind(grant.granted_at())
        .bind(grant.expires_at())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to persist temporary ownership grant for user '{}': {error}",
                grant.user()
            ))
        })?;

        Ok(())
    }
}
