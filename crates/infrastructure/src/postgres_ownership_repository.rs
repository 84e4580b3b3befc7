use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use sentra_application::{OwnershipKey, OwnershipRepository, OwnershipTransfer};
use sentra_core::{AppError, AppResult, OrgUnitId, ProgramId, TrackedEntityId, UserId};
use sentra_domain::{OwnershipHistoryEntry, OwnershipRecord};

/// PostgreSQL-backed ownership store with an append-only history trail.
#[derive(Clone)]
pub struct PostgresOwnershipRepository {
    pool: PgPool,
}

impl PostgresOwnershipRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OwnerRow {
    org_unit_id: uuid::Uuid,
}

#[derive(Debug, FromRow)]
struct HistoryRow {
    tracked_entity_id: uuid::Uuid,
    program_id: uuid::Uuid,
    old_org_unit_id: uuid::Uuid,
    new_org_unit_id: uuid::Uuid,
    changed_at: DateTime<Utc>,
    actor_id: uuid::Uuid,
}

#[async_trait]
impl OwnershipRepository for PostgresOwnershipRepository {
    async fn find_owner(&self, key: OwnershipKey) -> AppResult<Option<OrgUnitId>> {
        let row = sqlx::query_as::<_, OwnerRow>(
            r#"
            SELECT org_unit_id
            FROM ownership_records
            WHERE tracked_entity_id = $1
              AND program_id = $2
            "#,
        )
        .bind(key.tracked_entity.as_uuid())
        .bind(key.program.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to resolve owner for tracked entity '{}' in program '{}': {error}",
                key.tracked_entity, key.program
            ))
        })?;

        Ok(row.map(|row| OrgUnitId::from_uuid(row.org_unit_id)))
    }

    async fn assign_ownership(&self, record: OwnershipRecord) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            INSERT INTO ownership_records (tracked_entity_id, program_id, org_unit_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (tracked_entity_id, program_id) DO NOTHING
            "#,
        )
        .bind(record.tracked_entity().as_uuid())
        .bind(record.program().as_uuid())
        .bind(record.org_unit().as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to create ownership record: {error}"))
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "ownership record already exists for tracked entity '{}' in program '{}'",
                record.tracked_entity(),
                record.program()
            )));
        }

        Ok(())
    }

    async fn transfer_ownership(
        &self,
        key: OwnershipKey,
        new_org_unit: OrgUnitId,
        actor: UserId,
    ) -> AppResult<OwnershipTransfer> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let current = sqlx::query_as::<_, OwnerRow>(
            r#"
            SELECT org_unit_id
            FROM ownership_records
            WHERE tracked_entity_id = $1
              AND program_id = $2
            FOR UPDATE
            "#,
        )
        .bind(key.tracked_entity.as_uuid())
        .bind(key.program.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to lock ownership record: {error}"))
        })?;

        let Some(current) = current.map(|row| OrgUnitId::from_uuid(row.org_unit_id)) else {
            return Err(AppError::NotFound(format!(
                "no ownership record for tracked entity '{}' in program '{}'",
                key.tracked_entity, key.program
            )));
        };

        if current == new_org_unit {
            return Ok(OwnershipTransfer::Unchanged);
        }

        sqlx::query(
            r#"
            INSERT INTO ownership_history (
                tracked_entity_id,
                program_id,
                old_org_unit_id,
                new_org_unit_id,
                changed_at,
                actor_id
            )
            VALUES ($1, $2, $3, $4, now(), $5)
            "#,
        )
        .bind(key.tracked_entity.as_uuid())
        .bind(key.program.as_uuid())
        .bind(current.as_uuid())
        .bind(new_org_unit.as_uuid())
        .bind(actor.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to append ownership history entry: {error}"))
        })?;

        sqlx::query(
            r#"
            UPDATE ownership_records
            SET org_unit_id = $3,
                updated_at = now()
            WHERE tracked_entity_id = $1
              AND program_id = $2
            "#,
        )
        .bind(key.tracked_entity.as_uuid())
        .bind(key.program.as_uuid())
        .bind(new_org_unit.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update ownership record: {error}"))
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(OwnershipTransfer::Completed {
            old_org_unit: current,
            new_org_unit,
        })
    }

    async fn list_history(&self, key: OwnershipKey) -> AppResult<Vec<OwnershipHistoryEntry>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT
                tracked_entity_id,
                program_id,
                old_org_unit_id,
                new_org_unit_id,
                changed_at,
                actor_id
            FROM ownership_history
            WHERE tracked_entity_id = $1
              AND program_id = $2
            ORDER BY changed_at ASC, id ASC
            "#,
        )
        .bind(key.tracked_entity.as_uuid())
        .bind(key.program.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list ownership history: {error}"))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| {
                OwnershipHistoryEntry::new(
                    TrackedEntityId::from_uuid(row.tracked_entity_id),
                    ProgramId::from_uuid(row.program_id),
                    OrgUnitId::from_uuid(row.old_org_unit_id),
                    OrgUnitId::from_uuid(row.new_org_unit_id),
                    row.changed_at,
                    UserId::from_uuid(row.actor_id),
                )
            })
            .collect())
    }
}
