use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use sentra_application::TrackerMetadataRepository;
use sentra_core::{
    AppError, AppResult, OrgUnitId, ProgramId, TrackedEntityId, TrackedEntityTypeId,
};
use sentra_domain::{AccessLevel, Program, TrackedEntity, TrackedEntityType};

/// PostgreSQL-backed read model for tracker metadata.
#[derive(Clone)]
pub struct PostgresTrackerMetadataRepository {
    pool: PgPool,
}

impl PostgresTrackerMetadataRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProgramRow {
    program_id: uuid::Uuid,
    program_name: String,
    access_level: String,
    type_id: uuid::Uuid,
    type_name: String,
    allow_audit_log: bool,
}

#[derive(Debug, FromRow)]
struct TrackedEntityRow {
    tracked_entity_id: uuid::Uuid,
    tracked_entity_type_id: uuid::Uuid,
    captured_org_unit_id: uuid::Uuid,
}

#[async_trait]
impl TrackerMetadataRepository for PostgresTrackerMetadataRepository {
    async fn find_program(&self, id: ProgramId) -> AppResult<Option<Program>> {
        let row = sqlx::query_as::<_, ProgramRow>(
            r#"
            SELECT
                programs.id AS program_id,
                programs.name AS program_name,
                programs.access_level,
                types.id AS type_id,
                types.name AS type_name,
                types.allow_audit_log
            FROM programs
            INNER JOIN tracked_entity_types AS types
                ON types.id = programs.tracked_entity_type_id
            WHERE programs.id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to look up program '{id}': {error}"))
        })?;

        row.map(|row| {
            let tracked_entity_type = TrackedEntityType::new(
                TrackedEntityTypeId::from_uuid(row.type_id),
                row.type_name,
                row.allow_audit_log,
            )?;
            Program::new(
                ProgramId::from_uuid(row.program_id),
                row.program_name,
                AccessLevel::from_str(&row.access_level)?,
                tracked_entity_type,
            )
        })
        .transpose()
    }

    async fn find_tracked_entity(
        &self,
        id: TrackedEntityId,
    ) -> AppResult<Option<TrackedEntity>> {
        let row = sqlx::query_as::<_, TrackedEntityRow>(
            r#"
            SELECT
                id AS tracked_entity_id,
                tracked_entity_type_id,
                captured_org_unit_id
            FROM tracked_entities
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to look up tracked entity '{id}': {error}"))
        })?;

        Ok(row.map(|row| {
            TrackedEntity::new(
                TrackedEntityId::from_uuid(row.tracked_entity_id),
                TrackedEntityTypeId::from_uuid(row.tracked_entity_type_id),
                OrgUnitId::from_uuid(row.captured_org_unit_id),
            )
        }))
    }
}
