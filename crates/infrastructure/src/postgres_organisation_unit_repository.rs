use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use sentra_application::OrganisationUnitRepository;
use sentra_core::{AppError, AppResult, OrgUnitId};

/// PostgreSQL-backed containment check over the organisation-unit hierarchy.
///
/// The hierarchy itself is owned by another subsystem; this adapter only
/// consumes the materialised `path` column, which lists the ancestor chain of
/// a unit as `/<root-id>/.../<unit-id>`.
#[derive(Clone)]
pub struct PostgresOrganisationUnitRepository {
    pool: PgPool,
}

impl PostgresOrganisationUnitRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PathRow {
    path: String,
}

#[async_trait]
impl OrganisationUnitRepository for PostgresOrganisationUnitRepository {
    async fn is_within_scope(
        &self,
        org_unit: OrgUnitId,
        scope: &BTreeSet<OrgUnitId>,
    ) -> AppResult<bool> {
        if scope.is_empty() {
            return Ok(false);
        }

        let row = sqlx::query_as::<_, PathRow>(
            r#"
            SELECT path
            FROM organisation_units
            WHERE id = $1
            "#,
        )
        .bind(org_unit.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to resolve organisation unit '{org_unit}': {error}"
            ))
        })?;

        // An unknown unit is contained in no scope.
        let Some(row) = row else {
            return Ok(false);
        };

        let ancestors: BTreeSet<&str> =
            row.path.split('/').filter(|part| !part.is_empty()).collect();
        Ok(scope
            .iter()
            .any(|unit| ancestors.contains(unit.to_string().as_str())))
    }
}
