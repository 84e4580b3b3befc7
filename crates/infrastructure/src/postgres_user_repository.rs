use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use sentra_application::UserRepository;
use sentra_core::{AppError, AppResult, OrgUnitId, UserId, UserIdentity};

/// PostgreSQL-backed read model for user identities and their scopes.
///
/// Stand-in for the external user/session subsystem: the ownership checks
/// only need an identity with its capture and search organisation-unit
/// scope sets.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    username: String,
}

#[derive(Debug, FromRow)]
struct ScopeRow {
    org_unit_id: uuid::Uuid,
    scope: String,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_identity(&self, user: UserId) -> AppResult<Option<UserIdentity>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT username
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to look up user '{user}': {error}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let scopes = sqlx::query_as::<_, ScopeRow>(
            r#"
            SELECT org_unit_id, scope
            FROM user_org_unit_scopes
            WHERE user_id = $1
            "#,
        )
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list scopes for user '{user}': {error}"))
        })?;

        let mut capture_scope = BTreeSet::new();
        let mut search_scope = BTreeSet::new();
        for scope in scopes {
            let org_unit = OrgUnitId::from_uuid(scope.org_unit_id);
            match scope.scope.as_str() {
                "capture" => {
                    capture_scope.insert(org_unit);
                }
                "search" => {
                    search_scope.insert(org_unit);
                }
                other => {
                    return Err(AppError::Internal(format!(
                        "unknown organisation-unit scope kind '{other}' for user '{user}'"
                    )));
                }
            }
        }

        Ok(Some(UserIdentity::new(
            user,
            row.username,
            capture_scope,
            search_scope,
        )))
    }
}
