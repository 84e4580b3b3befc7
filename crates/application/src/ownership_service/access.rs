use sentra_core::{AppError, AppResult, OrgUnitId, ProgramId, TrackedEntityId, UserIdentity};
use sentra_domain::{AccessDecision, AccessMode, AuditAction, Program, TrackedEntity};

use crate::{GrantKey, OwnershipAuditEntry, OwnershipKey};

use super::OwnershipService;

impl OwnershipService {
    /// Decides whether `user` may access the (tracked entity, program) pair.
    ///
    /// Unknown programs or tracked entities fail with not-found. Any other
    /// failure underneath the check (store, cache, hierarchy lookup) resolves
    /// to deny, never to a default allow.
    pub async fn has_access(
        &self,
        user: &UserIdentity,
        tracked_entity: TrackedEntityId,
        program: ProgramId,
        mode: AccessMode,
    ) -> AppResult<bool> {
        let program = self.require_program(program).await?;
        let entity = self.require_tracked_entity(tracked_entity).await?;

        let decision = match self.evaluate(user, &entity, &program, mode).await {
            Ok(decision) => decision,
            Err(error) => {
                tracing::warn!(
                    %error,
                    tracked_entity = %entity.id(),
                    program = %program.id(),
                    "access check could not complete; failing closed"
                );
                return Ok(false);
            }
        };

        if decision.is_allowed()
            && mode == AccessMode::Read
            && program.access_level().requires_read_audit()
        {
            let entry = OwnershipAuditEntry {
                action: AuditAction::AuditedProgramAccessed,
                tracked_entity: entity.id(),
                program: program.id(),
                actor: user.user_id(),
                detail: None,
            };
            self.audit.record(entry, program.tracked_entity_type()).await;
        }

        Ok(decision.is_allowed())
    }

    /// Returns whether a non-expired temporary grant exists for the exact
    /// (tracked entity, program, user) key.
    ///
    /// Reads the grant cache only; the cache TTL equals the grant TTL, so on
    /// a correctly running process the cache is authoritative and a miss
    /// means no valid grant. After a restart a still-valid persisted grant is
    /// therefore not honored until a new grant is requested.
    pub async fn has_temporary_access(
        &self,
        tracked_entity: TrackedEntityId,
        program: ProgramId,
        user: &UserIdentity,
    ) -> AppResult<bool> {
        let key = GrantKey {
            tracked_entity,
            program,
            user: user.user_id(),
        };

        match self.grant_cache.get_grant(key).await? {
            Some(grant) => Ok(grant.is_active(self.clock.now())),
            None => Ok(false),
        }
    }

    async fn evaluate(
        &self,
        user: &UserIdentity,
        entity: &TrackedEntity,
        program: &Program,
        mode: AccessMode,
    ) -> AppResult<AccessDecision> {
        let owner = self.resolve_owner(entity, program.id()).await?;
        let scope = match mode {
            AccessMode::Read => user.search_scope(),
            AccessMode::Write => user.capture_scope(),
        };
        let owner_in_scope = self.org_units.is_within_scope(owner, scope).await?;

        let level = program.access_level();
        let decision = level.decide(owner_in_scope, false);
        if decision.is_allowed() || !level.supports_override() {
            return Ok(decision);
        }

        let active_grant = self
            .has_temporary_access(entity.id(), program.id(), user)
            .await?;
        Ok(level.decide(owner_in_scope, active_grant))
    }

    /// Resolves the current owner of the pair through the cache, reading the
    /// store on a miss and falling back to the entity's captured organisation
    /// unit when no ownership record exists yet.
    pub(super) async fn resolve_owner(
        &self,
        entity: &TrackedEntity,
        program: ProgramId,
    ) -> AppResult<OrgUnitId> {
        let key = OwnershipKey {
            tracked_entity: entity.id(),
            program,
        };

        if let Some(org_unit) = self.ownership_cache.get_owner(key).await? {
            return Ok(org_unit);
        }

        let org_unit = match self.ownership.find_owner(key).await? {
            Some(org_unit) => org_unit,
            None => entity.captured_org_unit(),
        };

        self.ownership_cache
            .put_owner(key, org_unit, self.config.ownership_cache_ttl_seconds)
            .await?;

        Ok(org_unit)
    }

    /// Ensures the user may access the pair, failing with forbidden otherwise.
    pub async fn require_access(
        &self,
        user: &UserIdentity,
        tracked_entity: TrackedEntityId,
        program: ProgramId,
        mode: AccessMode,
    ) -> AppResult<()> {
        if self.has_access(user, tracked_entity, program, mode).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' may not {} tracked entity '{tracked_entity}' in program '{program}'",
            user.username(),
            mode.as_str(),
        )))
    }
}
