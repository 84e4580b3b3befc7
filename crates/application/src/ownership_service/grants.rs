use chrono::Duration;
use sentra_core::{AppError, AppResult, ProgramId, TrackedEntityId, UserIdentity};
use sentra_domain::{AuditAction, TemporaryGrant};

use crate::OwnershipAuditEntry;

use super::OwnershipService;

impl OwnershipService {
    /// Creates a break-the-glass override for `user` on the pair.
    ///
    /// Only programs at the protected level accept overrides; the
    /// justification is mandatory. The grant is persisted, inserted into the
    /// grant cache with the identical TTL, and audit-logged when the
    /// tracked-entity type allows it. Granting again while an earlier grant
    /// is still active simply appends another grant.
    pub async fn grant_temporary_ownership(
        &self,
        tracked_entity: TrackedEntityId,
        program: ProgramId,
        user: &UserIdentity,
        reason: &str,
    ) -> AppResult<TemporaryGrant> {
        let program = self.require_program(program).await?;
        if !program.access_level().supports_override() {
            return Err(AppError::NotAllowed(format!(
                "program '{}' has access level '{}'; temporary ownership applies only to protected programs",
                program.id(),
                program.access_level().as_str(),
            )));
        }

        let entity = self.require_tracked_entity(tracked_entity).await?;

        let ttl_seconds = self.config.temporary_grant_ttl_seconds;
        let granted_at = self.clock.now();
        let expires_at = granted_at + Duration::seconds(i64::from(ttl_seconds));
        let grant = TemporaryGrant::new(
            entity.id(),
            program.id(),
            user.user_id(),
            reason,
            granted_at,
            expires_at,
        )?;

        self.grants.append_grant(&grant).await?;
        self.grant_cache.put_grant(grant.clone(), ttl_seconds).await?;

        let entry = OwnershipAuditEntry {
            action: AuditAction::TemporaryOwnershipGranted,
            tracked_entity: entity.id(),
            program: program.id(),
            actor: user.user_id(),
            detail: Some(format!(
                "reason='{}', expires_at='{}'",
                grant.reason().as_str(),
                grant.expires_at().to_rfc3339(),
            )),
        };
        self.audit.record(entry, program.tracked_entity_type()).await;

        tracing::info!(
            tracked_entity = %entity.id(),
            program = %program.id(),
            user = %user.user_id(),
            expires_at = %grant.expires_at(),
            "temporary ownership granted"
        );

        Ok(grant)
    }
}
