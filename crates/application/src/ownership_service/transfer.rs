use sentra_core::{AppResult, OrgUnitId, ProgramId, TrackedEntityId, UserIdentity};
use sentra_domain::{AccessMode, OwnershipHistoryEntry, OwnershipRecord};

use crate::{OwnershipKey, OwnershipTransfer};

use super::OwnershipService;

impl OwnershipService {
    /// Transfers ownership of the pair to `new_org_unit`.
    ///
    /// The actor must currently hold write access to the pair. The store
    /// writes the history entry and the record update in one transaction;
    /// the cached owner is evicted strictly after that transaction committed,
    /// never before, so a concurrent reader can at worst briefly observe the
    /// pre-transfer owner but never an uncommitted one. Transferring to the
    /// current owner is a no-op.
    pub async fn transfer_ownership(
        &self,
        actor: &UserIdentity,
        tracked_entity: TrackedEntityId,
        program: ProgramId,
        new_org_unit: OrgUnitId,
    ) -> AppResult<()> {
        let program = self.require_program(program).await?;
        let entity = self.require_tracked_entity(tracked_entity).await?;
        self.require_access(actor, entity.id(), program.id(), AccessMode::Write)
            .await?;

        let key = OwnershipKey {
            tracked_entity: entity.id(),
            program: program.id(),
        };
        let outcome = self
            .ownership
            .transfer_ownership(key, new_org_unit, actor.user_id())
            .await?;

        if let OwnershipTransfer::Completed {
            old_org_unit,
            new_org_unit,
        } = outcome
        {
            // The repository call returns only after commit; eviction here
            // can therefore never expose an uncommitted owner.
            self.ownership_cache.invalidate_owner(key).await?;

            tracing::info!(
                tracked_entity = %entity.id(),
                program = %program.id(),
                %old_org_unit,
                %new_org_unit,
                actor = %actor.user_id(),
                "ownership transferred"
            );
        }

        Ok(())
    }

    /// Creates the first ownership record for the pair, typically at
    /// enrollment creation time. Fails with a conflict when a record already
    /// exists; use [`OwnershipService::transfer_ownership`] instead.
    pub async fn assign_ownership(
        &self,
        tracked_entity: TrackedEntityId,
        program: ProgramId,
        org_unit: OrgUnitId,
    ) -> AppResult<()> {
        let program = self.require_program(program).await?;
        let entity = self.require_tracked_entity(tracked_entity).await?;

        self.ownership
            .assign_ownership(OwnershipRecord::new(entity.id(), program.id(), org_unit))
            .await
    }

    /// Lists the transfer history for the pair, oldest first.
    pub async fn ownership_history(
        &self,
        tracked_entity: TrackedEntityId,
        program: ProgramId,
    ) -> AppResult<Vec<OwnershipHistoryEntry>> {
        let key = OwnershipKey {
            tracked_entity,
            program,
        };
        self.ownership.list_history(key).await
    }
}
