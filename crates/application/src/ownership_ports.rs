use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sentra_core::{
    AppResult, OrgUnitId, ProgramId, TrackedEntityId, UserId, UserIdentity,
};
use sentra_domain::{
    AuditAction, OwnershipHistoryEntry, OwnershipRecord, Program, TemporaryGrant, TrackedEntity,
};

/// Key identifying the ownership of one (tracked entity, program) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnershipKey {
    /// Tracked-entity identifier.
    pub tracked_entity: TrackedEntityId,
    /// Program identifier.
    pub program: ProgramId,
}

/// Key identifying a temporary grant for one user on one ownership pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GrantKey {
    /// Tracked-entity identifier.
    pub tracked_entity: TrackedEntityId,
    /// Program identifier.
    pub program: ProgramId,
    /// User the grant belongs to.
    pub user: UserId,
}

impl GrantKey {
    /// Returns the ownership part of this grant key.
    #[must_use]
    pub fn ownership(&self) -> OwnershipKey {
        OwnershipKey {
            tracked_entity: self.tracked_entity,
            program: self.program,
        }
    }
}

/// Outcome of an ownership transfer against the persistent store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipTransfer {
    /// The record was updated and one history entry appended.
    Completed {
        /// Owner before the transfer.
        old_org_unit: OrgUnitId,
        /// Owner after the transfer.
        new_org_unit: OrgUnitId,
    },
    /// The requested owner equals the current owner; nothing was written.
    Unchanged,
}

/// Repository port for ownership records and their append-only history.
///
/// `transfer_ownership` implementations must write the history entry and the
/// record update in one transaction and return only after it committed, so
/// callers can sequence cache invalidation strictly after the commit.
#[async_trait]
pub trait OwnershipRepository: Send + Sync {
    /// Returns the owning organisation unit for the pair, if a record exists.
    async fn find_owner(&self, key: OwnershipKey) -> AppResult<Option<OrgUnitId>>;

    /// Creates the first ownership record for the pair. Fails with a conflict
    /// when a record already exists; the existing record is left untouched.
    async fn assign_ownership(&self, record: OwnershipRecord) -> AppResult<()>;

    /// Transfers ownership to `new_org_unit`, appending one history entry in
    /// the same transaction. Fails with not-found when no record exists; a
    /// transfer to the current owner is a no-op.
    async fn transfer_ownership(
        &self,
        key: OwnershipKey,
        new_org_unit: OrgUnitId,
        actor: UserId,
    ) -> AppResult<OwnershipTransfer>;

    /// Lists the transfer history for the pair, oldest first.
    async fn list_history(&self, key: OwnershipKey) -> AppResult<Vec<OwnershipHistoryEntry>>;
}

/// Repository port for the append-only temporary-grant store.
#[async_trait]
pub trait TemporaryGrantRepository: Send + Sync {
    /// Appends one immutable grant.
    async fn append_grant(&self, grant: &TemporaryGrant) -> AppResult<()>;
}

/// One ownership audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipAuditEntry {
    /// Audit action.
    pub action: AuditAction,
    /// Tracked entity the action concerns.
    pub tracked_entity: TrackedEntityId,
    /// Program the action concerns.
    pub program: ProgramId,
    /// User who triggered the action.
    pub actor: UserId,
    /// Optional free-form context.
    pub detail: Option<String>,
}

/// Repository port for the append-only ownership audit log.
#[async_trait]
pub trait OwnershipAuditRepository: Send + Sync {
    /// Appends one audit entry.
    async fn append_entry(&self, entry: OwnershipAuditEntry) -> AppResult<()>;
}

/// Repository port for read-only tracker metadata.
#[async_trait]
pub trait TrackerMetadataRepository: Send + Sync {
    /// Looks up a program with its embedded tracked-entity type.
    async fn find_program(&self, id: ProgramId) -> AppResult<Option<Program>>;

    /// Looks up a tracked entity.
    async fn find_tracked_entity(&self, id: TrackedEntityId) -> AppResult<Option<TrackedEntity>>;
}

/// Port for the external organisation-unit hierarchy.
#[async_trait]
pub trait OrganisationUnitRepository: Send + Sync {
    /// Returns whether `org_unit` lies within the subtree of any unit in
    /// `scope` (ancestor-or-self containment).
    async fn is_within_scope(
        &self,
        org_unit: OrgUnitId,
        scope: &BTreeSet<OrgUnitId>,
    ) -> AppResult<bool>;
}

/// Port for the external user subsystem.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Resolves a user identity with its organisation-unit scopes.
    async fn find_identity(&self, user: UserId) -> AppResult<Option<UserIdentity>>;
}

/// Read-through cache port in front of [`OwnershipRepository`].
///
/// Entries hold immutable values; concurrent misses populating the same key
/// with the same value are a benign race and need no locking.
#[async_trait]
pub trait OwnershipCache: Send + Sync {
    /// Returns the cached owner for the pair, if present and fresh.
    async fn get_owner(&self, key: OwnershipKey) -> AppResult<Option<OrgUnitId>>;

    /// Stores the owner for the pair with the given TTL. A TTL of zero
    /// disables caching for the call.
    async fn put_owner(
        &self,
        key: OwnershipKey,
        org_unit: OrgUnitId,
        ttl_seconds: u32,
    ) -> AppResult<()>;

    /// Evicts the pair. Called strictly after a transfer transaction commits.
    async fn invalidate_owner(&self, key: OwnershipKey) -> AppResult<()>;
}

/// TTL-bound cache port for active temporary grants.
///
/// The cache is authoritative for access checks: its entry TTL equals the
/// grant TTL, and a miss is read as "no valid grant". This deliberately means
/// a still-valid persisted grant is not honored after a process restart until
/// a new grant is requested; there is no fallback read to the store.
#[async_trait]
pub trait TemporaryGrantCache: Send + Sync {
    /// Returns the cached grant for the key, if present and fresh.
    async fn get_grant(&self, key: GrantKey) -> AppResult<Option<TemporaryGrant>>;

    /// Stores a grant under its key with the given TTL. A TTL of zero
    /// disables caching for the call.
    async fn put_grant(&self, grant: TemporaryGrant, ttl_seconds: u32) -> AppResult<()>;

    /// Evicts the grant for the key.
    async fn invalidate_grant(&self, key: GrantKey) -> AppResult<()>;
}

/// Injectable time source for grant expiry arithmetic.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}
