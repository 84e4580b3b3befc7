use chrono::{DateTime, Utc};
use sentra_core::{
    AppResult, NonEmptyString, OrgUnitId, ProgramId, TrackedEntityId, UserId,
};
use serde::{Deserialize, Serialize};

/// Outcome of the access decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    /// The user may access the (tracked entity, program) pair.
    Allow,
    /// The user may not access the (tracked entity, program) pair.
    Deny,
}

impl AccessDecision {
    /// Returns true for [`AccessDecision::Allow`].
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Kind of data access being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Reading tracked-entity data; checked against the user's search scope.
    Read,
    /// Writing tracked-entity data; checked against the user's capture scope.
    Write,
}

impl AccessMode {
    /// Returns a stable transport value for this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// Current owning organisation unit of one (tracked entity, program) pair.
///
/// Exactly one live record exists per pair. It is created once at enrollment
/// time, mutated only through ownership transfer, and never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    tracked_entity: TrackedEntityId,
    program: ProgramId,
    org_unit: OrgUnitId,
}

impl OwnershipRecord {
    /// Creates an ownership record.
    #[must_use]
    pub fn new(tracked_entity: TrackedEntityId, program: ProgramId, org_unit: OrgUnitId) -> Self {
        Self {
            tracked_entity,
            program,
            org_unit,
        }
    }

    /// Returns the tracked-entity identifier.
    #[must_use]
    pub fn tracked_entity(&self) -> TrackedEntityId {
        self.tracked_entity
    }

    /// Returns the program identifier.
    #[must_use]
    pub fn program(&self) -> ProgramId {
        self.program
    }

    /// Returns the owning organisation unit.
    #[must_use]
    pub fn org_unit(&self) -> OrgUnitId {
        self.org_unit
    }
}

/// Immutable record of one completed ownership transfer.
///
/// One entry is appended per successful transfer, in the same transaction as
/// the ownership-record update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipHistoryEntry {
    tracked_entity: TrackedEntityId,
    program: ProgramId,
    old_org_unit: OrgUnitId,
    new_org_unit: OrgUnitId,
    changed_at: DateTime<Utc>,
    actor: UserId,
}

impl OwnershipHistoryEntry {
    /// Creates a history entry capturing one transfer.
    #[must_use]
    pub fn new(
        tracked_entity: TrackedEntityId,
        program: ProgramId,
        old_org_unit: OrgUnitId,
        new_org_unit: OrgUnitId,
        changed_at: DateTime<Utc>,
        actor: UserId,
    ) -> Self {
        Self {
            tracked_entity,
            program,
            old_org_unit,
            new_org_unit,
            changed_at,
            actor,
        }
    }

    /// Returns the tracked-entity identifier.
    #[must_use]
    pub fn tracked_entity(&self) -> TrackedEntityId {
        self.tracked_entity
    }

    /// Returns the program identifier.
    #[must_use]
    pub fn program(&self) -> ProgramId {
        self.program
    }

    /// Returns the organisation unit that owned the pair before the transfer.
    #[must_use]
    pub fn old_org_unit(&self) -> OrgUnitId {
        self.old_org_unit
    }

    /// Returns the organisation unit that owns the pair after the transfer.
    #[must_use]
    pub fn new_org_unit(&self) -> OrgUnitId {
        self.new_org_unit
    }

    /// Returns when the transfer was committed.
    #[must_use]
    pub fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }

    /// Returns the user who performed the transfer.
    #[must_use]
    pub fn actor(&self) -> UserId {
        self.actor
    }
}

/// A time-boxed break-the-glass override granting one user access to one
/// (tracked entity, program) pair on a protected program.
///
/// Immutable once created; expiry is lazy, checked at read time against an
/// injected clock. Repeated grants for the same key simply append further
/// grants; any non-expired grant authorizes access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryGrant {
    tracked_entity: TrackedEntityId,
    program: ProgramId,
    user: UserId,
    reason: NonEmptyString,
    granted_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TemporaryGrant {
    /// Creates a grant with a validated, mandatory justification.
    pub fn new(
        tracked_entity: TrackedEntityId,
        program: ProgramId,
        user: UserId,
        reason: impl Into<String>,
        granted_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            tracked_entity,
            program,
            user,
            reason: NonEmptyString::new(reason)?,
            granted_at,
            expires_at,
        })
    }

    /// Returns the tracked-entity identifier.
    #[must_use]
    pub fn tracked_entity(&self) -> TrackedEntityId {
        self.tracked_entity
    }

    /// Returns the program identifier.
    #[must_use]
    pub fn program(&self) -> ProgramId {
        self.program
    }

    /// Returns the user the override was granted to.
    #[must_use]
    pub fn user(&self) -> UserId {
        self.user
    }

    /// Returns the mandatory justification captured at grant time.
    #[must_use]
    pub fn reason(&self) -> &NonEmptyString {
        &self.reason
    }

    /// Returns when the grant was created.
    #[must_use]
    pub fn granted_at(&self) -> DateTime<Utc> {
        self.granted_at
    }

    /// Returns when the grant expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns whether the grant is still active at the given instant.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Stable audit actions emitted by the ownership subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a temporary ownership grant is created.
    TemporaryOwnershipGranted,
    /// Emitted when an audited program's tracked-entity data is accessed.
    AuditedProgramAccessed,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TemporaryOwnershipGranted => "ownership.temporary_grant.created",
            Self::AuditedProgramAccessed => "ownership.audited_program.accessed",
        }
    }
}
