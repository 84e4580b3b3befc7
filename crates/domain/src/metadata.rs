use std::str::FromStr;

use sentra_core::{
    AppError, AppResult, NonEmptyString, OrgUnitId, ProgramId, TrackedEntityId, TrackedEntityTypeId,
};
use serde::{Deserialize, Serialize};

use crate::ownership::AccessDecision;

/// Per-program protection level governing tracked-entity data access.
///
/// The level fully determines whether break-the-glass overrides are possible:
/// only [`AccessLevel::Protected`] programs accept temporary ownership grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Organisation-unit scope alone decides access.
    Open,
    /// Scope decides access; every allowed read is audit-logged.
    Audited,
    /// Scope decides access, but an active temporary grant overrides a deny.
    Protected,
    /// Scope decides access; no override can ever apply.
    Closed,
}

impl AccessLevel {
    /// Returns a stable storage value for this access level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Audited => "audited",
            Self::Protected => "protected",
            Self::Closed => "closed",
        }
    }

    /// Returns whether a temporary ownership grant can override a deny at
    /// this level. True only for [`AccessLevel::Protected`].
    #[must_use]
    pub fn supports_override(self) -> bool {
        match self {
            Self::Open | Self::Audited | Self::Closed => false,
            Self::Protected => true,
        }
    }

    /// Returns whether allowed reads at this level must be audit-logged.
    #[must_use]
    pub fn requires_read_audit(self) -> bool {
        matches!(self, Self::Audited)
    }

    /// Evaluates the access decision table for this level.
    ///
    /// Pure and deterministic: `owner_in_scope` is the delegated hierarchy
    /// containment result for the owning organisation unit, `active_grant`
    /// states whether a non-expired temporary grant exists for the exact
    /// (tracked entity, program, user) key. Grants only matter at
    /// [`AccessLevel::Protected`]; [`AccessLevel::Closed`] is absolute.
    #[must_use]
    pub fn decide(self, owner_in_scope: bool, active_grant: bool) -> AccessDecision {
        let allowed = match self {
            Self::Open | Self::Audited => owner_in_scope,
            Self::Protected => owner_in_scope || active_grant,
            Self::Closed => owner_in_scope,
        };

        if allowed {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny
        }
    }
}

impl FromStr for AccessLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "open" => Ok(Self::Open),
            "audited" => Ok(Self::Audited),
            "protected" => Ok(Self::Protected),
            "closed" => Ok(Self::Closed),
            _ => Err(AppError::Validation(format!(
                "unknown access level value '{value}'"
            ))),
        }
    }
}

/// Read-only program metadata consumed by the ownership checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    id: ProgramId,
    name: NonEmptyString,
    access_level: AccessLevel,
    tracked_entity_type: TrackedEntityType,
}

impl Program {
    /// Creates program metadata with a validated name.
    pub fn new(
        id: ProgramId,
        name: impl Into<String>,
        access_level: AccessLevel,
        tracked_entity_type: TrackedEntityType,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            access_level,
            tracked_entity_type,
        })
    }

    /// Returns the program identifier.
    #[must_use]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Returns the program name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the protection level governing this program's data.
    #[must_use]
    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    /// Returns the tracked-entity type this program enrolls.
    #[must_use]
    pub fn tracked_entity_type(&self) -> &TrackedEntityType {
        &self.tracked_entity_type
    }
}

/// Read-only tracked-entity-type metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntityType {
    id: TrackedEntityTypeId,
    name: NonEmptyString,
    allow_audit_log: bool,
}

impl TrackedEntityType {
    /// Creates tracked-entity-type metadata with a validated name.
    pub fn new(
        id: TrackedEntityTypeId,
        name: impl Into<String>,
        allow_audit_log: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            allow_audit_log,
        })
    }

    /// Returns the tracked-entity-type identifier.
    #[must_use]
    pub fn id(&self) -> TrackedEntityTypeId {
        self.id
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns whether ownership events for entities of this type are
    /// audit-logged.
    #[must_use]
    pub fn allow_audit_log(&self) -> bool {
        self.allow_audit_log
    }
}

/// Read-only tracked-entity data consumed by the ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntity {
    id: TrackedEntityId,
    tracked_entity_type: TrackedEntityTypeId,
    captured_org_unit: OrgUnitId,
}

impl TrackedEntity {
    /// Creates tracked-entity data.
    #[must_use]
    pub fn new(
        id: TrackedEntityId,
        tracked_entity_type: TrackedEntityTypeId,
        captured_org_unit: OrgUnitId,
    ) -> Self {
        Self {
            id,
            tracked_entity_type,
            captured_org_unit,
        }
    }

    /// Returns the tracked-entity identifier.
    #[must_use]
    pub fn id(&self) -> TrackedEntityId {
        self.id
    }

    /// Returns the identifier of this entity's type.
    #[must_use]
    pub fn tracked_entity_type(&self) -> TrackedEntityTypeId {
        self.tracked_entity_type
    }

    /// Returns the organisation unit the entity was captured at. Used as the
    /// owner when no ownership record exists yet for a (entity, program) pair.
    #[must_use]
    pub fn captured_org_unit(&self) -> OrgUnitId {
        self.captured_org_unit
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::AccessLevel;
    use crate::ownership::AccessDecision;

    #[test]
    fn access_level_roundtrip_storage_value() {
        for level in [
            AccessLevel::Open,
            AccessLevel::Audited,
            AccessLevel::Protected,
            AccessLevel::Closed,
        ] {
            let restored = AccessLevel::from_str(level.as_str());
            assert!(restored.is_ok_and(|value| value == level));
        }
    }

    #[test]
    fn unknown_access_level_is_rejected() {
        let parsed = AccessLevel::from_str("guarded");
        assert!(parsed.is_err());
    }

    #[test]
    fn open_and_audited_ignore_grants() {
        for level in [AccessLevel::Open, AccessLevel::Audited] {
            assert_eq!(level.decide(true, false), AccessDecision::Allow);
            assert_eq!(level.decide(false, true), AccessDecision::Deny);
        }
    }

    #[test]
    fn protected_allows_active_grant_out_of_scope() {
        assert_eq!(
            AccessLevel::Protected.decide(false, true),
            AccessDecision::Allow
        );
        assert_eq!(
            AccessLevel::Protected.decide(false, false),
            AccessDecision::Deny
        );
    }

    #[test]
    fn closed_never_honors_grants() {
        assert_eq!(
            AccessLevel::Closed.decide(false, true),
            AccessDecision::Deny
        );
        assert_eq!(AccessLevel::Closed.decide(true, true), AccessDecision::Allow);
    }

    #[test]
    fn only_protected_supports_override() {
        assert!(AccessLevel::Protected.supports_override());
        assert!(!AccessLevel::Open.supports_override());
        assert!(!AccessLevel::Audited.supports_override());
        assert!(!AccessLevel::Closed.supports_override());
    }
}
