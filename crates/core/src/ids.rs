use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, AppResult};

fn parse_uuid(kind: &str, value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| AppError::Validation(format!("malformed {kind} identifier '{value}'")))
}

/// Identifier of a tracked entity (the person/record under ownership control).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackedEntityId(Uuid);

impl TrackedEntityId {
    /// Creates a random tracked-entity identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a tracked-entity identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a tracked-entity identifier from its canonical string form.
    pub fn parse(value: &str) -> AppResult<Self> {
        parse_uuid("tracked entity", value).map(Self)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TrackedEntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TrackedEntityId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of a program (a data-collection workflow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramId(Uuid);

impl ProgramId {
    /// Creates a random program identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a program identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a program identifier from its canonical string form.
    pub fn parse(value: &str) -> AppResult<Self> {
        parse_uuid("program", value).map(Self)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ProgramId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ProgramId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of an organisation unit in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrgUnitId(Uuid);

impl OrgUnitId {
    /// Creates a random organisation-unit identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an organisation-unit identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses an organisation-unit identifier from its canonical string form.
    pub fn parse(value: &str) -> AppResult<Self> {
        parse_uuid("organisation unit", value).map(Self)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OrgUnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for OrgUnitId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of a tracked-entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackedEntityTypeId(Uuid);

impl TrackedEntityTypeId {
    /// Creates a random tracked-entity-type identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a tracked-entity-type identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a tracked-entity-type identifier from its canonical string form.
    pub fn parse(value: &str) -> AppResult<Self> {
        parse_uuid("tracked entity type", value).map(Self)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TrackedEntityTypeId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TrackedEntityTypeId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a user identifier from its canonical string form.
    pub fn parse(value: &str) -> AppResult<Self> {
        parse_uuid("user", value).map(Self)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{ProgramId, TrackedEntityId};

    #[test]
    fn id_formats_as_uuid() {
        let id = TrackedEntityId::new();
        assert_eq!(id.to_string().len(), 36);
    }

    #[test]
    fn id_roundtrips_through_parse() {
        let id = ProgramId::new();
        let parsed = ProgramId::parse(&id.to_string());
        assert!(parsed.is_ok_and(|value| value == id));
    }

    #[test]
    fn malformed_id_is_rejected() {
        let parsed = TrackedEntityId::parse("not-a-uuid");
        assert!(parsed.is_err());
    }
}
