//! Domain entities and invariants for tracked-entity ownership.

#![forbid(unsafe_code)]

mod metadata;
mod ownership;

pub use metadata::{AccessLevel, Program, TrackedEntity, TrackedEntityType};
pub use ownership::{
    AccessDecision, AccessMode, AuditAction, OwnershipHistoryEntry, OwnershipRecord, TemporaryGrant,
};
