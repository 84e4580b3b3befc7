//! Application services and ports for tracked-entity ownership.

#![forbid(unsafe_code)]

mod audit_logger;
mod ownership_ports;
mod ownership_service;

pub use audit_logger::OwnershipAuditLogger;
pub use ownership_ports::{
    Clock, GrantKey, OrganisationUnitRepository, OwnershipAuditEntry, OwnershipAuditRepository,
    OwnershipCache, OwnershipKey, OwnershipRepository, OwnershipTransfer, TemporaryGrantCache,
    TemporaryGrantRepository, TrackerMetadataRepository, UserRepository,
};
pub use ownership_service::{OwnershipConfig, OwnershipService};
