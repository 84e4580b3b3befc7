//! Adapters backing the ownership application ports.

#![forbid(unsafe_code)]

mod in_memory_ownership_cache;
mod in_memory_ownership_repository;
mod in_memory_temporary_grant_cache;
mod postgres_organisation_unit_repository;
mod postgres_ownership_audit_repository;
mod postgres_ownership_repository;
mod postgres_temporary_grant_repository;
mod postgres_tracker_metadata_repository;
mod postgres_user_repository;
mod system_clock;

pub use in_memory_ownership_cache::InMemoryOwnershipCache;
pub use in_memory_ownership_repository::InMemoryOwnershipRepository;
pub use in_memory_temporary_grant_cache::InMemoryTemporaryGrantCache;
pub use postgres_organisation_unit_repository::PostgresOrganisationUnitRepository;
pub use postgres_ownership_audit_repository::PostgresOwnershipAuditRepository;
pub use postgres_ownership_repository::PostgresOwnershipRepository;
pub use postgres_temporary_grant_repository::PostgresTemporaryGrantRepository;
pub use postgres_tracker_metadata_repository::PostgresTrackerMetadataRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use system_clock::SystemClock;
