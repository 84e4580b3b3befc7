use std::sync::Arc;

use sentra_core::{AppError, AppResult, ProgramId, TrackedEntityId};
use sentra_domain::{Program, TrackedEntity};

use crate::{
    Clock, OrganisationUnitRepository, OwnershipAuditLogger, OwnershipCache, OwnershipRepository,
    TemporaryGrantCache, TemporaryGrantRepository, TrackerMetadataRepository,
};

mod access;
mod grants;
mod transfer;


/// Tunables for the ownership façade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipConfig {
    /// Lifetime of a temporary ownership grant and of its cache entry.
    pub temporary_grant_ttl_seconds: u32,
    /// Lifetime of a cached owner resolution.
    pub ownership_cache_ttl_seconds: u32,
}

impl Default for OwnershipConfig {
    fn default() -> Self {
        Self {
            temporary_grant_ttl_seconds: 10_800,
            ownership_cache_ttl_seconds: 300,
        }
    }
}

/// Façade over ownership resolution, access decisions, break-the-glass
/// overrides and ownership transfer. The only entry point other subsystems
/// call.
#[derive(Clone)]
pub struct OwnershipService {
    metadata: Arc<dyn TrackerMetadataRepository>,
    ownership: Arc<dyn OwnershipRepository>,
    ownership_cache: Arc<dyn OwnershipCache>,
    grants: Arc<dyn TemporaryGrantRepository>,
    grant_cache: Arc<dyn TemporaryGrantCache>,
    org_units: Arc<dyn OrganisationUnitRepository>,
    audit: OwnershipAuditLogger,
    clock: Arc<dyn Clock>,
    config: OwnershipConfig,
}

impl OwnershipService {
    /// Creates the façade from port implementations. Caches are constructed
    /// once at process start and shared by reference across all requests.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        metadata: Arc<dyn TrackerMetadataRepository>,
        ownership: Arc<dyn OwnershipRepository>,
        ownership_cache: Arc<dyn OwnershipCache>,
        grants: Arc<dyn TemporaryGrantRepository>,
        grant_cache: Arc<dyn TemporaryGrantCache>,
        org_units: Arc<dyn OrganisationUnitRepository>,
        audit: OwnershipAuditLogger,
        clock: Arc<dyn Clock>,
        config: OwnershipConfig,
    ) -> Self {
        Self {
            metadata,
            ownership,
            ownership_cache,
            grants,
            grant_cache,
            org_units,
            audit,
            clock,
            config,
        }
    }

    async fn require_program(&self, id: ProgramId) -> AppResult<Program> {
        self.metadata
            .find_program(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("program '{id}' does not exist")))
    }

    async fn require_tracked_entity(&self, id: TrackedEntityId) -> AppResult<TrackedEntity> {
        self.metadata
            .find_tracked_entity(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("tracked entity '{id}' does not exist")))
    }
}
