use std::sync::Arc;

use sentra_domain::TrackedEntityType;

use crate::{OwnershipAuditEntry, OwnershipAuditRepository};

/// Capability-checked sink for ownership audit records.
///
/// Whether an entry is written is decided by the governing tracked-entity
/// type's `allow_audit_log` flag, so callers invoke the sink unconditionally.
/// Append failures are surfaced to operational logging and never propagated:
/// auditing must not block the grant or access path it decorates.
#[derive(Clone)]
pub struct OwnershipAuditLogger {
    repository: Arc<dyn OwnershipAuditRepository>,
}

impl OwnershipAuditLogger {
    /// Creates an audit logger over a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn OwnershipAuditRepository>) -> Self {
        Self { repository }
    }

    /// Writes one audit entry when the tracked-entity type allows auditing.
    pub async fn record(&self, entry: OwnershipAuditEntry, tracked_entity_type: &TrackedEntityType) {
        if !tracked_entity_type.allow_audit_log() {
            return;
        }

        if let Err(error) = self.repository.append_entry(entry).await {
            tracing::error!(%error, "failed to append ownership audit entry");
        }
    }
}
