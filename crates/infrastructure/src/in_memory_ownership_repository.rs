use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sentra_application::{OwnershipKey, OwnershipRepository, OwnershipTransfer};
use sentra_core::{AppError, AppResult, OrgUnitId, UserId};
use sentra_domain::{OwnershipHistoryEntry, OwnershipRecord};
use tokio::sync::Mutex;

#[derive(Default)]
struct OwnershipState {
    owners: HashMap<OwnershipKey, OrgUnitId>,
    history: Vec<OwnershipHistoryEntry>,
}

/// In-memory ownership store. The single mutex stands in for the database
/// transaction: the history append and the record update become visible
/// together or not at all.
#[derive(Default)]
pub struct InMemoryOwnershipRepository {
    state: Mutex<OwnershipState>,
}

impl InMemoryOwnershipRepository {
    /// Creates an empty ownership store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OwnershipRepository for InMemoryOwnershipRepository {
    async fn find_owner(&self, key: OwnershipKey) -> AppResult<Option<OrgUnitId>> {
        Ok(self.state.lock().await.owners.get(&key).copied())
    }

    async fn assign_ownership(&self, record: OwnershipRecord) -> AppResult<()> {
        let key = OwnershipKey {
            tracked_entity: record.tracked_entity(),
            program: record.program(),
        };
        let mut state = self.state.lock().await;
        if state.owners.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "ownership record already exists for tracked entity '{}' in program '{}'",
                key.tracked_entity, key.program
            )));
        }

        state.owners.insert(key, record.org_unit());
        Ok(())
    }

    async fn transfer_ownership(
        &self,
        key: OwnershipKey,
        new_org_unit: OrgUnitId,
        actor: UserId,
    ) -> AppResult<OwnershipTransfer> {
        let mut state = self.state.lock().await;
        let Some(current) = state.owners.get(&key).copied() else {
            return Err(AppError::NotFound(format!(
                "no ownership record for tracked entity '{}' in program '{}'",
                key.tracked_entity, key.program
            )));
        };

        if current == new_org_unit {
            return Ok(OwnershipTransfer::Unchanged);
        }

        state.history.push(OwnershipHistoryEntry::new(
            key.tracked_entity,
            key.program,
            current,
            new_org_unit,
            Utc::now(),
            actor,
        ));
        state.owners.insert(key, new_org_unit);

        Ok(OwnershipTransfer::Completed {
            old_org_unit: current,
            new_org_unit,
        })
    }

    async fn list_history(&self, key: OwnershipKey) -> AppResult<Vec<OwnershipHistoryEntry>> {
        Ok(self
            .state
            .lock()
            .await
            .history
            .iter()
            .filter(|entry| {
                entry.tracked_entity() == key.tracked_entity && entry.program() == key.program
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use sentra_application::{OwnershipKey, OwnershipRepository, OwnershipTransfer};
    use sentra_core::{AppError, OrgUnitId, ProgramId, TrackedEntityId, UserId};
    use sentra_domain::OwnershipRecord;

    use super::InMemoryOwnershipRepository;

    fn key() -> OwnershipKey {
        OwnershipKey {
            tracked_entity: TrackedEntityId::new(),
            program: ProgramId::new(),
        }
    }

    #[tokio::test]
    async fn assign_then_transfer_moves_owner_with_history() {
        let repository = InMemoryOwnershipRepository::new();
        let key = key();
        let first_unit = OrgUnitId::new();
        let second_unit = OrgUnitId::new();
        let actor = UserId::new();

        let assigned = repository
            .assign_ownership(OwnershipRecord::new(key.tracked_entity, key.program, first_unit))
            .await;
        assert!(assigned.is_ok());

        let outcome = repository
            .transfer_ownership(key, second_unit, actor)
            .await;
        assert!(outcome.is_ok_and(|value| matches!(
            value,
            OwnershipTransfer::Completed { old_org_unit, new_org_unit }
                if old_org_unit == first_unit && new_org_unit == second_unit
        )));

        let owner = repository.find_owner(key).await;
        assert!(owner.is_ok_and(|value| value == Some(second_unit)));

        let Ok(history) = repository.list_history(key).await else {
            panic!("history listing failed");
        };
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].actor(), actor);
    }

    #[tokio::test]
    async fn transfer_to_current_owner_writes_no_history() {
        let repository = InMemoryOwnershipRepository::new();
        let key = key();
        let unit = OrgUnitId::new();

        let assigned = repository
            .assign_ownership(OwnershipRecord::new(key.tracked_entity, key.program, unit))
            .await;
        assert!(assigned.is_ok());

        let outcome = repository.transfer_ownership(key, unit, UserId::new()).await;
        assert!(outcome.is_ok_and(|value| value == OwnershipTransfer::Unchanged));

        let Ok(history) = repository.list_history(key).await else {
            panic!("history listing failed");
        };
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn transfer_without_record_fails() {
        let repository = InMemoryOwnershipRepository::new();

        let outcome = repository
            .transfer_ownership(key(), OrgUnitId::new(), UserId::new())
            .await;
        assert!(matches!(outcome, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_assignment_conflicts() {
        let repository = InMemoryOwnershipRepository::new();
        let key = key();
        let unit = OrgUnitId::new();

        let assigned = repository
            .assign_ownership(OwnershipRecord::new(key.tracked_entity, key.program, unit))
            .await;
        assert!(assigned.is_ok());

        let duplicate = repository
            .assign_ownership(OwnershipRecord::new(
                key.tracked_entity,
                key.program,
                OrgUnitId::new(),
            ))
            .await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));

        let owner = repository.find_owner(key).await;
        assert!(owner.is_ok_and(|value| value == Some(unit)));
    }
}
