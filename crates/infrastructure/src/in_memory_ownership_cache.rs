use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sentra_application::{OwnershipCache, OwnershipKey};
use sentra_core::{AppResult, OrgUnitId};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy)]
struct OwnerCacheEntry {
    org_unit: OrgUnitId,
    expires_at: Instant,
}

/// In-memory read-through cache for resolved owners.
#[derive(Default)]
pub struct InMemoryOwnershipCache {
    entries: RwLock<HashMap<OwnershipKey, OwnerCacheEntry>>,
}

impl InMemoryOwnershipCache {
    /// Creates an empty owner cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OwnershipCache for InMemoryOwnershipCache {
    async fn get_owner(&self, key: OwnershipKey) -> AppResult<Option<OrgUnitId>> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                if entry.expires_at > Instant::now() {
                    return Ok(Some(entry.org_unit));
                }
            } else {
                return Ok(None);
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(&key)
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            entries.remove(&key);
        }

        Ok(None)
    }

    async fn put_owner(
        &self,
        key: OwnershipKey,
        org_unit: OrgUnitId,
        ttl_seconds: u32,
    ) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(u64::from(ttl_seconds)))
            .unwrap_or(now);

        self.entries
            .write()
            .await
            .insert(key, OwnerCacheEntry { org_unit, expires_at });

        Ok(())
    }

    async fn invalidate_owner(&self, key: OwnershipKey) -> AppResult<()> {
        self.entries.write().await.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sentra_application::{OwnershipCache, OwnershipKey};
    use sentra_core::{OrgUnitId, ProgramId, TrackedEntityId};

    use super::InMemoryOwnershipCache;

    fn key() -> OwnershipKey {
        OwnershipKey {
            tracked_entity: TrackedEntityId::new(),
            program: ProgramId::new(),
        }
    }

    #[tokio::test]
    async fn put_then_get_returns_owner() {
        let cache = InMemoryOwnershipCache::new();
        let key = key();
        let org_unit = OrgUnitId::new();

        let put = cache.put_owner(key, org_unit, 300).await;
        assert!(put.is_ok());

        let cached = cache.get_owner(key).await;
        assert!(cached.is_ok_and(|value| value == Some(org_unit)));
    }

    #[tokio::test]
    async fn zero_ttl_disables_caching() {
        let cache = InMemoryOwnershipCache::new();
        let key = key();

        let put = cache.put_owner(key, OrgUnitId::new(), 0).await;
        assert!(put.is_ok());

        let cached = cache.get_owner(key).await;
        assert!(cached.is_ok_and(|value| value.is_none()));
    }

    #[tokio::test]
    async fn invalidate_evicts_entry() {
        let cache = InMemoryOwnershipCache::new();
        let key = key();

        let put = cache.put_owner(key, OrgUnitId::new(), 300).await;
        assert!(put.is_ok());
        let invalidated = cache.invalidate_owner(key).await;
        assert!(invalidated.is_ok());

        let cached = cache.get_owner(key).await;
        assert!(cached.is_ok_and(|value| value.is_none()));
    }
}
