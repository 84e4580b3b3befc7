use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sentra_application::{GrantKey, TemporaryGrantCache};
use sentra_core::AppResult;
use sentra_domain::TemporaryGrant;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct GrantCacheEntry {
    grant: TemporaryGrant,
    expires_at: Instant,
}

/// In-memory TTL cache for active temporary grants.
///
/// Process-local by design: the entry TTL equals the grant TTL, so the cache
/// is authoritative for access checks while the process lives, and an empty
/// cache after a restart reads as "no valid grant" until a new grant is
/// requested.
#[derive(Default)]
pub struct InMemoryTemporaryGrantCache {
    entries: RwLock<HashMap<GrantKey, GrantCacheEntry>>,
}

impl InMemoryTemporaryGrantCache {
    /// Creates an empty grant cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemporaryGrantCache for InMemoryTemporaryGrantCache {
    async fn get_grant(&self, key: GrantKey) -> AppResult<Option<TemporaryGrant>> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                if entry.expires_at > Instant::now() {
                    return Ok(Some(entry.grant.clone()));
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

    async fn put_grant(&self, grant: TemporaryGrant, ttl_seconds: u32) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let key = GrantKey {
            tracked_entity: grant.tracked_entity(),
            program: grant.program(),
            user: grant.user(),
        };
        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(u64::from(ttl_seconds)))
            .unwrap_or(now);

        self.entries
            .write()
            .await
            .insert(key, GrantCacheEntry { grant, expires_at });

        Ok(())
    }

    async fn invalidate_grant(&self, key: GrantKey) -> AppResult<()> {
        self.entries.write().await.remove(&key);
        Ok(())
    }
}
