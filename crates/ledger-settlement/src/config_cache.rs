use ledger_core::{BotConfig, Result};
use ledger_db::repositories::BotConfigRepository;
use ledger_db::DatabasePool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

struct CachedConfig {
    loaded_at: Instant,
    config: BotConfig,
}

impl CachedConfig {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() < ttl
    }
}

/// Seconds-TTL cache over the single bot_config row.
///
/// Falls back to hard-coded defaults when no row has been persisted.
/// Never consulted for balance-sufficiency checks.
pub struct ConfigCache {
    db: Arc<DatabasePool>,
    ttl: Duration,
    cached: RwLock<Option<CachedConfig>>,
}

impl ConfigCache {
    pub fn new(db: Arc<DatabasePool>, ttl: Duration) -> Self {
        Self {
            db,
            ttl,
            cached: RwLock::new(None),
        }
    }

    /// Current config. `force` bypasses the cache.
    pub async fn get(&self, force: bool) -> Result<BotConfig> {
        if !force {
            let cached = self.cached.read().await;
            if let Some(entry) = cached.as_ref() {
                if entry.is_fresh(self.ttl) {
                    return Ok(entry.config.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;
        if !force {
            if let Some(entry) = cached.as_ref() {
                if entry.is_fresh(self.ttl) {
                    return Ok(entry.config.clone());
                }
            }
        }

        let config = match BotConfigRepository::get(self.db.inner()).await? {
            Some(row) => row.into(),
            None => {
                debug!("No persisted bot config, using defaults");
                BotConfig::default()
            }
        };
        *cached = Some(CachedConfig {
            loaded_at: Instant::now(),
            config: config.clone(),
        });
        Ok(config)
    }

    /// Drop the cached row; the next read reloads.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freshness_follows_the_ttl() {
        let entry = CachedConfig {
            loaded_at: Instant::now(),
            config: BotConfig::default(),
        };
        assert!(entry.is_fresh(Duration::from_secs(10)));
        assert!(!entry.is_fresh(Duration::ZERO));

        let stale = CachedConfig {
            loaded_at: Instant::now() - Duration::from_secs(30),
            config: BotConfig::default(),
        };
        assert!(!stale.is_fresh(Duration::from_secs(10)));
        assert!(stale.is_fresh(Duration::from_secs(60)));
    }
}
