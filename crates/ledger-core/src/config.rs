use alloy_primitives::Address;
use bigdecimal::BigDecimal;
use std::env;

use crate::error::{LedgerError, Result};
use crate::units::parse_address;

/// Live bot configuration, persisted as a single row and cached with a
/// seconds-scale TTL. Amount fields are human-decimal units; fee rates are
/// basis points out of 10000.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub min_deposit: BigDecimal,
    pub min_withdraw: BigDecimal,
    pub withdraw_max_per_tx: BigDecimal,
    pub withdraw_daily_cap: BigDecimal,
    pub house_fee_bps: u64,
    pub tip_fee_bps: u64,
}

impl Default for BotConfig {
    /// Hard-coded fallback used when no config row has been persisted yet.
    fn default() -> Self {
        Self {
            min_deposit: BigDecimal::from(1u32),
            min_withdraw: BigDecimal::from(1u32),
            withdraw_max_per_tx: BigDecimal::from(10_000u32),
            withdraw_daily_cap: BigDecimal::from(25_000u32),
            house_fee_bps: 200,
            tip_fee_bps: 100,
        }
    }
}

/// Process-level settings from environment variables.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Treasury address deposits must be sent to.
    pub treasury_address: Address,
    /// TTL for the cached bot_config row.
    pub config_cache_ttl_secs: u64,
    /// TTL for the cached token registry.
    pub token_cache_ttl_secs: u64,
    /// Bounded retries for settlement write conflicts.
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self> {
        let treasury = env::var("TREASURY_ADDRESS")
            .map_err(|_| LedgerError::MissingEnvVar("TREASURY_ADDRESS".to_string()))?;
        let treasury_address = parse_address(&treasury)?;

        let config_cache_ttl_secs = env::var("CONFIG_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let token_cache_ttl_secs = env::var("TOKEN_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let retry_attempts = env::var("SETTLE_RETRY_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3);

        let retry_delay_ms = env::var("SETTLE_RETRY_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(50);

        Ok(Self {
            treasury_address,
            config_cache_ttl_secs,
            token_cache_ttl_secs,
            retry_attempts,
            retry_delay_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_config_is_sane() {
        let cfg = BotConfig::default();
        assert!(cfg.house_fee_bps <= 10_000);
        assert!(cfg.tip_fee_bps <= 10_000);
        assert!(cfg.min_withdraw <= cfg.withdraw_max_per_tx);
        assert!(cfg.withdraw_max_per_tx <= cfg.withdraw_daily_cap);
    }
}
