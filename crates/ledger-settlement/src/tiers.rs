use bigdecimal::BigDecimal;
use ledger_core::units::{now_secs, to_atomic, u256_to_decimal};
use ledger_core::{LedgerError, Result};
use ledger_db::models::{DbTierMembership, NewTransaction, TransactionKind};
use ledger_db::repositories::{BalanceRepository, TierRepository, TransactionRepository};
use ledger_db::{DatabaseError, DatabasePool};
use metrics::counter;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::registry::TokenRegistry;
use crate::retry::{with_conflict_retry, RetrySettings};

/// Settles tier purchases: debit, audit entry and membership transition
/// as one atomic unit.
pub struct TierSettlement {
    db: Arc<DatabasePool>,
    registry: Arc<TokenRegistry>,
    retry: RetrySettings,
}

impl TierSettlement {
    pub fn new(db: Arc<DatabasePool>, registry: Arc<TokenRegistry>, retry: RetrySettings) -> Self {
        Self {
            db,
            registry,
            retry,
        }
    }

    /// Purchase a tier at its current price. Either all of {debit, audit
    /// entry, old membership expired, new membership created} commit, or
    /// none do.
    pub async fn purchase_tier(&self, user_id: i64, tier_id: &str) -> Result<DbTierMembership> {
        let tier = TierRepository::get(self.db.inner(), tier_id)
            .await?
            .filter(|t| t.active)
            .ok_or_else(|| LedgerError::TierUnavailable(tier_id.to_string()))?;

        // latest price row wins; no active flag on prices
        let price_row = TierRepository::latest_price(self.db.inner(), tier_id)
            .await?
            .ok_or_else(|| LedgerError::NoPriceConfigured(tier_id.to_string()))?;

        let token = self.registry.resolve(&price_row.token_id, true).await?;
        let price_atomic = to_atomic(&price_row.price, token.decimals)?;
        if price_atomic.is_zero() {
            return Err(LedgerError::InvalidAmount(format!(
                "tier {tier_id} has a zero price"
            )));
        }
        let price_dec = u256_to_decimal(price_atomic);

        let membership = with_conflict_retry(&self.retry, || {
            let tier = tier.clone();
            let token_id = token.id.clone();
            let price_dec = price_dec.clone();
            async move {
                let now = now_secs();
                let mut tx = self.db.begin().await?;

                let debited =
                    BalanceRepository::debit(&mut *tx, user_id, &token_id, &price_dec).await?;
                if !debited {
                    return Err(LedgerError::InsufficientFunds);
                }

                TransactionRepository::insert(
                    &mut *tx,
                    &NewTransaction {
                        kind: TransactionKind::TierPurchase,
                        user_id,
                        counterparty_id: None,
                        token_id: token_id.clone(),
                        amount: price_dec.clone(),
                        fee: BigDecimal::from(0),
                        tx_hash: None,
                        metadata: Some(json!({
                            "tier": tier.id,
                            "duration_days": tier.duration_days,
                        })),
                        created_at: now,
                    },
                )
                .await?;

                let expired = TierRepository::expire_active(&mut *tx, user_id, &tier.id, now).await?;
                if expired > 0 {
                    debug!(user_id, tier = %tier.id, "Expiring previous membership");
                }

                let expires_at = now + i64::from(tier.duration_days) * 86_400;
                let membership =
                    TierRepository::insert_membership(&mut *tx, user_id, &tier.id, now, expires_at)
                        .await?;

                tx.commit().await.map_err(DatabaseError::from)?;
                Ok(membership)
            }
        })
        .await?;

        counter!("ledger_tier_purchases_total").increment(1);
        info!(
            user_id,
            tier = tier_id,
            token = %token.id,
            price = %price_row.price,
            expires_at = membership.expires_at,
            "Tier purchased"
        );
        Ok(membership)
    }
}
