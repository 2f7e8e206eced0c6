use alloy_primitives::{Address, U256};
use ledger_core::types::Token;
use ledger_core::units::{address_key, now_secs, to_atomic, to_human, u256_to_decimal};
use ledger_core::{LedgerError, Result};
use ledger_db::models::{NewTransaction, TransactionKind};
use ledger_db::repositories::{BalanceRepository, TransactionRepository};
use ledger_db::{DatabaseError, DatabasePool};
use metrics::counter;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::config_cache::ConfigCache;
use crate::retry::{with_conflict_retry, RetrySettings};

/// A debited, audited withdrawal request. The on-chain send is an external
/// concern keyed to the audit id.
#[derive(Debug, Clone, Copy)]
pub struct WithdrawalReceipt {
    pub audit_id: i64,
    pub amount_atomic: U256,
}

/// Validates withdrawal limits from live config and debits the balance.
pub struct WithdrawalService {
    db: Arc<DatabasePool>,
    config: Arc<ConfigCache>,
    retry: RetrySettings,
}

impl WithdrawalService {
    pub fn new(db: Arc<DatabasePool>, config: Arc<ConfigCache>, retry: RetrySettings) -> Self {
        Self { db, config, retry }
    }

    pub async fn request(
        &self,
        user_id: i64,
        token: &Token,
        amount_atomic: U256,
        destination: Address,
    ) -> Result<WithdrawalReceipt> {
        if amount_atomic.is_zero() {
            return Err(LedgerError::InvalidAmount("amount must be positive".to_string()));
        }

        let config = self.config.get(false).await?;
        let human = to_human(amount_atomic, token.decimals);
        if human < config.min_withdraw {
            return Err(LedgerError::WithdrawBelowMinimum);
        }
        if human > config.withdraw_max_per_tx {
            return Err(LedgerError::WithdrawOverMax);
        }

        // rolling 24h window over the audit log
        let since = now_secs() - 86_400;
        let already =
            TransactionRepository::sum_withdrawn_since(self.db.inner(), user_id, &token.id, since)
                .await?;
        let cap_atomic = to_atomic(&config.withdraw_daily_cap, token.decimals)?;
        if already + u256_to_decimal(amount_atomic) > u256_to_decimal(cap_atomic) {
            return Err(LedgerError::WithdrawDailyCapExceeded);
        }

        let amount_dec = u256_to_decimal(amount_atomic);
        let dest_key = address_key(destination);
        let audit_id = with_conflict_retry(&self.retry, || {
            let amount_dec = amount_dec.clone();
            let dest_key = dest_key.clone();
            async move {
                let mut tx = self.db.begin().await?;
                let debited =
                    BalanceRepository::debit(&mut *tx, user_id, &token.id, &amount_dec).await?;
                if !debited {
                    return Err(LedgerError::InsufficientFunds);
                }
                let audit_id = TransactionRepository::insert(
                    &mut *tx,
                    &NewTransaction {
                        kind: TransactionKind::Withdraw,
                        user_id,
                        counterparty_id: None,
                        token_id: token.id.clone(),
                        amount: amount_dec.clone(),
                        fee: u256_to_decimal(U256::ZERO),
                        tx_hash: None,
                        metadata: Some(json!({ "destination": dest_key })),
                        created_at: now_secs(),
                    },
                )
                .await?;
                tx.commit().await.map_err(DatabaseError::from)?;
                Ok(audit_id)
            }
        })
        .await?;

        counter!("ledger_withdrawals_total").increment(1);
        info!(
            user_id,
            token = %token.id,
            amount = %amount_atomic,
            destination = %dest_key,
            audit_id,
            "Withdrawal debited"
        );
        Ok(WithdrawalReceipt {
            audit_id,
            amount_atomic,
        })
    }
}
