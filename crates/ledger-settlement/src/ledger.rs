use alloy_primitives::U256;
use ledger_core::types::Token;
use ledger_core::units::{decimal_to_u256, now_secs, u256_to_decimal};
use ledger_core::{LedgerError, Result};
use ledger_db::models::{NewTransaction, TransactionKind};
use ledger_db::repositories::{BalanceRepository, TransactionRepository};
use ledger_db::{DatabaseError, DatabasePool};
use metrics::counter;
use std::sync::Arc;
use tracing::info;

use crate::rake::BPS_DENOM;
use crate::retry::{with_conflict_retry, RetrySettings};

/// Context attached to the audit entry of a single mutation.
#[derive(Debug, Clone, Default)]
pub struct AuditNote {
    pub counterparty_id: Option<i64>,
    /// Atomic units; zero when no fee applies.
    pub fee: U256,
    pub tx_hash: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// What a completed tip settled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipReceipt {
    pub amount: U256,
    pub fee: U256,
    /// Amount the receiver was credited: `amount - fee`.
    pub net: U256,
}

/// The balance ledger.
///
/// Owns per-(user, token) cells. Every mutation is paired with its audit
/// entry inside one transaction: both commit or neither does. Operations
/// on the same cell serialize on the row lock; different cells proceed in
/// parallel.
pub struct Ledger {
    db: Arc<DatabasePool>,
    retry: RetrySettings,
}

impl Ledger {
    pub fn new(db: Arc<DatabasePool>, retry: RetrySettings) -> Self {
        Self { db, retry }
    }

    /// Increase a cell, creating it on first touch.
    pub async fn credit(
        &self,
        user_id: i64,
        token: &Token,
        amount: U256,
        kind: TransactionKind,
        note: AuditNote,
    ) -> Result<()> {
        require_positive(amount)?;
        let amount_dec = u256_to_decimal(amount);
        with_conflict_retry(&self.retry, || {
            let amount_dec = amount_dec.clone();
            let note = note.clone();
            async move {
                let mut tx = self.db.begin().await?;
                BalanceRepository::credit(&mut *tx, user_id, &token.id, &amount_dec).await?;
                TransactionRepository::insert(
                    &mut *tx,
                    &NewTransaction {
                        kind,
                        user_id,
                        counterparty_id: note.counterparty_id,
                        token_id: token.id.clone(),
                        amount: amount_dec.clone(),
                        fee: u256_to_decimal(note.fee),
                        tx_hash: note.tx_hash,
                        metadata: note.metadata,
                        created_at: now_secs(),
                    },
                )
                .await?;
                tx.commit().await.map_err(DatabaseError::from)?;
                Ok(())
            }
        })
        .await?;
        counter!("ledger_credits_total").increment(1);
        Ok(())
    }

    /// Decrease a cell. Fails with `InsufficientFunds` when the cell is
    /// missing or short; the sufficiency check runs under the same row
    /// lock as the mutation, so concurrent debits cannot interleave into a
    /// negative balance.
    pub async fn debit(
        &self,
        user_id: i64,
        token: &Token,
        amount: U256,
        kind: TransactionKind,
        note: AuditNote,
    ) -> Result<()> {
        require_positive(amount)?;
        let amount_dec = u256_to_decimal(amount);
        with_conflict_retry(&self.retry, || {
            let amount_dec = amount_dec.clone();
            let note = note.clone();
            async move {
                let mut tx = self.db.begin().await?;
                let debited =
                    BalanceRepository::debit(&mut *tx, user_id, &token.id, &amount_dec).await?;
                if !debited {
                    return Err(LedgerError::InsufficientFunds);
                }
                TransactionRepository::insert(
                    &mut *tx,
                    &NewTransaction {
                        kind,
                        user_id,
                        counterparty_id: note.counterparty_id,
                        token_id: token.id.clone(),
                        amount: amount_dec.clone(),
                        fee: u256_to_decimal(note.fee),
                        tx_hash: note.tx_hash,
                        metadata: note.metadata,
                        created_at: now_secs(),
                    },
                )
                .await?;
                tx.commit().await.map_err(DatabaseError::from)?;
                Ok(())
            }
        })
        .await?;
        counter!("ledger_debits_total").increment(1);
        Ok(())
    }

    /// Transfer between users, withholding a bps fee from the receiver.
    pub async fn tip(
        &self,
        from: i64,
        to: i64,
        token: &Token,
        amount: U256,
        tip_fee_bps: u64,
    ) -> Result<TipReceipt> {
        if from == to {
            return Err(LedgerError::InvalidAmount("cannot tip yourself".to_string()));
        }
        require_positive(amount)?;
        if tip_fee_bps > BPS_DENOM {
            return Err(LedgerError::InvalidAmount(format!(
                "fee rate out of range: {tip_fee_bps} bps"
            )));
        }
        let fee = amount
            .checked_mul(U256::from(tip_fee_bps))
            .ok_or(LedgerError::AmountOverflow)?
            / U256::from(BPS_DENOM);
        let net = amount - fee;

        let amount_dec = u256_to_decimal(amount);
        let net_dec = u256_to_decimal(net);
        let fee_dec = u256_to_decimal(fee);
        with_conflict_retry(&self.retry, || {
            let amount_dec = amount_dec.clone();
            let net_dec = net_dec.clone();
            let fee_dec = fee_dec.clone();
            async move {
                let now = now_secs();
                let mut tx = self.db.begin().await?;
                let debited =
                    BalanceRepository::debit(&mut *tx, from, &token.id, &amount_dec).await?;
                if !debited {
                    return Err(LedgerError::InsufficientFunds);
                }
                TransactionRepository::insert(
                    &mut *tx,
                    &NewTransaction {
                        kind: TransactionKind::Tip,
                        user_id: from,
                        counterparty_id: Some(to),
                        token_id: token.id.clone(),
                        amount: amount_dec.clone(),
                        fee: fee_dec.clone(),
                        tx_hash: None,
                        metadata: None,
                        created_at: now,
                    },
                )
                .await?;
                if !net.is_zero() {
                    BalanceRepository::credit(&mut *tx, to, &token.id, &net_dec).await?;
                    TransactionRepository::insert(
                        &mut *tx,
                        &NewTransaction {
                            kind: TransactionKind::Tip,
                            user_id: to,
                            counterparty_id: Some(from),
                            token_id: token.id.clone(),
                            amount: net_dec.clone(),
                            fee: u256_to_decimal(U256::ZERO),
                            tx_hash: None,
                            metadata: None,
                            created_at: now,
                        },
                    )
                    .await?;
                }
                tx.commit().await.map_err(DatabaseError::from)?;
                Ok(())
            }
        })
        .await?;
        counter!("ledger_tips_total").increment(1);
        info!(from, to, token = %token.id, amount = %amount, fee = %fee, "Tip settled");
        Ok(TipReceipt { amount, fee, net })
    }

    /// Idempotently create a zero cell so reads never observe "missing".
    pub async fn ensure_cell(&self, user_id: i64, token: &Token) -> Result<()> {
        BalanceRepository::ensure_cell(self.db.inner(), user_id, &token.id).await?;
        Ok(())
    }

    /// Fresh balance read in atomic units. A missing cell reads as zero.
    pub async fn get_balance(&self, user_id: i64, token: &Token) -> Result<U256> {
        match BalanceRepository::get(self.db.inner(), user_id, &token.id).await? {
            Some(row) => decimal_to_u256(&row.amount),
            None => Ok(U256::ZERO),
        }
    }

    /// All cells for a user as (token id, atomic amount).
    pub async fn balances_for_user(&self, user_id: i64) -> Result<Vec<(String, U256)>> {
        let rows = BalanceRepository::get_for_user(self.db.inner(), user_id).await?;
        rows.into_iter()
            .map(|row| Ok((row.token_id, decimal_to_u256(&row.amount)?)))
            .collect()
    }
}

fn require_positive(amount: U256) -> Result<()> {
    if amount.is_zero() {
        return Err(LedgerError::InvalidAmount("amount must be positive".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amounts_are_rejected_before_any_io() {
        assert!(matches!(
            require_positive(U256::ZERO),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(require_positive(U256::from(1u8)).is_ok());
    }
}
