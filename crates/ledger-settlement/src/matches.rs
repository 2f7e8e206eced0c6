use alloy_primitives::U256;
use ledger_core::types::Token;
use ledger_core::units::{now_secs, u256_to_decimal};
use ledger_core::{LedgerError, Result};
use ledger_db::models::{NewTransaction, TransactionKind};
use ledger_db::repositories::{BalanceRepository, TransactionRepository};
use ledger_db::{DatabaseError, DatabasePool};
use metrics::counter;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::config_cache::ConfigCache;
use crate::rake::calc_payout;
use crate::retry::{with_conflict_retry, RetrySettings};

/// What a settled match paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchReceipt {
    pub winner_id: i64,
    pub loser_id: i64,
    pub wager: U256,
    pub pot: U256,
    pub rake: U256,
    pub payout: U256,
}

/// Settles a symmetric 1v1 wager: both players pay in, the winner takes
/// the pot net of the house rake. All mutations and audit entries commit
/// in one transaction.
pub struct MatchSettlement {
    db: Arc<DatabasePool>,
    config: Arc<ConfigCache>,
    retry: RetrySettings,
}

impl MatchSettlement {
    pub fn new(db: Arc<DatabasePool>, config: Arc<ConfigCache>, retry: RetrySettings) -> Self {
        Self { db, config, retry }
    }

    pub async fn settle(
        &self,
        winner_id: i64,
        loser_id: i64,
        token: &Token,
        wager_atomic: U256,
    ) -> Result<MatchReceipt> {
        if winner_id == loser_id {
            return Err(LedgerError::InvalidWager(
                "a match needs two distinct players".to_string(),
            ));
        }
        if wager_atomic.is_zero() {
            return Err(LedgerError::InvalidWager("zero wager".to_string()));
        }

        let config = self.config.get(false).await?;
        let split = calc_payout(wager_atomic, config.house_fee_bps)?;
        let wager_dec = u256_to_decimal(wager_atomic);

        with_conflict_retry(&self.retry, || {
            let wager_dec = wager_dec.clone();
            async move {
                let now = now_secs();
                let mut tx = self.db.begin().await?;

                // lock cells in user-id order so concurrent settlements
                // involving the same players cannot deadlock
                let (first, second) = if winner_id < loser_id {
                    (winner_id, loser_id)
                } else {
                    (loser_id, winner_id)
                };
                for player in [first, second] {
                    let debited =
                        BalanceRepository::debit(&mut *tx, player, &token.id, &wager_dec).await?;
                    if !debited {
                        return Err(LedgerError::InsufficientFunds);
                    }
                }

                BalanceRepository::credit(
                    &mut *tx,
                    winner_id,
                    &token.id,
                    &u256_to_decimal(split.payout),
                )
                .await?;

                for (player, opponent) in [(winner_id, loser_id), (loser_id, winner_id)] {
                    TransactionRepository::insert(
                        &mut *tx,
                        &NewTransaction {
                            kind: TransactionKind::MatchWager,
                            user_id: player,
                            counterparty_id: Some(opponent),
                            token_id: token.id.clone(),
                            amount: wager_dec.clone(),
                            fee: u256_to_decimal(U256::ZERO),
                            tx_hash: None,
                            metadata: None,
                            created_at: now,
                        },
                    )
                    .await?;
                }

                TransactionRepository::insert(
                    &mut *tx,
                    &NewTransaction {
                        kind: TransactionKind::MatchPayout,
                        user_id: winner_id,
                        counterparty_id: Some(loser_id),
                        token_id: token.id.clone(),
                        amount: u256_to_decimal(split.payout),
                        fee: u256_to_decimal(split.rake),
                        tx_hash: None,
                        metadata: None,
                        created_at: now,
                    },
                )
                .await?;

                if !split.rake.is_zero() {
                    TransactionRepository::insert(
                        &mut *tx,
                        &NewTransaction {
                            kind: TransactionKind::MatchRake,
                            user_id: winner_id,
                            counterparty_id: Some(loser_id),
                            token_id: token.id.clone(),
                            amount: u256_to_decimal(split.rake),
                            fee: u256_to_decimal(U256::ZERO),
                            tx_hash: None,
                            metadata: Some(json!({ "house": true })),
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

        counter!("ledger_matches_settled_total").increment(1);
        info!(
            winner_id,
            loser_id,
            token = %token.id,
            wager = %wager_atomic,
            rake = %split.rake,
            "Match settled"
        );
        Ok(MatchReceipt {
            winner_id,
            loser_id,
            wager: wager_atomic,
            pot: split.pot,
            rake: split.rake,
            payout: split.payout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_carries_the_split() {
        let split = calc_payout(U256::from(100u64), 200).unwrap();
        let receipt = MatchReceipt {
            winner_id: 1,
            loser_id: 2,
            wager: U256::from(100u64),
            pot: split.pot,
            rake: split.rake,
            payout: split.payout,
        };
        assert_eq!(receipt.pot, U256::from(200u64));
        assert_eq!(receipt.payout + receipt.rake, receipt.pot);
    }
}
