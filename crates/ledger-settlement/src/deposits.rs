use alloy_primitives::{Address, U256};
use ledger_core::types::{DepositEvent, DepositOutcome};
use ledger_core::units::{
    address_key, now_secs, parse_address, parse_atomic, to_human, u256_to_decimal,
};
use ledger_core::{LedgerError, Result};
use ledger_db::models::{DbProcessedDeposit, NewTransaction, TransactionKind};
use ledger_db::repositories::{
    BalanceRepository, ProcessedDepositRepository, TransactionRepository, WalletRepository,
};
use ledger_db::{DatabaseError, DatabasePool};
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config_cache::ConfigCache;
use crate::registry::TokenRegistry;

/// Applies validated on-chain transfer events to the ledger, exactly once.
pub struct DepositProcessor {
    db: Arc<DatabasePool>,
    registry: Arc<TokenRegistry>,
    config: Arc<ConfigCache>,
    treasury: Address,
}

impl DepositProcessor {
    pub fn new(
        db: Arc<DatabasePool>,
        registry: Arc<TokenRegistry>,
        config: Arc<ConfigCache>,
        treasury: Address,
    ) -> Self {
        Self {
            db,
            registry,
            config,
            treasury,
        }
    }

    /// Apply one transfer event. Replays of the same (txHash, sender,
    /// amount) are no-ops reported as `Duplicate`.
    pub async fn apply_deposit(&self, event: &DepositEvent) -> Result<DepositOutcome> {
        let outcome = self.process(event).await?;
        counter!("ledger_deposits_total", "outcome" => outcome.label()).increment(1);
        info!(
            tx_hash = %event.tx_hash,
            outcome = outcome.label(),
            "Deposit processed"
        );
        Ok(outcome)
    }

    async fn process(&self, event: &DepositEvent) -> Result<DepositOutcome> {
        let to = parse_address(&event.to)?;
        if to != self.treasury {
            return Ok(DepositOutcome::WrongTreasury);
        }

        let from = parse_address(&event.from)?;
        let amount = parse_atomic(&event.value_atomic)?;

        let token = match self.registry.resolve(&event.token_address, true).await {
            Ok(token) => token,
            Err(LedgerError::TokenNotFound(_)) | Err(LedgerError::TokenInactive(_)) => {
                return Ok(DepositOutcome::TokenUnknownOrInactive);
            }
            Err(err) => return Err(err),
        };

        // Claim the idempotency key before anything touches a balance. A
        // replayed event short-circuits here, so a crash between the claim
        // and the credit can drop a credit (caught by reconciliation) but
        // can never double-credit.
        let row = DbProcessedDeposit::new(&event.tx_hash, from, amount, now_secs());
        let claimed = ProcessedDepositRepository::try_claim(self.db.inner(), &row).await?;
        if !claimed {
            debug!(key = %row.id, "Deposit key already claimed");
            return Ok(DepositOutcome::Duplicate);
        }

        // Policy checks run after the claim: a skipped deposit stays
        // claimed and is never retried.
        let human = to_human(amount, token.decimals);
        let config = self.config.get(false).await?;
        let minimum = token.min_deposit_or(&config.min_deposit);
        if human < minimum {
            warn!(
                tx_hash = %event.tx_hash,
                amount = %human,
                minimum = %minimum,
                token = %token.id,
                "Deposit below minimum, skipped"
            );
            return Ok(DepositOutcome::BelowMinimum);
        }

        let sender_key = address_key(from);
        let Some(user_id) =
            WalletRepository::find_user_by_address(self.db.inner(), &sender_key).await?
        else {
            warn!(
                tx_hash = %event.tx_hash,
                sender = %sender_key,
                "Deposit from unlinked wallet, skipped"
            );
            return Ok(DepositOutcome::WalletNotLinked);
        };

        // Credit and audit commit together.
        let amount_dec = u256_to_decimal(amount);
        let mut tx = self.db.begin().await?;
        BalanceRepository::credit(&mut *tx, user_id, &token.id, &amount_dec).await?;
        TransactionRepository::insert(
            &mut *tx,
            &NewTransaction {
                kind: TransactionKind::Deposit,
                user_id,
                counterparty_id: None,
                token_id: token.id.clone(),
                amount: amount_dec,
                fee: u256_to_decimal(U256::ZERO),
                tx_hash: Some(event.tx_hash.trim().to_ascii_lowercase()),
                metadata: None,
                created_at: now_secs(),
            },
        )
        .await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        Ok(DepositOutcome::Credited {
            user_id,
            amount_atomic: amount,
        })
    }
}
