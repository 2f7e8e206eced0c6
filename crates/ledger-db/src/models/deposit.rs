use alloy_primitives::{Address, U256};
use bigdecimal::BigDecimal;
use ledger_core::types::deposit_key;
use ledger_core::units::{address_key, u256_to_decimal};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the processed_deposits table.
///
/// Write-once: the row's existence is the idempotency marker. Never
/// updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbProcessedDeposit {
    /// Composite idempotency key: txHash_sender_amount, lowercase
    pub id: String,
    pub tx_hash: String,
    pub sender: String,
    /// Atomic units, NUMERIC(78,0)
    pub amount_atomic: BigDecimal,
    pub created_at: i64,
}

impl DbProcessedDeposit {
    pub fn new(tx_hash: &str, sender: Address, amount: U256, now: i64) -> Self {
        Self {
            id: deposit_key(tx_hash, sender, amount),
            tx_hash: tx_hash.trim().to_ascii_lowercase(),
            sender: address_key(sender),
            amount_atomic: u256_to_decimal(amount),
            created_at: now,
        }
    }
}
