use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the balances table.
///
/// One row per (user, token), created lazily on first touch. The amount is
/// atomic units and is kept non-negative by a CHECK constraint plus the
/// guarded debit statement.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbBalance {
    pub user_id: i64,
    pub token_id: String,
    /// Atomic units, NUMERIC(78,0)
    pub amount: BigDecimal,
}
