use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Kind of balance-affecting event in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Tip,
    MatchWager,
    MatchPayout,
    MatchRake,
    TierPurchase,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
            TransactionKind::Tip => "tip",
            TransactionKind::MatchWager => "match_wager",
            TransactionKind::MatchPayout => "match_payout",
            TransactionKind::MatchRake => "match_rake",
            TransactionKind::TierPurchase => "tier_purchase",
        }
    }
}

/// Database model for the transactions table.
///
/// Append-only: the sole source of historical truth. Rows are never
/// updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbTransaction {
    pub id: i64,
    pub kind: TransactionKind,
    /// Primary user for the entry
    pub user_id: i64,
    /// Other party for tips and match entries
    pub counterparty_id: Option<i64>,
    pub token_id: String,
    /// Atomic units
    pub amount: BigDecimal,
    /// Atomic units; zero when no fee applies
    pub fee: BigDecimal,
    /// On-chain hash for deposits/withdrawals
    pub tx_hash: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: i64,
}

/// A new audit entry; the id is assigned by the store on insert
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub user_id: i64,
    pub counterparty_id: Option<i64>,
    pub token_id: String,
    pub amount: BigDecimal,
    pub fee: BigDecimal,
    pub tx_hash: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(TransactionKind::MatchWager.as_str(), "match_wager");
        assert_eq!(TransactionKind::TierPurchase.as_str(), "tier_purchase");
    }
}
