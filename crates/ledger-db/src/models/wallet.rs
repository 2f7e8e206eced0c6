use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the wallets table: links a chain address to a user
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbWallet {
    /// Chain address, stored lowercase (primary key)
    pub address: String,
    /// Discord user identifier
    pub user_id: i64,
    pub created_at: i64,
}
