use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the tokens table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbToken {
    /// Short identifier used in commands and balance keys
    pub id: String,
    /// Contract address, stored lowercase
    pub address: String,
    pub symbol: String,
    pub decimals: i16,
    /// Minimum deposit in human-decimal units; NULL falls back to config
    pub min_deposit: Option<BigDecimal>,
    pub active: bool,
    pub created_at: i64,
}
