use bigdecimal::BigDecimal;
use ledger_core::BotConfig;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the single-row bot_config table (id = 'main')
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbBotConfig {
    pub id: String,
    pub min_deposit: BigDecimal,
    pub min_withdraw: BigDecimal,
    pub withdraw_max_per_tx: BigDecimal,
    pub withdraw_daily_cap: BigDecimal,
    pub house_fee_bps: i64,
    pub tip_fee_bps: i64,
    pub updated_at: i64,
}

impl From<DbBotConfig> for BotConfig {
    fn from(row: DbBotConfig) -> Self {
        BotConfig {
            min_deposit: row.min_deposit,
            min_withdraw: row.min_withdraw,
            withdraw_max_per_tx: row.withdraw_max_per_tx,
            withdraw_daily_cap: row.withdraw_daily_cap,
            house_fee_bps: row.house_fee_bps.max(0) as u64,
            tip_fee_bps: row.tip_fee_bps.max(0) as u64,
        }
    }
}
