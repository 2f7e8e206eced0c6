use crate::models::DbBotConfig;
use crate::Result;
use ledger_core::BotConfig;
use sqlx::PgPool;

pub struct BotConfigRepository;

impl BotConfigRepository {
    /// Fetch the single config row, if one has been persisted
    pub async fn get(pool: &PgPool) -> Result<Option<DbBotConfig>> {
        let result =
            sqlx::query_as::<_, DbBotConfig>("SELECT * FROM bot_config WHERE id = 'main'")
                .fetch_optional(pool)
                .await?;
        Ok(result)
    }

    /// Persist the config row (admin)
    pub async fn upsert(pool: &PgPool, config: &BotConfig, now: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bot_config
                (id, min_deposit, min_withdraw, withdraw_max_per_tx, withdraw_daily_cap,
                 house_fee_bps, tip_fee_bps, updated_at)
            VALUES ('main', $1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                min_deposit = EXCLUDED.min_deposit,
                min_withdraw = EXCLUDED.min_withdraw,
                withdraw_max_per_tx = EXCLUDED.withdraw_max_per_tx,
                withdraw_daily_cap = EXCLUDED.withdraw_daily_cap,
                house_fee_bps = EXCLUDED.house_fee_bps,
                tip_fee_bps = EXCLUDED.tip_fee_bps,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&config.min_deposit)
        .bind(&config.min_withdraw)
        .bind(&config.withdraw_max_per_tx)
        .bind(&config.withdraw_daily_cap)
        .bind(config.house_fee_bps as i64)
        .bind(config.tip_fee_bps as i64)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(())
    }
}
