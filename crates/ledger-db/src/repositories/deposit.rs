use crate::models::DbProcessedDeposit;
use crate::Result;
use sqlx::{PgExecutor, PgPool};

pub struct ProcessedDepositRepository;

impl ProcessedDepositRepository {
    /// Atomic create that reports distinctly whether the key was new.
    /// Returns false when the idempotency key already exists.
    pub async fn try_claim<'e>(
        executor: impl PgExecutor<'e>,
        deposit: &DbProcessedDeposit,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO processed_deposits (id, tx_hash, sender, amount_atomic, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&deposit.id)
        .bind(&deposit.tx_hash)
        .bind(&deposit.sender)
        .bind(&deposit.amount_atomic)
        .bind(deposit.created_at)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check whether a key has been claimed
    pub async fn exists(pool: &PgPool, id: &str) -> Result<bool> {
        let result: Option<(String,)> =
            sqlx::query_as("SELECT id FROM processed_deposits WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(result.is_some())
    }

    /// Count processed deposits
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM processed_deposits")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
