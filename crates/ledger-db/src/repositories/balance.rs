use crate::models::DbBalance;
use crate::Result;
use bigdecimal::BigDecimal;
use sqlx::{PgExecutor, PgPool};

pub struct BalanceRepository;

impl BalanceRepository {
    /// Idempotently create a zero-balance cell
    pub async fn ensure_cell<'e>(
        executor: impl PgExecutor<'e>,
        user_id: i64,
        token_id: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO balances (user_id, token_id, amount)
            VALUES ($1, $2, 0)
            ON CONFLICT (user_id, token_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(token_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Atomic upsert-add; creates the cell on first touch
    pub async fn credit<'e>(
        executor: impl PgExecutor<'e>,
        user_id: i64,
        token_id: &str,
        amount: &BigDecimal,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO balances (user_id, token_id, amount)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, token_id) DO UPDATE SET
                amount = balances.amount + EXCLUDED.amount
            "#,
        )
        .bind(user_id)
        .bind(token_id)
        .bind(amount)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Guarded debit. The predicate re-checks sufficiency under the row
    /// lock; zero rows affected means the cell is missing or short.
    pub async fn debit<'e>(
        executor: impl PgExecutor<'e>,
        user_id: i64,
        token_id: &str,
        amount: &BigDecimal,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE balances
            SET amount = amount - $3
            WHERE user_id = $1 AND token_id = $2 AND amount >= $3
            "#,
        )
        .bind(user_id)
        .bind(token_id)
        .bind(amount)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get balance cell for user and token
    pub async fn get(pool: &PgPool, user_id: i64, token_id: &str) -> Result<Option<DbBalance>> {
        let result = sqlx::query_as::<_, DbBalance>(
            "SELECT * FROM balances WHERE user_id = $1 AND token_id = $2",
        )
        .bind(user_id)
        .bind(token_id)
        .fetch_optional(pool)
        .await?;
        Ok(result)
    }

    /// Get all balance cells for a user
    pub async fn get_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<DbBalance>> {
        let results = sqlx::query_as::<_, DbBalance>(
            "SELECT * FROM balances WHERE user_id = $1 ORDER BY token_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(results)
    }

    /// Count balance cells
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM balances")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
