use crate::models::{DbTransaction, NewTransaction, TransactionKind};
use crate::Result;
use bigdecimal::BigDecimal;
use sqlx::{PgExecutor, PgPool};

/// Access to the append-only audit log. There are deliberately no update
/// or delete statements here.
pub struct TransactionRepository;

impl TransactionRepository {
    /// Append one audit entry, returning its id
    pub async fn insert<'e>(executor: impl PgExecutor<'e>, tx: &NewTransaction) -> Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO transactions
                (kind, user_id, counterparty_id, token_id, amount, fee, tx_hash, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(tx.kind)
        .bind(tx.user_id)
        .bind(tx.counterparty_id)
        .bind(&tx.token_id)
        .bind(&tx.amount)
        .bind(&tx.fee)
        .bind(&tx.tx_hash)
        .bind(&tx.metadata)
        .bind(tx.created_at)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    /// Newest-first page of the audit log, for reconciliation exports
    pub async fn list_recent(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<DbTransaction>> {
        let results = sqlx::query_as::<_, DbTransaction>(
            "SELECT * FROM transactions ORDER BY id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        Ok(results)
    }

    /// Newest-first entries for one user
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<DbTransaction>> {
        let results = sqlx::query_as::<_, DbTransaction>(
            "SELECT * FROM transactions WHERE user_id = $1 ORDER BY id DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(results)
    }

    /// Total withdrawn (atomic units) by a user for a token since the
    /// given unix timestamp. Drives the rolling daily cap.
    pub async fn sum_withdrawn_since(
        pool: &PgPool,
        user_id: i64,
        token_id: &str,
        since: i64,
    ) -> Result<BigDecimal> {
        let (total,): (BigDecimal,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE kind = $1 AND user_id = $2 AND token_id = $3 AND created_at >= $4
            "#,
        )
        .bind(TransactionKind::Withdraw)
        .bind(user_id)
        .bind(token_id)
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// Count audit entries
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
