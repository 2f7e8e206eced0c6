use crate::models::DbWallet;
use crate::Result;
use sqlx::PgPool;

pub struct WalletRepository;

impl WalletRepository {
    /// Link or relink an address to a user
    pub async fn link(pool: &PgPool, address: &str, user_id: i64, now: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO wallets (address, user_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (address) DO UPDATE SET user_id = EXCLUDED.user_id
            "#,
        )
        .bind(address)
        .bind(user_id)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Resolve a lowercase sender address to its linked user
    pub async fn find_user_by_address(pool: &PgPool, address: &str) -> Result<Option<i64>> {
        let result: Option<(i64,)> =
            sqlx::query_as("SELECT user_id FROM wallets WHERE address = $1")
                .bind(address)
                .fetch_optional(pool)
                .await?;
        Ok(result.map(|(user_id,)| user_id))
    }

    /// All linked wallets for a user
    pub async fn get_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<DbWallet>> {
        let results = sqlx::query_as::<_, DbWallet>(
            "SELECT * FROM wallets WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(results)
    }
}
