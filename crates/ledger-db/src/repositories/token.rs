use crate::models::DbToken;
use crate::Result;
use sqlx::PgPool;

pub struct TokenRepository;

impl TokenRepository {
    /// Get all registered tokens
    pub async fn get_all(pool: &PgPool) -> Result<Vec<DbToken>> {
        let results = sqlx::query_as::<_, DbToken>("SELECT * FROM tokens ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(results)
    }

    /// Get token by identifier
    pub async fn get(pool: &PgPool, id: &str) -> Result<Option<DbToken>> {
        let result = sqlx::query_as::<_, DbToken>("SELECT * FROM tokens WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(result)
    }

    /// Get token by lowercase address
    pub async fn find_by_address(pool: &PgPool, address: &str) -> Result<Option<DbToken>> {
        let result = sqlx::query_as::<_, DbToken>("SELECT * FROM tokens WHERE address = $1")
            .bind(address)
            .fetch_optional(pool)
            .await?;
        Ok(result)
    }

    /// Insert or update a token (admin registration)
    pub async fn upsert(pool: &PgPool, token: &DbToken) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tokens (id, address, symbol, decimals, min_deposit, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                address = EXCLUDED.address,
                symbol = EXCLUDED.symbol,
                decimals = EXCLUDED.decimals,
                min_deposit = EXCLUDED.min_deposit
            "#,
        )
        .bind(&token.id)
        .bind(&token.address)
        .bind(&token.symbol)
        .bind(token.decimals)
        .bind(&token.min_deposit)
        .bind(token.active)
        .bind(token.created_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Toggle the active flag (admin)
    pub async fn set_active(pool: &PgPool, id: &str, active: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE tokens SET active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
