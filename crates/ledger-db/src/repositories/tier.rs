use crate::models::{DbTier, DbTierMembership, DbTierPrice, MembershipStatus};
use crate::Result;
use bigdecimal::BigDecimal;
use sqlx::{PgExecutor, PgPool};

pub struct TierRepository;

impl TierRepository {
    /// Get tier by identifier
    pub async fn get(pool: &PgPool, id: &str) -> Result<Option<DbTier>> {
        let result = sqlx::query_as::<_, DbTier>("SELECT * FROM tiers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(result)
    }

    /// All purchasable tiers
    pub async fn list_active(pool: &PgPool) -> Result<Vec<DbTier>> {
        let results =
            sqlx::query_as::<_, DbTier>("SELECT * FROM tiers WHERE active ORDER BY id")
                .fetch_all(pool)
                .await?;
        Ok(results)
    }

    /// Insert or update a tier (admin)
    pub async fn upsert(pool: &PgPool, tier: &DbTier) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tiers (id, name, duration_days, active, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                duration_days = EXCLUDED.duration_days,
                active = EXCLUDED.active
            "#,
        )
        .bind(&tier.id)
        .bind(&tier.name)
        .bind(tier.duration_days)
        .bind(tier.active)
        .bind(tier.created_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Effective price for a tier: the latest row by insertion order
    pub async fn latest_price(pool: &PgPool, tier_id: &str) -> Result<Option<DbTierPrice>> {
        let result = sqlx::query_as::<_, DbTierPrice>(
            r#"
            SELECT * FROM tier_prices
            WHERE tier_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(tier_id)
        .fetch_optional(pool)
        .await?;
        Ok(result)
    }

    /// Append a new price row (admin); older rows stay for history
    pub async fn add_price(
        pool: &PgPool,
        tier_id: &str,
        token_id: &str,
        price: &BigDecimal,
        now: i64,
    ) -> Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO tier_prices (tier_id, token_id, price, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(tier_id)
        .bind(token_id)
        .bind(price)
        .bind(now)
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    /// The user's current active membership for a tier, if any
    pub async fn active_membership(
        pool: &PgPool,
        user_id: i64,
        tier_id: &str,
    ) -> Result<Option<DbTierMembership>> {
        let result = sqlx::query_as::<_, DbTierMembership>(
            r#"
            SELECT * FROM tier_memberships
            WHERE user_id = $1 AND tier_id = $2 AND status = $3
            "#,
        )
        .bind(user_id)
        .bind(tier_id)
        .bind(MembershipStatus::Active)
        .fetch_optional(pool)
        .await?;
        Ok(result)
    }

    /// Expire any active membership for (user, tier), setting its expiry to
    /// now. Returns how many rows flipped.
    pub async fn expire_active<'e>(
        executor: impl PgExecutor<'e>,
        user_id: i64,
        tier_id: &str,
        now: i64,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE tier_memberships
            SET status = $4, expires_at = $3
            WHERE user_id = $1 AND tier_id = $2 AND status = $5
            "#,
        )
        .bind(user_id)
        .bind(tier_id)
        .bind(now)
        .bind(MembershipStatus::Expired)
        .bind(MembershipStatus::Active)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Insert a fresh active membership
    pub async fn insert_membership<'e>(
        executor: impl PgExecutor<'e>,
        user_id: i64,
        tier_id: &str,
        started_at: i64,
        expires_at: i64,
    ) -> Result<DbTierMembership> {
        let membership = sqlx::query_as::<_, DbTierMembership>(
            r#"
            INSERT INTO tier_memberships (user_id, tier_id, status, started_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(tier_id)
        .bind(MembershipStatus::Active)
        .bind(started_at)
        .bind(expires_at)
        .fetch_one(executor)
        .await?;
        Ok(membership)
    }
}
