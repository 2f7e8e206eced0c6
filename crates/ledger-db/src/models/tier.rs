use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the tiers table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbTier {
    pub id: String,
    pub name: String,
    pub duration_days: i32,
    pub active: bool,
    pub created_at: i64,
}

/// Database model for the tier_prices table.
///
/// A tier may be repriced over time; the latest row by insertion order is
/// the effective price.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbTierPrice {
    pub id: i64,
    pub tier_id: String,
    pub token_id: String,
    /// Human-decimal units as entered by an admin
    pub price: BigDecimal,
    pub created_at: i64,
}

/// Membership lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "membership_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Expired,
}

/// Database model for the tier_memberships table.
///
/// A partial unique index keeps at most one active row per (user, tier).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbTierMembership {
    pub id: i64,
    pub user_id: i64,
    pub tier_id: String,
    pub status: MembershipStatus,
    pub started_at: i64,
    pub expires_at: i64,
}
