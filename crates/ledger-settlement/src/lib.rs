pub mod config_cache;
pub mod deposits;
pub mod ledger;
pub mod matches;
pub mod rake;
pub mod registry;
mod retry;
pub mod tiers;
pub mod withdrawals;

pub use config_cache::ConfigCache;
pub use deposits::DepositProcessor;
pub use ledger::{AuditNote, Ledger, TipReceipt};
pub use matches::{MatchReceipt, MatchSettlement};
pub use rake::{calc_payout, parse_wager, MatchPayout, BPS_DENOM};
pub use registry::TokenRegistry;
pub use retry::RetrySettings;
pub use tiers::TierSettlement;
pub use withdrawals::{WithdrawalReceipt, WithdrawalService};
