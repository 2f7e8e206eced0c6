mod balance;
mod bot_config;
mod deposit;
mod tier;
mod token;
mod transaction;
mod wallet;

pub use balance::DbBalance;
pub use bot_config::DbBotConfig;
pub use deposit::DbProcessedDeposit;
pub use tier::{DbTier, DbTierMembership, DbTierPrice, MembershipStatus};
pub use token::DbToken;
pub use transaction::{DbTransaction, NewTransaction, TransactionKind};
pub use wallet::DbWallet;
