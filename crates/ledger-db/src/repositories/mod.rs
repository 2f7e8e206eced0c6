mod balance;
mod bot_config;
mod deposit;
mod tier;
mod token;
mod transaction;
mod wallet;

pub use balance::BalanceRepository;
pub use bot_config::BotConfigRepository;
pub use deposit::ProcessedDepositRepository;
pub use tier::TierRepository;
pub use token::TokenRepository;
pub use transaction::TransactionRepository;
pub use wallet::WalletRepository;
