pub mod config;
pub mod error;
pub mod types;
pub mod units;

pub use config::{BotConfig, RuntimeConfig};
pub use error::{LedgerError, Result};
