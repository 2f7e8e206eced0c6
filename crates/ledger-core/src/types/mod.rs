mod deposit;
mod token;

pub use deposit::{deposit_key, DepositEvent, DepositOutcome};
pub use token::Token;
