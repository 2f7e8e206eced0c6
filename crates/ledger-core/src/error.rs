use thiserror::Error;

/// Errors surfaced by the ledger core.
///
/// Business-rule variants are expected outcomes and map to short
/// user-facing reasons via [`LedgerError::user_message`]; transient and
/// infrastructure variants map to a generic retry message.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid wager: {0}")]
    InvalidWager(String),

    #[error("Amount overflow")]
    AmountOverflow,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Unknown token: {0}")]
    TokenNotFound(String),

    #[error("Token is deactivated: {0}")]
    TokenInactive(String),

    #[error("Tier unavailable: {0}")]
    TierUnavailable(String),

    #[error("No price configured for tier: {0}")]
    NoPriceConfigured(String),

    #[error("Withdrawal below minimum")]
    WithdrawBelowMinimum,

    #[error("Withdrawal exceeds per-transaction maximum")]
    WithdrawOverMax,

    #[error("Withdrawal exceeds daily cap")]
    WithdrawDailyCapExceeded,

    #[error("Write conflict, retries exhausted")]
    Conflict,

    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// True for failures the caller may safely retry as-is.
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::Conflict | LedgerError::Database(_))
    }

    /// Short human-readable reason for bot replies. Infrastructure detail
    /// is never leaked here.
    pub fn user_message(&self) -> &'static str {
        match self {
            LedgerError::InvalidAddress(_) => "that address doesn't look right",
            LedgerError::InvalidAmount(_) => "that amount doesn't look right",
            LedgerError::InvalidWager(_) => "that wager doesn't look right",
            LedgerError::AmountOverflow => "that amount is too large",
            LedgerError::InsufficientFunds => "you don't have enough funds",
            LedgerError::TokenNotFound(_) => "unknown token",
            LedgerError::TokenInactive(_) => "that token is currently disabled",
            LedgerError::TierUnavailable(_) => "that tier isn't available",
            LedgerError::NoPriceConfigured(_) => "that tier has no price configured",
            LedgerError::WithdrawBelowMinimum => "that's below the minimum withdrawal",
            LedgerError::WithdrawOverMax => "that's over the per-withdrawal maximum",
            LedgerError::WithdrawDailyCapExceeded => "you've hit the daily withdrawal cap",
            LedgerError::MissingEnvVar(_)
            | LedgerError::Conflict
            | LedgerError::Database(_) => "something went wrong, please try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_have_specific_messages() {
        assert_eq!(
            LedgerError::InsufficientFunds.user_message(),
            "you don't have enough funds"
        );
        assert_eq!(
            LedgerError::WithdrawDailyCapExceeded.user_message(),
            "you've hit the daily withdrawal cap"
        );
        assert!(!LedgerError::InsufficientFunds.is_transient());
    }

    #[test]
    fn infrastructure_errors_stay_generic() {
        let err = LedgerError::Database("connection reset by peer".to_string());
        assert_eq!(err.user_message(), "something went wrong, please try again");
        assert!(err.is_transient());
        assert!(LedgerError::Conflict.is_transient());
    }
}
