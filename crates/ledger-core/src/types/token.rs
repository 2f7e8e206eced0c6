use alloy_primitives::Address;
use bigdecimal::BigDecimal;

/// A registered token: the unit of every balance, wager and price.
#[derive(Debug, Clone)]
pub struct Token {
    /// Short identifier used in commands and as the balance key.
    pub id: String,
    /// Chain contract address, canonicalized lowercase.
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    /// Per-token minimum deposit in human-decimal units. Falls back to the
    /// global config minimum when absent.
    pub min_deposit: Option<BigDecimal>,
    pub active: bool,
}

impl Token {
    /// Effective minimum deposit given the global fallback.
    pub fn min_deposit_or(&self, fallback: &BigDecimal) -> BigDecimal {
        self.min_deposit.clone().unwrap_or_else(|| fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn min_deposit_falls_back_to_config() {
        let mut token = Token {
            id: "usdq".to_string(),
            address: Address::ZERO,
            symbol: "USDQ".to_string(),
            decimals: 6,
            min_deposit: None,
            active: true,
        };
        let fallback = BigDecimal::from(5u32);
        assert_eq!(token.min_deposit_or(&fallback), fallback);

        token.min_deposit = Some(BigDecimal::from_str("0.5").unwrap());
        assert_eq!(
            token.min_deposit_or(&fallback),
            BigDecimal::from_str("0.5").unwrap()
        );
    }
}
