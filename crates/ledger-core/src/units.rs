//! Amount arithmetic at the atomic/human boundary.
//!
//! Atomic amounts are unsigned 256-bit integers; human-decimal values are
//! exact decimals (NUMERIC in the store). Conversions are exact or they
//! fail. Floating point never touches money.

use alloy_primitives::{Address, U256};
use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, RoundingMode};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{LedgerError, Result};

/// Current unix time in seconds.
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Parse a wire-format atomic amount (unsigned decimal integer string).
pub fn parse_atomic(value: &str) -> Result<U256> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LedgerError::InvalidAmount(format!(
            "not an unsigned integer: {trimmed:?}"
        )));
    }
    U256::from_str(trimmed).map_err(|_| LedgerError::AmountOverflow)
}

/// Parse a chain address in any case, with or without the 0x prefix.
pub fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value.trim())
        .map_err(|_| LedgerError::InvalidAddress(value.trim().to_string()))
}

/// Canonical storage form of an address: lowercase hex, 0x-prefixed.
pub fn address_key(address: Address) -> String {
    format!("{address:#x}")
}

/// Lossless U256 to decimal conversion.
pub fn u256_to_decimal(value: U256) -> BigDecimal {
    let digits = BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>());
    BigDecimal::from(digits)
}

/// Decimal to U256. Fails on negative or fractional values rather than
/// rounding.
pub fn decimal_to_u256(value: &BigDecimal) -> Result<U256> {
    if value.sign() == Sign::Minus {
        return Err(LedgerError::InvalidAmount(format!("negative amount: {value}")));
    }
    let floored = value.with_scale_round(0, RoundingMode::Floor);
    if &floored != value {
        return Err(LedgerError::InvalidAmount(format!(
            "fractional atomic amount: {value}"
        )));
    }
    let (digits, _) = floored.into_bigint_and_exponent();
    U256::from_str(&digits.to_string()).map_err(|_| LedgerError::AmountOverflow)
}

/// Atomic units to human-decimal units for a token with the given decimals.
pub fn to_human(atomic: U256, decimals: u8) -> BigDecimal {
    let digits = BigInt::from_bytes_be(Sign::Plus, &atomic.to_be_bytes::<32>());
    BigDecimal::new(digits, decimals as i64)
}

/// Human-decimal units to atomic units. A value with more fractional digits
/// than the token carries is a configuration error, not a rounding case.
pub fn to_atomic(human: &BigDecimal, decimals: u8) -> Result<U256> {
    // 1 * 10^decimals, exactly
    let scale = BigDecimal::new(BigInt::from(1), -(decimals as i64));
    decimal_to_u256(&(human * scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn parse_atomic_accepts_unsigned_integers() {
        assert_eq!(parse_atomic("0").unwrap(), U256::ZERO);
        assert_eq!(parse_atomic(" 1000 ").unwrap(), U256::from(1000u64));
        // 2^128, one past u128::MAX
        assert_eq!(
            parse_atomic("340282366920938463463374607431768211456").unwrap(),
            U256::from(u128::MAX) + U256::from(1u8)
        );
    }

    #[test]
    fn parse_atomic_rejects_signed_and_malformed() {
        assert!(matches!(
            parse_atomic("-100"),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_atomic("+100"),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(parse_atomic(""), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(
            parse_atomic("1.5"),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_atomic("0x10"),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn parse_atomic_rejects_overflow() {
        // 79 nines is past U256::MAX
        let too_big = "9".repeat(79);
        assert!(matches!(
            parse_atomic(&too_big),
            Err(LedgerError::AmountOverflow)
        ));
    }

    #[test]
    fn address_key_normalizes_case() {
        let mixed = parse_address("0xD8DA6BF26964AF9D7eEd9e03E53415D37aA96045").unwrap();
        let lower = parse_address("0xd8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap();
        assert_eq!(mixed, lower);
        assert_eq!(
            address_key(mixed),
            "0xd8da6bf26964af9d7eed9e03e53415d37aa96045"
        );
    }

    #[test]
    fn atomic_human_round_trip() {
        let atomic = U256::from(1_500_000_000_000_000_000u64);
        let human = to_human(atomic, 18);
        assert_eq!(human, dec("1.5"));
        assert_eq!(to_atomic(&human, 18).unwrap(), atomic);

        // zero-decimals token
        assert_eq!(to_human(U256::from(42u64), 0), dec("42"));
        assert_eq!(to_atomic(&dec("42"), 0).unwrap(), U256::from(42u64));
    }

    #[test]
    fn to_atomic_rejects_excess_precision() {
        // 6-decimals token cannot carry 7 fractional digits
        assert!(matches!(
            to_atomic(&dec("1.0000001"), 6),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert_eq!(
            to_atomic(&dec("1.000001"), 6).unwrap(),
            U256::from(1_000_001u64)
        );
    }

    #[test]
    fn decimal_to_u256_rejects_negative_and_fractional() {
        assert!(matches!(
            decimal_to_u256(&dec("-1")),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            decimal_to_u256(&dec("0.5")),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert_eq!(decimal_to_u256(&dec("12")).unwrap(), U256::from(12u64));
    }

    #[test]
    fn u256_decimal_round_trip() {
        let v = U256::MAX;
        assert_eq!(decimal_to_u256(&u256_to_decimal(v)).unwrap(), v);
    }
}
