use alloy_primitives::U256;
use ledger_core::units::parse_atomic;
use ledger_core::{LedgerError, Result};

/// Fee rates are basis points out of this denominator.
pub const BPS_DENOM: u64 = 10_000;

/// Split of a settled 1v1 pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPayout {
    pub pot: U256,
    pub rake: U256,
    pub payout: U256,
}

/// Pot, rake and winner payout for a symmetric 1v1 wager.
///
/// `pot = 2 * wager`, `rake = floor(pot * bps / 10000)`,
/// `payout = pot - rake`. Division truncates toward zero.
pub fn calc_payout(wager_atomic: U256, house_fee_bps: u64) -> Result<MatchPayout> {
    if house_fee_bps > BPS_DENOM {
        return Err(LedgerError::InvalidAmount(format!(
            "fee rate out of range: {house_fee_bps} bps"
        )));
    }
    let pot = wager_atomic
        .checked_mul(U256::from(2u8))
        .ok_or(LedgerError::AmountOverflow)?;
    let rake = pot
        .checked_mul(U256::from(house_fee_bps))
        .ok_or(LedgerError::AmountOverflow)?
        / U256::from(BPS_DENOM);
    let payout = pot - rake;
    Ok(MatchPayout { pot, rake, payout })
}

/// Validate a wire-format wager. Signed or otherwise malformed input is an
/// invalid wager, rejected before any math runs.
pub fn parse_wager(value: &str) -> Result<U256> {
    parse_atomic(value).map_err(|_| LedgerError::InvalidWager(value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn payout_splits_the_pot() {
        let split = calc_payout(u(100), 200).unwrap();
        assert_eq!(split.pot, u(200));
        assert_eq!(split.rake, u(4));
        assert_eq!(split.payout, u(196));
    }

    #[test]
    fn zero_wager_is_all_zero() {
        let split = calc_payout(U256::ZERO, 200).unwrap();
        assert_eq!(split.pot, U256::ZERO);
        assert_eq!(split.rake, U256::ZERO);
        assert_eq!(split.payout, U256::ZERO);
    }

    #[test]
    fn rake_division_truncates() {
        // pot 66, 1% rake would be 0.66
        let split = calc_payout(u(33), 100).unwrap();
        assert_eq!(split.rake, U256::ZERO);
        assert_eq!(split.payout, u(66));

        // pot 666, 2.5% rake would be 16.65
        let split = calc_payout(u(333), 250).unwrap();
        assert_eq!(split.rake, u(16));
        assert_eq!(split.payout, u(650));
    }

    #[test]
    fn full_rake_leaves_no_payout() {
        let split = calc_payout(u(50), 10_000).unwrap();
        assert_eq!(split.rake, u(100));
        assert_eq!(split.payout, U256::ZERO);
    }

    #[test]
    fn fee_rate_over_denominator_is_rejected() {
        assert!(matches!(
            calc_payout(u(100), 10_001),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn doubling_near_max_overflows() {
        assert!(matches!(
            calc_payout(U256::MAX, 200),
            Err(LedgerError::AmountOverflow)
        ));
    }

    #[test]
    fn negative_wager_is_invalid() {
        assert!(matches!(
            parse_wager("-100"),
            Err(LedgerError::InvalidWager(_))
        ));
        assert!(matches!(parse_wager("abc"), Err(LedgerError::InvalidWager(_))));
        assert_eq!(parse_wager("100").unwrap(), u(100));
    }
}
