use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::units::address_key;

/// A validated on-chain transfer as delivered by the external chain
/// listener. Addresses arrive in free-form case; the processor normalizes
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositEvent {
    pub from: String,
    pub to: String,
    pub token_address: String,
    /// Atomic amount as an unsigned decimal integer string.
    pub value_atomic: String,
    pub tx_hash: String,
}

/// Idempotency key for a deposit: one external transfer event maps to
/// exactly one key, case-insensitively.
pub fn deposit_key(tx_hash: &str, sender: Address, value_atomic: U256) -> String {
    format!(
        "{}_{}_{}",
        tx_hash.trim().to_ascii_lowercase(),
        address_key(sender),
        value_atomic
    )
}

/// Result of applying one deposit event. Every variant except `Credited`
/// leaves all balances untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositOutcome {
    /// Destination is not the configured treasury.
    WrongTreasury,
    /// Token not registered, or registered but deactivated.
    TokenUnknownOrInactive,
    /// Idempotency key already claimed; replay is a no-op.
    Duplicate,
    /// Under the token's minimum. Claimed and permanently skipped.
    BelowMinimum,
    /// Sender address has no linked user. Claimed and permanently skipped.
    WalletNotLinked,
    /// Balance credited and audit entry written.
    Credited { user_id: i64, amount_atomic: U256 },
}

impl DepositOutcome {
    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            DepositOutcome::WrongTreasury => "wrong_treasury",
            DepositOutcome::TokenUnknownOrInactive => "token_unknown_or_inactive",
            DepositOutcome::Duplicate => "duplicate",
            DepositOutcome::BelowMinimum => "below_minimum",
            DepositOutcome::WalletNotLinked => "wallet_not_linked",
            DepositOutcome::Credited { .. } => "credited",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::parse_address;

    #[test]
    fn deposit_key_is_case_insensitive() {
        let sender = parse_address("0xAbCd000000000000000000000000000000001234").unwrap();
        let a = deposit_key("0xDEADBEEF", sender, U256::from(100u64));
        let b = deposit_key("0xdeadbeef", sender, U256::from(100u64));
        assert_eq!(a, b);
        assert_eq!(
            a,
            "0xdeadbeef_0xabcd000000000000000000000000000000001234_100"
        );
    }

    #[test]
    fn deposit_key_distinguishes_amount() {
        let sender = parse_address("0xAbCd000000000000000000000000000000001234").unwrap();
        let a = deposit_key("0xdeadbeef", sender, U256::from(100u64));
        let b = deposit_key("0xdeadbeef", sender, U256::from(101u64));
        assert_ne!(a, b);
    }

    #[test]
    fn event_deserializes_from_listener_json() {
        let raw = r#"{
            "from": "0xAbCd000000000000000000000000000000001234",
            "to": "0x9999999999999999999999999999999999999999",
            "tokenAddress": "0x1111111111111111111111111111111111111111",
            "valueAtomic": "2500000",
            "txHash": "0xfeed"
        }"#;
        let event: DepositEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.value_atomic, "2500000");
        assert_eq!(event.tx_hash, "0xfeed");
    }
}
