//! Payment and order status enums.

use serde::{Deserialize, Serialize};

/// How the shopper pays for an order.
///
/// Wire names match what the order-completion service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Full amount through the hosted payment gateway.
    Online,
    /// 50% advance through the gateway, balance settled offline.
    HalfPayment,
    /// Manual bank/UPI transfer, confirmed by the shopper. B2B only.
    Netbanking,
    /// Pay at the store counter on collection. B2B only.
    StorePickup,
}

impl PaymentMode {
    /// Whether this mode goes through the payment gateway before the order
    /// is completed.
    #[must_use]
    pub const fn uses_gateway(self) -> bool {
        matches!(self, Self::Online | Self::HalfPayment)
    }

    /// Whether this mode is restricted to corporate (B2B) carts.
    #[must_use]
    pub const fn corporate_only(self) -> bool {
        matches!(self, Self::Netbanking | Self::StorePickup)
    }
}

/// Sub-mode for manual netbanking payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetbankingMode {
    Upi,
    Bank,
}

/// Order lifecycle status as reported by the order-completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Dispatched,
    Delivered,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentMode::StorePickup).expect("serialize"),
            "\"store_pickup\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMode::HalfPayment).expect("serialize"),
            "\"half_payment\""
        );
        assert_eq!(
            serde_json::to_string(&NetbankingMode::Upi).expect("serialize"),
            "\"upi\""
        );
    }

    #[test]
    fn gateway_modes() {
        assert!(PaymentMode::Online.uses_gateway());
        assert!(PaymentMode::HalfPayment.uses_gateway());
        assert!(!PaymentMode::Netbanking.uses_gateway());
        assert!(!PaymentMode::StorePickup.uses_gateway());
    }

    #[test]
    fn corporate_gating() {
        assert!(PaymentMode::Netbanking.corporate_only());
        assert!(PaymentMode::StorePickup.corporate_only());
        assert!(!PaymentMode::Online.corporate_only());
    }
}
