//! Payment gateway and manual-payment support.
//!
//! Online and half-advance modes go through the hosted gateway: an order
//! is created server-side, the widget collects payment in the browser, and
//! the returned signature is verified here before the order is completed.
//! Netbanking and store pickup never touch the gateway.

pub mod bank;
pub mod gateway;

pub use bank::{ActiveBankDetails, BankDetailsClient, BankDetailsError};
pub use gateway::{GatewayClient, GatewayError, GatewayOrder};
