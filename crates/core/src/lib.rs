//! ThreadPress Core - Shared types library.
//!
//! This crate provides common types used across all ThreadPress components:
//! - `checkout` - Checkout pricing service (quotes, charge plans, payment)
//! - `cli` - Command-line charge-plan simulator and validator
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, sizes, print
//!   views, and payment statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
