//! Core types for ThreadPress.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod print;
pub mod size;
pub mod status;

pub use id::*;
pub use price::{CurrencyCode, Price, resolve_unit_price};
pub use print::PrintView;
pub use size::SizeLabel;
pub use status::*;
