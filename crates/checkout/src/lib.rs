//! ThreadPress Checkout library.
//!
//! This crate provides the checkout pricing service as a library,
//! allowing it to be tested and reused.
//!
//! # Pipeline
//!
//! The service is a thin computation pipeline over four external
//! collaborators (all JSON over HTTP):
//!
//! 1. [`location`] - resolve the shopper's country to an FX rate and a
//!    percentage price markup (geocode + rate lookup, 24h cache).
//! 2. [`cart`] - merge raw cart lines with canonical catalog records and
//!    derive quantity/subtotal/printed-side aggregates.
//! 3. [`rates`] - quantity-tiered packaging & forwarding, printing and GST
//!    rates, with a stale-is-better-than-broken fetch policy.
//! 4. [`checkout`] - grand-total arithmetic and the four payment paths
//!    (online gateway, 50% advance, netbanking, store pickup).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod location;
pub mod orders;
pub mod payment;
pub mod rates;
pub mod routes;
pub mod state;
