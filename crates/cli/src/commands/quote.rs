//! Offline cart pricing from YAML inputs.
//!
//! Computes the same subtotal/GST/markup chain as the service, then adds
//! packaging & forwarding and printing to the final figure. The service's
//! customer-facing grand total leaves those two out; the offline quote is
//! for operators who need the all-in cost.

use std::path::Path;

use rust_decimal::Decimal;

use threadpress_checkout::cart::{CartLine, NormalizedCart};
use threadpress_checkout::checkout::{ChargeBreakdown, compute_totals};
use threadpress_checkout::rates::{ChargePlan, CheckoutRates};

use super::{CommandError, read_yaml};

/// Price a cart against a charge plan.
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed, or if the
/// plan violates its tier invariants.
pub fn run(
    cart_path: &Path,
    plan_path: &Path,
    location_percentage: Option<Decimal>,
) -> Result<(), CommandError> {
    let lines: Vec<CartLine> = read_yaml(cart_path)?;
    let plan: ChargePlan = read_yaml(plan_path)?;
    plan.validate()?;

    let cart = NormalizedCart::normalize(lines, &[]);
    let total_quantity = cart.total_quantity();
    let printing_units = cart.printing_units();

    let rates = CheckoutRates::from_plan(&plan, total_quantity);
    let markup = location_percentage.unwrap_or(Decimal::ZERO);
    let totals = compute_totals(cart.subtotal(), rates.gst_percent, markup);
    let charges = ChargeBreakdown::expand(rates, total_quantity, printing_units);

    // All-in figure: the compounded total plus the fulfilment charges.
    let payable = totals.grand_total + charges.pf_total + charges.printing_total;

    println!("Quantity:                {total_quantity}");
    println!("Printing units:          {printing_units}");
    println!();
    println!("Subtotal:                {}", totals.subtotal);
    println!(
        "GST ({}%):               {}",
        charges.rates.gst_percent, totals.gst_total
    );
    println!("Base total:              {}", totals.base_total);
    if !markup.is_zero() {
        println!("Grand total (+{markup}%):    {}", totals.grand_total);
    }
    println!();
    println!("Packaging & forwarding:  {}", charges.pf_total);
    println!("Printing:                {}", charges.printing_total);
    println!();
    println!("Total payable:           {payable}");

    Ok(())
}
