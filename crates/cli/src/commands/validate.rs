//! Charge-plan validation.
//!
//! The live rate endpoints fall back to the last tier for quantities past
//! every range, so a plan with a gap or an inverted range misprices
//! silently instead of failing. This command is the pre-publish check.

use std::path::Path;

use threadpress_checkout::rates::ChargePlan;

use super::{CommandError, read_yaml};

/// Validate a charge plan's tier lists.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or with the
/// first tier violation found.
pub fn run(plan_path: &Path) -> Result<(), CommandError> {
    let plan: ChargePlan = read_yaml(plan_path)?;
    plan.validate()?;

    println!("Plan OK");
    println!(
        "  pakageingandforwarding: {} tier(s)",
        plan.packaging_and_forwarding.len()
    );
    println!("  printingcost:           {} tier(s)", plan.printing_cost.len());
    println!("  gst:                    {} tier(s)", plan.gst.len());

    Ok(())
}
