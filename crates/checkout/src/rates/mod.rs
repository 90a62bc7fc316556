//! Quantity-tiered charge rates.
//!
//! Three independent tiered components make up a charge plan: packaging &
//! forwarding (per garment), printing cost (per printed side), and GST (a
//! percentage, not a monetary amount). The rate service exposes the plan in
//! two wire shapes; both are resolved into the [`RateSheet`] tagged union
//! once at the API boundary and flattened to [`CheckoutRates`] for the
//! quote arithmetic.

pub mod client;
pub mod service;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::{RatePlanClient, RateError};
pub use service::{InMemorySnapshotStore, RateService, RateSnapshotStore};

/// One `[min_qty, max_qty] -> cost` range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTier {
    #[serde(rename = "minqty")]
    pub min_qty: u32,
    #[serde(rename = "maxqty")]
    pub max_qty: u32,
    pub cost: Decimal,
}

impl RateTier {
    /// Whether `qty` falls inside this tier's range.
    #[must_use]
    pub const fn contains(&self, qty: u32) -> bool {
        self.min_qty <= qty && qty <= self.max_qty
    }
}

/// Select the tier for a quantity: the containing tier, or the LAST tier
/// when the quantity exceeds every configured range.
///
/// The last-tier fallback is the deliberate open-ended ceiling policy for
/// unbounded quantities, not an error. Returns `None` only for an empty
/// tier list.
#[must_use]
pub fn select_tier(tiers: &[RateTier], qty: u32) -> Option<&RateTier> {
    tiers
        .iter()
        .find(|tier| tier.contains(qty))
        .or_else(|| tiers.last())
}

/// A full admin-authored charge plan (wire names are the rate service's).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargePlan {
    #[serde(rename = "pakageingandforwarding")]
    pub packaging_and_forwarding: Vec<RateTier>,
    #[serde(rename = "printingcost")]
    pub printing_cost: Vec<RateTier>,
    pub gst: Vec<RateTier>,
}

/// Tier-list invariant violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanValidationError {
    #[error("{component} tier {index}: minqty {min_qty} > maxqty {max_qty}")]
    InvertedRange {
        component: &'static str,
        index: usize,
        min_qty: u32,
        max_qty: u32,
    },
    #[error("{component} tier {index} overlaps the previous tier")]
    Overlap { component: &'static str, index: usize },
    #[error("{component} tiers are not sorted by minqty at index {index}")]
    Unsorted { component: &'static str, index: usize },
    #[error("{component} tier {index}: negative cost {cost}")]
    NegativeCost {
        component: &'static str,
        index: usize,
        cost: Decimal,
    },
}

impl ChargePlan {
    /// Check the tier invariants for all three components: sorted by
    /// `minqty` ascending, `minqty <= maxqty`, no overlapping ranges,
    /// non-negative costs.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), PlanValidationError> {
        validate_tiers("pakageingandforwarding", &self.packaging_and_forwarding)?;
        validate_tiers("printingcost", &self.printing_cost)?;
        validate_tiers("gst", &self.gst)
    }
}

fn validate_tiers(component: &'static str, tiers: &[RateTier]) -> Result<(), PlanValidationError> {
    let mut previous: Option<&RateTier> = None;
    for (index, tier) in tiers.iter().enumerate() {
        if tier.min_qty > tier.max_qty {
            return Err(PlanValidationError::InvertedRange {
                component,
                index,
                min_qty: tier.min_qty,
                max_qty: tier.max_qty,
            });
        }
        if tier.cost < Decimal::ZERO {
            return Err(PlanValidationError::NegativeCost {
                component,
                index,
                cost: tier.cost,
            });
        }
        if let Some(prev) = previous {
            if tier.min_qty < prev.min_qty {
                return Err(PlanValidationError::Unsorted { component, index });
            }
            if tier.min_qty <= prev.max_qty {
                return Err(PlanValidationError::Overlap { component, index });
            }
        }
        previous = Some(tier);
    }
    Ok(())
}

/// One slab from the slab-shaped rate response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlabRate {
    pub min: u32,
    pub max: u32,
    #[serde(rename = "pnfPerUnit", default)]
    pub pnf_per_unit: Decimal,
    #[serde(rename = "pnfFlat", default)]
    pub pnf_flat: Decimal,
    #[serde(rename = "printingPerSide", default)]
    pub printing_per_side: Option<Decimal>,
    #[serde(rename = "printingPerUnit", default)]
    pub printing_per_unit: Option<Decimal>,
}

/// The rate service's response, resolved into an explicit tagged union at
/// the API boundary instead of branching on which optional fields happen
/// to be present.
#[derive(Debug, Clone)]
pub enum RateSheet {
    /// Flat per-unit rates for the queried quantity.
    PerUnit {
        pf_per_unit: Decimal,
        print_per_unit: Decimal,
        gst_percent: Decimal,
    },
    /// Quantity slabs; the caller's quantity picks the slab.
    Slab {
        slabs: Vec<SlabRate>,
        /// Fractional rate (0.05 = 5%).
        gst_rate: Decimal,
    },
}

/// Flattened rates driving one quote's charge arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRates {
    /// Packaging & forwarding, per garment.
    pub pf_per_unit: Decimal,
    /// Packaging & forwarding, flat per order.
    pub pf_flat: Decimal,
    /// Printing, per garment (per-unit shape only).
    pub print_per_unit: Decimal,
    /// Printing, per printed side (slab shape only).
    pub printing_per_side: Decimal,
    /// GST as a percentage (5 = 5%).
    pub gst_percent: Decimal,
}

impl CheckoutRates {
    /// Flatten a rate sheet for a total quantity.
    #[must_use]
    pub fn from_sheet(sheet: &RateSheet, total_quantity: u32) -> Self {
        match sheet {
            RateSheet::PerUnit {
                pf_per_unit,
                print_per_unit,
                gst_percent,
            } => Self {
                pf_per_unit: *pf_per_unit,
                pf_flat: Decimal::ZERO,
                print_per_unit: *print_per_unit,
                printing_per_side: Decimal::ZERO,
                gst_percent: *gst_percent,
            },
            RateSheet::Slab { slabs, gst_rate } => {
                // Containing slab, or the last slab as the open-ended
                // ceiling (same policy as tier selection).
                let slab = slabs
                    .iter()
                    .find(|s| s.min <= total_quantity && total_quantity <= s.max)
                    .or_else(|| slabs.last());

                slab.map_or_else(Self::default, |slab| Self {
                    pf_per_unit: slab.pnf_per_unit,
                    pf_flat: slab.pnf_flat,
                    print_per_unit: Decimal::ZERO,
                    printing_per_side: slab
                        .printing_per_side
                        .or(slab.printing_per_unit)
                        .unwrap_or(Decimal::ZERO),
                    gst_percent: gst_rate * Decimal::ONE_HUNDRED,
                })
            }
        }
    }

    /// Flatten an admin charge plan for a total quantity (used by the
    /// offline simulator).
    #[must_use]
    pub fn from_plan(plan: &ChargePlan, total_quantity: u32) -> Self {
        let cost = |tiers: &[RateTier]| {
            select_tier(tiers, total_quantity).map_or(Decimal::ZERO, |t| t.cost)
        };
        Self {
            pf_per_unit: cost(&plan.packaging_and_forwarding),
            pf_flat: Decimal::ZERO,
            print_per_unit: Decimal::ZERO,
            printing_per_side: cost(&plan.printing_cost),
            gst_percent: cost(&plan.gst),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn tiers() -> Vec<RateTier> {
        vec![
            RateTier { min_qty: 1, max_qty: 10, cost: dec!(30) },
            RateTier { min_qty: 11, max_qty: 50, cost: dec!(20) },
            RateTier { min_qty: 51, max_qty: 100, cost: dec!(12) },
        ]
    }

    #[test]
    fn tier_selection_picks_containing_range() {
        let tiers = tiers();
        assert_eq!(select_tier(&tiers, 1).unwrap().cost, dec!(30));
        assert_eq!(select_tier(&tiers, 10).unwrap().cost, dec!(30));
        assert_eq!(select_tier(&tiers, 11).unwrap().cost, dec!(20));
        assert_eq!(select_tier(&tiers, 100).unwrap().cost, dec!(12));
    }

    #[test]
    fn tier_selection_beyond_all_ranges_uses_last_tier() {
        let tiers = tiers();
        // Ceiling policy: quantities past every range get the last tier.
        assert_eq!(select_tier(&tiers, 5000).unwrap().cost, dec!(12));
    }

    #[test]
    fn tier_selection_is_deterministic() {
        let tiers = tiers();
        for qty in [1, 7, 11, 50, 51, 99, 100, 101, 10_000] {
            let a = select_tier(&tiers, qty).unwrap().clone();
            let b = select_tier(&tiers, qty).unwrap().clone();
            assert_eq!(a, b, "qty {qty}");
        }
    }

    #[test]
    fn empty_tier_list_selects_nothing() {
        assert!(select_tier(&[], 5).is_none());
    }

    #[test]
    fn plan_validation_accepts_well_formed_plan() {
        let plan = ChargePlan {
            packaging_and_forwarding: tiers(),
            printing_cost: tiers(),
            gst: vec![RateTier { min_qty: 1, max_qty: 1000, cost: dec!(5) }],
        };
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn plan_validation_rejects_overlap() {
        let plan = ChargePlan {
            packaging_and_forwarding: vec![
                RateTier { min_qty: 1, max_qty: 10, cost: dec!(30) },
                RateTier { min_qty: 10, max_qty: 50, cost: dec!(20) },
            ],
            printing_cost: vec![],
            gst: vec![],
        };
        assert_eq!(
            plan.validate(),
            Err(PlanValidationError::Overlap {
                component: "pakageingandforwarding",
                index: 1
            })
        );
    }

    #[test]
    fn plan_validation_rejects_inverted_range() {
        let plan = ChargePlan {
            packaging_and_forwarding: vec![RateTier { min_qty: 10, max_qty: 5, cost: dec!(1) }],
            printing_cost: vec![],
            gst: vec![],
        };
        assert!(matches!(
            plan.validate(),
            Err(PlanValidationError::InvertedRange { .. })
        ));
    }

    #[test]
    fn plan_validation_rejects_negative_cost() {
        let plan = ChargePlan {
            packaging_and_forwarding: vec![],
            printing_cost: vec![RateTier { min_qty: 1, max_qty: 10, cost: dec!(-1) }],
            gst: vec![],
        };
        assert!(matches!(
            plan.validate(),
            Err(PlanValidationError::NegativeCost { .. })
        ));
    }

    #[test]
    fn per_unit_sheet_zeroes_slab_fields() {
        let sheet = RateSheet::PerUnit {
            pf_per_unit: dec!(10),
            print_per_unit: dec!(20),
            gst_percent: dec!(5),
        };
        let rates = CheckoutRates::from_sheet(&sheet, 2);
        assert_eq!(rates.pf_per_unit, dec!(10));
        assert_eq!(rates.print_per_unit, dec!(20));
        assert_eq!(rates.gst_percent, dec!(5));
        assert_eq!(rates.pf_flat, Decimal::ZERO);
        assert_eq!(rates.printing_per_side, Decimal::ZERO);
    }

    #[test]
    fn slab_sheet_scales_gst_rate_to_percent() {
        let sheet = RateSheet::Slab {
            slabs: vec![
                SlabRate {
                    min: 1,
                    max: 10,
                    pnf_per_unit: dec!(8),
                    pnf_flat: dec!(40),
                    printing_per_side: Some(dec!(25)),
                    printing_per_unit: None,
                },
                SlabRate {
                    min: 11,
                    max: 100,
                    pnf_per_unit: dec!(5),
                    pnf_flat: dec!(0),
                    printing_per_side: None,
                    printing_per_unit: Some(dec!(18)),
                },
            ],
            gst_rate: dec!(0.05),
        };

        let rates = CheckoutRates::from_sheet(&sheet, 5);
        assert_eq!(rates.pf_per_unit, dec!(8));
        assert_eq!(rates.pf_flat, dec!(40));
        assert_eq!(rates.printing_per_side, dec!(25));
        assert_eq!(rates.gst_percent, dec!(5));
        assert_eq!(rates.print_per_unit, Decimal::ZERO);

        // printingPerUnit is the fallback field name for printingPerSide.
        let rates = CheckoutRates::from_sheet(&sheet, 50);
        assert_eq!(rates.printing_per_side, dec!(18));

        // Past the last slab: ceiling fallback.
        let rates = CheckoutRates::from_sheet(&sheet, 5000);
        assert_eq!(rates.pf_per_unit, dec!(5));
    }

    #[test]
    fn plan_flattening_uses_tier_costs() {
        let plan = ChargePlan {
            packaging_and_forwarding: tiers(),
            printing_cost: vec![RateTier { min_qty: 1, max_qty: 100, cost: dec!(25) }],
            gst: vec![RateTier { min_qty: 1, max_qty: 1000, cost: dec!(5) }],
        };
        let rates = CheckoutRates::from_plan(&plan, 20);
        assert_eq!(rates.pf_per_unit, dec!(20));
        assert_eq!(rates.printing_per_side, dec!(25));
        assert_eq!(rates.gst_percent, dec!(5));
    }
}
