//! Cart lines and the cart normalizer.
//!
//! Raw cart lines arrive from the client with the fields captured at
//! add-to-cart time (sizes, color, design, resolved unit price). On every
//! quote they are merged with fresh catalog records; cart fields win on
//! collision and a line whose product has disappeared from the catalog is
//! passed through unresolved rather than silently dropped.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use threadpress_core::{PrintView, ProductId, SizeLabel};

use crate::catalog::Product;

/// One per-view design entry on a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignView {
    pub view: PrintView,
    /// Preview image URL. Does NOT make the view a printed side.
    #[serde(default)]
    pub url: Option<String>,
    /// The shopper's uploaded artwork. Only a non-empty value makes the
    /// view count as a printed side.
    #[serde(rename = "uploadedImage", default)]
    pub uploaded_image: Option<String>,
}

impl DesignView {
    /// Whether this view counts as a printed side.
    #[must_use]
    pub fn is_printed(&self) -> bool {
        self.uploaded_image
            .as_deref()
            .is_some_and(|img| !img.is_empty())
    }
}

/// One purchasable unit in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    /// Size label -> non-negative count. `BTreeMap` keeps the canonical
    /// display order regardless of insertion order.
    #[serde(rename = "quantityBySize")]
    pub quantity_by_size: BTreeMap<SizeLabel, u32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(rename = "colorText", default)]
    pub color_text: Option<String>,
    #[serde(default)]
    pub design: Option<Vec<DesignView>>,
    /// Unit price resolved at add-to-cart time (base price adjusted for
    /// location, rounded up to an integer).
    pub price: Decimal,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(rename = "isCorporate", default)]
    pub is_corporate: bool,
}

impl CartLine {
    /// Total garment count across all sizes.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity_by_size.values().sum()
    }

    /// Number of printed sides: design entries with uploaded artwork.
    ///
    /// There is no minimum of one side - a garment with no uploaded design
    /// images contributes zero printing units.
    #[must_use]
    pub fn printed_sides(&self) -> u32 {
        self.design.as_ref().map_or(0, |views| {
            u32::try_from(views.iter().filter(|v| v.is_printed()).count()).unwrap_or(u32::MAX)
        })
    }

    /// Unit price times total quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity())
    }
}

/// A cart line overlaid with its catalog record.
///
/// `product` is `None` when the product no longer exists in the catalog;
/// the line still participates in totals with its stored price.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedLine {
    pub line: CartLine,
    pub product: Option<Product>,
}

impl NormalizedLine {
    /// Display name, from the catalog record when available.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.name.as_str())
    }

    /// Corporate flag. The cart's captured value wins over the catalog's,
    /// matching merge precedence (cart fields overlay product fields).
    #[must_use]
    pub fn is_corporate(&self) -> bool {
        self.line.is_corporate
    }
}

/// The normalized ("actual data") view of the cart.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizedCart {
    pub lines: Vec<NormalizedLine>,
}

impl NormalizedCart {
    /// Merge raw cart lines with the fetched catalog.
    ///
    /// Idempotent: normalizing an already-normalized cart's lines yields
    /// the same shape.
    #[must_use]
    pub fn normalize(lines: Vec<CartLine>, catalog: &[Product]) -> Self {
        let normalized = lines
            .into_iter()
            .map(|line| {
                let product = catalog.iter().find(|p| p.id == line.product_id).cloned();
                NormalizedLine { line, product }
            })
            .collect();
        Self { lines: normalized }
    }

    /// Sum over all lines of sum over all sizes of quantity.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.line.quantity()).sum()
    }

    /// Sum over all lines of unit price times line quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(|l| l.line.line_total()).sum()
    }

    /// Sum over all lines of line quantity times printed sides.
    #[must_use]
    pub fn printing_units(&self) -> u32 {
        self.lines
            .iter()
            .map(|l| l.line.quantity() * l.line.printed_sides())
            .sum()
    }

    /// Whether any line is corporate (unlocks B2B payment modes).
    #[must_use]
    pub fn is_corporate(&self) -> bool {
        self.lines.iter().any(NormalizedLine::is_corporate)
    }

    /// Whether the cart has nothing to price.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() || self.total_quantity() == 0
    }

    /// The raw cart lines, for order payload construction.
    #[must_use]
    pub fn raw_lines(&self) -> Vec<CartLine> {
        self.lines.iter().map(|l| l.line.clone()).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn line(product_id: &str, price: Decimal, sizes: &[(SizeLabel, u32)]) -> CartLine {
        CartLine {
            product_id: ProductId::new(product_id),
            quantity_by_size: sizes.iter().copied().collect(),
            color: Some("#000000".to_string()),
            color_text: Some("Black".to_string()),
            design: None,
            price,
            gender: None,
            is_corporate: false,
        }
    }

    fn catalog_product(id: &str, name: &str) -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "name": name,
            "pricing": [{"quantity": 1, "price_per": "500"}],
        }))
        .unwrap()
    }

    #[test]
    fn normalize_overlays_catalog_record() {
        let catalog = vec![catalog_product("p1", "Classic Tee")];
        let cart = NormalizedCart::normalize(
            vec![line("p1", dec!(500), &[(SizeLabel::M, 2)])],
            &catalog,
        );

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines.first().unwrap().name(), Some("Classic Tee"));
    }

    #[test]
    fn normalize_keeps_lines_for_deleted_products() {
        let cart = NormalizedCart::normalize(vec![line("gone", dec!(300), &[(SizeLabel::S, 1)])], &[]);

        assert_eq!(cart.lines.len(), 1);
        assert!(cart.lines.first().unwrap().product.is_none());
        // The stored price still drives the subtotal.
        assert_eq!(cart.subtotal(), dec!(300));
    }

    #[test]
    fn aggregates_sum_across_sizes_and_lines() {
        let cart = NormalizedCart::normalize(
            vec![
                line("p1", dec!(500), &[(SizeLabel::M, 2), (SizeLabel::L, 1)]),
                line("p2", dec!(200), &[(SizeLabel::S, 4)]),
            ],
            &[],
        );

        assert_eq!(cart.total_quantity(), 7);
        assert_eq!(cart.subtotal(), dec!(2300));
    }

    #[test]
    fn preview_only_view_is_not_a_printed_side() {
        let mut l = line("p1", dec!(500), &[(SizeLabel::M, 1)]);
        l.design = Some(vec![DesignView {
            view: PrintView::Front,
            url: Some("x".to_string()),
            uploaded_image: None,
        }]);
        assert_eq!(l.printed_sides(), 0);
    }

    #[test]
    fn uploaded_image_counts_as_printed_side() {
        let mut l = line("p1", dec!(500), &[(SizeLabel::M, 3)]);
        l.design = Some(vec![
            DesignView {
                view: PrintView::Front,
                url: None,
                uploaded_image: Some("data:image/png;base64,...".to_string()),
            },
            DesignView {
                view: PrintView::Back,
                url: None,
                uploaded_image: Some(String::new()), // empty string does not count
            },
        ]);
        assert_eq!(l.printed_sides(), 1);

        let cart = NormalizedCart::normalize(vec![l], &[]);
        // 3 garments x 1 printed side
        assert_eq!(cart.printing_units(), 3);
    }

    #[test]
    fn missing_design_contributes_zero_units() {
        let l = line("p1", dec!(500), &[(SizeLabel::M, 5)]);
        assert_eq!(l.printed_sides(), 0);

        let cart = NormalizedCart::normalize(vec![l], &[]);
        assert_eq!(cart.printing_units(), 0);
    }

    #[test]
    fn corporate_flag_is_any_line() {
        let mut corporate = line("p1", dec!(500), &[(SizeLabel::M, 1)]);
        corporate.is_corporate = true;
        let retail = line("p2", dec!(300), &[(SizeLabel::S, 1)]);

        let cart = NormalizedCart::normalize(vec![retail.clone(), corporate], &[]);
        assert!(cart.is_corporate());

        let cart = NormalizedCart::normalize(vec![retail], &[]);
        assert!(!cart.is_corporate());
    }

    #[test]
    fn normalize_is_idempotent() {
        let catalog = vec![catalog_product("p1", "Classic Tee")];
        let lines = vec![line("p1", dec!(500), &[(SizeLabel::M, 2)])];

        let once = NormalizedCart::normalize(lines.clone(), &catalog);
        let twice = NormalizedCart::normalize(once.raw_lines(), &catalog);

        assert_eq!(once.total_quantity(), twice.total_quantity());
        assert_eq!(once.subtotal(), twice.subtotal());
        assert_eq!(once.lines.len(), twice.lines.len());
    }
}
