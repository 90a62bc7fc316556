//! Garment size labels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A garment size label.
///
/// The derive order is the canonical display order, so sorting a
/// `BTreeMap<SizeLabel, u32>` yields sizes in the order shoppers expect
/// regardless of insertion order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SizeLabel {
    #[serde(rename = "S")]
    S,
    #[serde(rename = "M")]
    M,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "XL")]
    Xl,
    #[serde(rename = "2XL")]
    Xxl,
    #[serde(rename = "3XL")]
    Xxxl,
}

impl SizeLabel {
    /// All sizes in canonical display order.
    pub const ALL: [Self; 6] = [Self::S, Self::M, Self::L, Self::Xl, Self::Xxl, Self::Xxxl];

    /// The wire/display label (e.g. `"2XL"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::Xl => "XL",
            Self::Xxl => "2XL",
            Self::Xxxl => "3XL",
        }
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
