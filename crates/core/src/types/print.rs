//! Print placement views on a garment.

use serde::{Deserialize, Serialize};

/// One of the four printable placements on a garment.
///
/// A view only counts as a printed side when the shopper uploaded an image
/// for it; the counting rule lives with the cart types, this is just the
/// placement vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintView {
    Front,
    Back,
    Left,
    Right,
}

impl PrintView {
    /// All placements, front first.
    pub const ALL: [Self; 4] = [Self::Front, Self::Back, Self::Left, Self::Right];
}
