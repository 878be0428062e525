//! The fixed table of recommended fashion colors for each tone category

use crate::tone::ToneCategory;

/// The number of recommended colors per category
pub const PALETTE_SIZE: usize = 5;

/// Recommended colors as uppercase `#RRGGBB` hex strings
pub type Swatches = [&'static str; PALETTE_SIZE];

/// Ruby, Cobalt, Cream, Iris, Jade
const VERY_LIGHT: Swatches = ["#E0115F", "#0047AB", "#FFFDD0", "#5D3FD3", "#00A36C"];
/// Navy, Peach, Burgundy, Indigo, Beige
const LIGHT: Swatches = ["#000080", "#FFDAB9", "#800020", "#4B0082", "#F5F5DC"];
/// Coral, Teal, Off-White, Goldenrod, Charcoal
const INTERMEDIATE: Swatches = ["#FF7F50", "#008080", "#FAF9F6", "#DAA520", "#36454F"];
/// White, Linen, Sea Green, Lavender, Steel Blue
const TAN: Swatches = ["#FFFFFF", "#FAF0E6", "#2E8B57", "#E6E6FA", "#4682B4"];
/// Gold, Sunset, Turquoise, Rose, Dark Orange
const BROWN: Swatches = ["#FFD700", "#FAD5A5", "#00CED1", "#BC8F8F", "#FF8C00"];
/// Ivory, Fuchsia, Lime, Cyan, Pure White
const DARK: Swatches = ["#F5F5DC", "#FF00FF", "#00FF00", "#00FFFF", "#FFFFFF"];

impl ToneCategory {
	/// The recommended colors for this category
	#[must_use]
	pub const fn recommended_colors(self) -> &'static Swatches {
		match self {
			Self::VeryLight => &VERY_LIGHT,
			Self::Light => &LIGHT,
			Self::Intermediate => &INTERMEDIATE,
			Self::Tan => &TAN,
			Self::Brown => &BROWN,
			Self::Dark => &DARK,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use palette::Srgb;
	use std::str::FromStr;

	#[test]
	fn every_swatch_is_a_valid_hex_color() {
		for category in ToneCategory::ALL {
			for swatch in category.recommended_colors() {
				assert_eq!(swatch.len(), 7, "{category}: {swatch}");
				assert!(Srgb::<u8>::from_str(swatch).is_ok(), "{category}: {swatch}");
			}
		}
	}

	#[test]
	fn intermediate_palette() {
		assert_eq!(
			ToneCategory::Intermediate.recommended_colors(),
			&["#FF7F50", "#008080", "#FAF9F6", "#DAA520", "#36454F"]
		);
	}
}
