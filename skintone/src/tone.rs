//! Bucketing of a skin color into a tone category by brightness

use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A skin tone category, ordered from lightest to darkest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ToneCategory {
	/// Brightness above [`VERY_LIGHT_ABOVE`]
	#[serde(rename = "Very Light")]
	VeryLight,
	/// Brightness above [`LIGHT_ABOVE`]
	Light,
	/// Brightness above [`INTERMEDIATE_ABOVE`]
	Intermediate,
	/// Brightness above [`TAN_ABOVE`]
	Tan,
	/// Brightness above [`BROWN_ABOVE`]
	Brown,
	/// Any lower brightness
	Dark,
}

/// Lower bound (exclusive) of [`ToneCategory::VeryLight`]
pub const VERY_LIGHT_ABOVE: f64 = 200.0;
/// Lower bound (exclusive) of [`ToneCategory::Light`]
pub const LIGHT_ABOVE: f64 = 150.0;
/// Lower bound (exclusive) of [`ToneCategory::Intermediate`]
pub const INTERMEDIATE_ABOVE: f64 = 120.0;
/// Lower bound (exclusive) of [`ToneCategory::Tan`]
pub const TAN_ABOVE: f64 = 100.0;
/// Lower bound (exclusive) of [`ToneCategory::Brown`]
pub const BROWN_ABOVE: f64 = 60.0;

impl ToneCategory {
	/// All categories from lightest to darkest
	pub const ALL: [Self; 6] = [
		Self::VeryLight,
		Self::Light,
		Self::Intermediate,
		Self::Tan,
		Self::Brown,
		Self::Dark,
	];

	/// The category for a brightness in `0.0..=255.0`, checking the highest tier first
	#[must_use]
	pub fn from_brightness(brightness: f64) -> Self {
		if brightness > VERY_LIGHT_ABOVE {
			Self::VeryLight
		} else if brightness > LIGHT_ABOVE {
			Self::Light
		} else if brightness > INTERMEDIATE_ABOVE {
			Self::Intermediate
		} else if brightness > TAN_ABOVE {
			Self::Tan
		} else if brightness > BROWN_ABOVE {
			Self::Brown
		} else {
			Self::Dark
		}
	}

	/// The category of a color
	#[must_use]
	pub fn from_color(color: Srgb<u8>) -> Self {
		Self::from_brightness(brightness(color))
	}

	/// The display name of this category
	#[must_use]
	pub const fn name(self) -> &'static str {
		match self {
			Self::VeryLight => "Very Light",
			Self::Light => "Light",
			Self::Intermediate => "Intermediate",
			Self::Tan => "Tan",
			Self::Brown => "Brown",
			Self::Dark => "Dark",
		}
	}
}

impl Display for ToneCategory {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// The unweighted mean of the red, green, and blue channels
#[must_use]
pub fn brightness(color: Srgb<u8>) -> f64 {
	(f64::from(color.red) + f64::from(color.green) + f64::from(color.blue)) / 3.0
}
