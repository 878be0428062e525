//! Detect a representative skin color in an image and map it to a tone category and a fashion color palette.
//!
//! The pipeline runs four stages, each consuming the previous stage's output:
//!
//! 1. [`convert`]: decode the image and derive its HSV and luma/chroma representations.
//! 2. [`mask`]: keep the pixels that fall inside the skin windows of both color spaces.
//! 3. [`dominant`]: split the skin pixels into 3 clusters and pick the brightest center.
//! 4. [`tone`] and [`swatches`]: bucket the center by brightness and look up its palette.
//!
//! # Examples
//!
//! ## Analyze an image file.
//!
//! ```no_run
//! if let Some(result) = skintone::analyze("some image") {
//!     println!("{}: {}", result.season, result.skin_tone);
//! }
//! ```
//!
//! ## Analyze uploaded bytes with a fixed seed and more k-means trials.
//!
//! ```no_run
//! let bytes = std::fs::read("some image").unwrap();
//! let options = skintone::Options { trials: 4, ..skintone::Options::default() }.with_seed(42);
//! let result = skintone::analyze_with(&bytes, &options);
//! ```
//!
//! # Failure
//!
//! [`analyze`] returns `None` for undecodable input, for images with fewer than
//! [`mask::MIN_SKIN_PIXELS`] skin pixels, and if clustering fails.
//! Use [`try_analyze`] to find out which of these happened.
//!
//! # Determinism
//!
//! k-means is seeded from [`Options::seed`], so the same input and options always give the same result.
//! Different seeds can move the hex code slightly while normally keeping the category.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::cargo)]
#![warn(clippy::use_debug, clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![warn(clippy::unwrap_used, clippy::unwrap_in_result)]
#![warn(clippy::unneeded_field_pattern, clippy::rest_pat_in_fully_bound_structs)]
#![warn(clippy::unnecessary_self_imports)]
#![warn(clippy::str_to_string, clippy::string_to_string, clippy::string_slice)]
#![warn(missing_docs, clippy::missing_docs_in_private_items, rustdoc::all)]
#![warn(clippy::float_cmp_const, clippy::lossy_float_literal)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::enum_glob_use)]
#![allow(clippy::unreadable_literal)]

pub mod convert;
pub mod dominant;
mod error;
mod kmeans;
pub mod mask;
mod options;
pub mod swatches;
pub mod tone;

pub use convert::Input;
pub use dominant::{Brightest, SelectCenter};
pub use error::{Error, Result};
pub use kmeans::RgbPoint;
pub use options::Options;
pub use tone::ToneCategory;

use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

/// The outcome of a successful analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
	/// The detected skin color as a lowercase `#rrggbb` hex string
	pub skin_tone: String,
	/// The tone category of the detected color
	pub season: ToneCategory,
	/// The recommended colors for the category
	pub recommended_colors: Vec<String>,
	/// Colors to avoid, always empty since no avoidance rules exist yet
	pub avoid_colors: Vec<String>,
	/// Human-readable summary
	pub description: String,
}

impl AnalysisResult {
	/// Build the result for a detected skin color
	#[must_use]
	pub fn new(skin: palette::Srgb<u8>) -> Self {
		let season = ToneCategory::from_color(skin);
		Self {
			skin_tone: dominant::to_hex(skin),
			season,
			recommended_colors: season.recommended_colors().iter().map(|&c| c.to_owned()).collect(),
			avoid_colors: Vec::new(),
			description: format!("Detected skin tone: {season}"),
		}
	}
}

/// Analyze an image with default options, returning `None` on any failure
#[must_use]
pub fn analyze<'a>(input: impl Into<Input<'a>>) -> Option<AnalysisResult> {
	analyze_with(input, &Options::default())
}

/// Analyze an image with the given options, returning `None` on any failure
#[must_use]
pub fn analyze_with<'a>(input: impl Into<Input<'a>>, options: &Options) -> Option<AnalysisResult> {
	match try_analyze_with(input, options) {
		Ok(result) => Some(result),
		Err(e) => {
			tracing::warn!("skin tone analysis failed: {e}");
			None
		},
	}
}

/// Analyze an image with default options
///
/// # Errors
/// See [`try_analyze_with`].
pub fn try_analyze<'a>(input: impl Into<Input<'a>>) -> Result<AnalysisResult> {
	try_analyze_with(input, &Options::default())
}

/// Analyze an image with the given options
///
/// # Errors
/// Returns [`Error::Decode`] or [`Error::EmptyImage`] if no pixels could be read,
/// [`Error::InsufficientSkinSample`] if too few pixels look like skin,
/// and [`Error::Clustering`] if no cluster center could be found.
pub fn try_analyze_with<'a>(input: impl Into<Input<'a>>, options: &Options) -> Result<AnalysisResult> {
	let image = convert::decode(input.into())?;
	analyze_image::<Brightest>(image, options)
}

/// Run the pipeline on an already decoded image, choosing the skin cluster with `S`
///
/// # Errors
/// Same as [`try_analyze_with`], except that decoding cannot fail.
pub fn analyze_image<S: SelectCenter>(image: DynamicImage, options: &Options) -> Result<AnalysisResult> {
	let (width, height) = image.dimensions();
	tracing::debug!("analyzing a {width}x{height} image");

	let image = convert::thumbnail(image, options.max_pixels);
	let planes = convert::ColorPlanes::new(image.into_rgb8())?;
	let (_, skin) = mask::skin_pixels(&planes)?;
	let color = dominant::dominant_color::<S>(&skin, options)?;
	let result = AnalysisResult::new(color);

	tracing::debug!("detected {} ({})", result.skin_tone, result.season);

	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn result_for_color() {
		let result = AnalysisResult::new(palette::Srgb::new(180, 140, 110));

		assert_eq!(result.skin_tone, "#b48c6e");
		assert_eq!(result.season, ToneCategory::Intermediate);
		assert_eq!(result.recommended_colors, ToneCategory::Intermediate.recommended_colors());
		assert!(result.avoid_colors.is_empty());
		assert_eq!(result.description, "Detected skin tone: Intermediate");
	}

	#[test]
	fn result_json_field_names() {
		let result = AnalysisResult::new(palette::Srgb::new(230, 210, 190));
		let json = serde_json::to_value(&result).expect("serializable");

		assert_eq!(json["skin_tone"], "#e6d2be");
		assert_eq!(json["season"], "Very Light");
		assert_eq!(json["recommended_colors"].as_array().map(Vec::len), Some(5));
		assert_eq!(json["avoid_colors"], serde_json::json!([]));
		assert_eq!(json["description"], "Detected skin tone: Very Light");

		let back: AnalysisResult = serde_json::from_value(json).expect("deserializable");
		assert_eq!(back, result);
	}

	#[test]
	fn malformed_input_is_none() {
		let empty: &[u8] = &[];
		let truncated: &[u8] = b"\x89PNG\r\n\x1a\n\0\0";

		assert!(analyze(empty).is_none());
		assert!(analyze(truncated).is_none());
		assert!(matches!(try_analyze(empty), Err(Error::Decode(_))));
	}
}
