//! Extraction of the representative skin color from the skin pixel set.
//!
//! The skin pixels are split into [`CLUSTER_COUNT`] clusters and one cluster center is chosen
//! by a [`SelectCenter`] rule. The default rule, [`Brightest`], assumes the brightest cluster is
//! directly lit skin while the others hold shadowed skin or hair and background that survived
//! masking. This is a heuristic: a bright background patch inside the skin windows will win.

use crate::{
	error::{Error, Result},
	kmeans::{self, RgbCounts, RgbPoint},
	mask::SkinPixelSet,
	options::Options,
};
use palette::Srgb;

/// The number of clusters the skin pixels are split into
pub const CLUSTER_COUNT: u8 = 3;

/// A rule for choosing the cluster center that represents skin
pub trait SelectCenter {
	/// Returns the index of the chosen center, or `None` if `centers` is empty
	fn select(centers: &[RgbPoint], counts: &[u32]) -> Option<usize>;
}

/// Chooses the center with the highest mean channel value, preferring the first on ties
pub struct Brightest;

impl SelectCenter for Brightest {
	fn select(centers: &[RgbPoint], _counts: &[u32]) -> Option<usize> {
		let mut best: Option<(usize, f32)> = None;
		for (i, &center) in centers.iter().enumerate() {
			let brightness = mean_channel(center);
			if best.map_or(true, |(_, max)| brightness > max) {
				best = Some((i, brightness));
			}
		}
		best.map(|(i, _)| i)
	}
}

/// The unweighted mean of the three channels
fn mean_channel(color: RgbPoint) -> f32 {
	(color.red + color.green + color.blue) / 3.0
}

/// Convert a cluster center to integer channels, truncating the fractional part
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate(center: RgbPoint) -> Srgb<u8> {
	// centroids are means of 8-bit colors, so they stay inside 0.0..=255.0
	Srgb::new(center.red as u8, center.green as u8, center.blue as u8)
}

/// Format a color as a lowercase `#rrggbb` hex string
#[must_use]
pub fn to_hex(color: Srgb<u8>) -> String {
	format!("#{color:x}")
}

/// Cluster the skin pixels and return the center chosen by `S`
///
/// # Errors
/// Returns [`Error::Clustering`] if clustering yields no non-empty cluster.
pub fn dominant_color<S: SelectCenter>(skin: &SkinPixelSet, options: &Options) -> Result<Srgb<u8>> {
	let data = RgbCounts::from_pixels(skin.pixels());
	tracing::debug!("reduced {} skin pixels to {} unique colors", skin.len(), data.num_colors());

	let result = kmeans::run(
		&data,
		options.trials,
		CLUSTER_COUNT,
		options.convergence_threshold,
		options.max_iter,
		options.seed,
	);

	tracing::debug!(
		"k-means finished after {} iterations with variance {:.3}",
		result.iterations,
		result.variance
	);

	let index = S::select(&result.centroids, &result.counts).ok_or(Error::Clustering)?;
	let color = truncate(result.centroids[index]);

	tracing::debug!("chose center {} of {}: {}", index, result.centroids.len(), to_hex(color));

	Ok(color)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn brightest_picks_highest_mean() {
		let centers = [
			Srgb::new(90.0, 60.0, 40.0),
			Srgb::new(200.0, 150.0, 120.0),
			Srgb::new(20.0, 20.0, 20.0),
		];
		assert_eq!(Brightest::select(&centers, &[10, 1, 10]), Some(1));
	}

	#[test]
	fn brightest_prefers_first_on_ties() {
		let centers = [Srgb::new(100.0, 100.0, 100.0), Srgb::new(150.0, 100.0, 50.0)];
		assert_eq!(Brightest::select(&centers, &[1, 1]), Some(0));
	}

	#[test]
	fn brightest_of_nothing_is_none() {
		assert_eq!(Brightest::select(&[], &[]), None);
	}

	#[test]
	fn hex_is_lowercase() {
		assert_eq!(to_hex(Srgb::new(0xAB, 0x0C, 0xFF)), "#ab0cff");
		assert_eq!(to_hex(Srgb::new(0, 0, 0)), "#000000");
	}

	#[test]
	fn truncates_fractional_channels() {
		assert_eq!(truncate(Srgb::new(180.9, 140.5, 110.1)), Srgb::new(180, 140, 110));
	}

	/// Always picks the darkest center
	struct Darkest;

	impl SelectCenter for Darkest {
		fn select(centers: &[RgbPoint], _counts: &[u32]) -> Option<usize> {
			(0..centers.len()).min_by(|&i, &j| f32::total_cmp(&mean_channel(centers[i]), &mean_channel(centers[j])))
		}
	}

	fn two_tone_skin() -> SkinPixelSet {
		let image = image::RgbImage::from_fn(10, 10, |x, _| {
			if x < 5 {
				image::Rgb([200, 150, 120])
			} else {
				image::Rgb([120, 80, 60])
			}
		});
		let planes = crate::convert::ColorPlanes::new(image).expect("non-empty image");
		crate::mask::skin_pixels(&planes).expect("enough skin").1
	}

	#[test]
	fn selection_rule_is_swappable() {
		let skin = two_tone_skin();
		let options = Options::default();

		assert_eq!(dominant_color::<Brightest>(&skin, &options).expect("clusters"), Srgb::new(200, 150, 120));
		assert_eq!(dominant_color::<Darkest>(&skin, &options).expect("clusters"), Srgb::new(120, 80, 60));
	}

	#[test]
	fn zero_iterations_and_trials_still_pick_brightest() {
		let skin = two_tone_skin();
		let options = Options { trials: 0, max_iter: 0, ..Options::default() };

		assert_eq!(dominant_color::<Brightest>(&skin, &options).expect("clusters"), Srgb::new(200, 150, 120));
	}

	#[test]
	fn empty_sample_is_a_clustering_error() {
		let result = dominant_color::<Brightest>(&SkinPixelSet::default(), &Options::default());
		assert!(matches!(result, Err(Error::Clustering)));
	}
}
