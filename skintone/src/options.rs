//! Tunable parameters for the clustering stage and image preprocessing

use serde::{Deserialize, Serialize};

/// Parameters for a pipeline run.
///
/// The skin ranges, minimum sample size, cluster count, brightness tiers, and palettes
/// are fixed constants and are intentionally absent here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
	/// The value used to seed the random number generator which chooses the initial centroids
	pub seed: u64,
	/// The number of k-means trials to run, keeping the trial with the lowest variance
	///
	/// At least one trial is always run.
	pub trials: u32,
	/// Total centroid movement, in 8-bit channel units, below which k-means stops
	pub convergence_threshold: f32,
	/// The maximum number of iterations for each k-means trial, with a minimum of one
	pub max_iter: u32,
	/// The maximum image size, in number of pixels, before a thumbnail is created
	pub max_pixels: u32,
}

impl Options {
	/// Seed used when a caller does not provide one
	pub const DEFAULT_SEED: u64 = 0;

	/// Returns these options with the given seed
	#[must_use]
	pub const fn with_seed(mut self, seed: u64) -> Self {
		self.seed = seed;
		self
	}
}

impl Default for Options {
	fn default() -> Self {
		Self {
			seed: Self::DEFAULT_SEED,
			trials: 1,
			convergence_threshold: 0.05,
			max_iter: 300,
			max_pixels: u32::MAX,
		}
	}
}
