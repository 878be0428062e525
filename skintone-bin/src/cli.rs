//! Specifies the CLI and handles arg parsing

use clap::{Parser, ValueEnum};
use std::{
	fmt::{Debug, Display},
	num::ParseFloatError,
	ops::RangeBounds,
	path::PathBuf,
	str::FromStr,
};

/// Supported output formats for each analyzed image
#[derive(Copy, Clone, ValueEnum)]
pub enum FormatOutput {
	/// Category, skin color, and recommended colors
	Text,
	/// Skin color followed by the recommended colors as hex codes
	Hex,
	/// The full result as a JSON object per line
	Json,
	/// Whitespace with true color background
	Swatch,
}

/// Ways to colorize the output text
#[derive(Copy, Clone, ValueEnum)]
pub enum ColorizeOutput {
	/// Foreground
	Fg,
	/// Background
	Bg,
}

/// Detect the skin tone in images and print its category and recommended color palette.
#[derive(Parser)]
#[command(version)]
pub struct Options {
	/// The paths to the input images
	#[arg(required = true)]
	pub images: Vec<PathBuf>,

	/// The format to print the results in
	#[arg(short, long, default_value = "text")]
	pub output: FormatOutput,

	/// Color the foreground or background for each printed hex code
	#[arg(short, long)]
	pub colorize: Option<ColorizeOutput>,

	/// A JSON file with analysis options
	///
	/// Flags given on the command line override the values in the file.
	#[arg(long)]
	pub config: Option<PathBuf>,

	/// The number of trials of k-means to run
	///
	/// k-means can get stuck in a local minimum, so you may want to run a few trials to get more stable results.
	/// The trial with the lowest variance is picked.
	#[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
	pub trials: Option<u32>,

	/// The threshold number used to determine k-means convergence
	///
	/// This is the total distance, in 8-bit RGB units, that all centroids may move in one iteration
	/// before k-means is considered converged.
	#[arg(short = 'e', long, value_parser = parse_valid_convergence)]
	pub convergence_threshold: Option<f32>,

	/// The maximum number of iterations for each k-means trial
	#[arg(short = 'i', long, value_parser = clap::value_parser!(u32).range(1..))]
	pub max_iter: Option<u32>,

	/// The maximum image size, in number of pixels, before a thumbnail is created
	///
	/// This option is intended for reducing the time needed for large images.
	#[arg(short = 'p', long)]
	pub max_pixels: Option<u32>,

	/// The seed value used for the random number generator
	#[arg(long)]
	pub seed: Option<u64>,

	/// The number of threads used to analyze images in parallel
	///
	/// A value of 0 uses one thread per logical core.
	#[cfg(feature = "threads")]
	#[arg(short = 't', long, default_value_t = 0)]
	pub threads: u8,

	/// Log the running time and statistics of each pipeline stage
	#[arg(long)]
	pub verbose: bool,
}

impl Options {
	/// Apply the command line overrides on top of `base`
	pub fn analysis_options(&self, base: skintone::Options) -> skintone::Options {
		skintone::Options {
			seed: self.seed.unwrap_or(base.seed),
			trials: self.trials.unwrap_or(base.trials),
			convergence_threshold: self.convergence_threshold.unwrap_or(base.convergence_threshold),
			max_iter: self.max_iter.unwrap_or(base.max_iter),
			max_pixels: self.max_pixels.unwrap_or(base.max_pixels),
		}
	}
}

/// Parse a float value and ensure it in the provided, valid range
fn parse_float_in_range<T>(s: &str, range: impl RangeBounds<T> + Debug) -> Result<T, String>
where
	T: FromStr<Err = ParseFloatError> + Display + PartialOrd,
{
	let value: T = s.parse().map_err(|e| format!("{e}"))?;
	if range.contains(&value) {
		Ok(value)
	} else {
		Err(format!("{value} is not in {range:?}"))
	}
}

/// Parse the convergence number and ensure it is >= `0.0`
fn parse_valid_convergence(s: &str) -> Result<f32, String> {
	parse_float_in_range(s, 0.0..)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flags_override_base_options() {
		let options = Options::parse_from(["skintone", "a.png", "--seed", "9", "-n", "3"]);
		let base = skintone::Options {
			max_iter: 10,
			..skintone::Options::default()
		};

		let merged = options.analysis_options(base);
		assert_eq!(merged.seed, 9);
		assert_eq!(merged.trials, 3);
		assert_eq!(merged.max_iter, 10);
	}

	#[test]
	fn negative_convergence_is_rejected() {
		assert!(Options::try_parse_from(["skintone", "a.png", "-e", "-1"]).is_err());
	}

	#[test]
	fn zero_trials_or_iterations_are_rejected() {
		assert!(Options::try_parse_from(["skintone", "a.png", "-n", "0"]).is_err());
		assert!(Options::try_parse_from(["skintone", "a.png", "-i", "0"]).is_err());
		assert!(Options::try_parse_from(["skintone", "a.png", "-n", "1", "-i", "1"]).is_ok());
	}

	#[test]
	fn at_least_one_image_is_required() {
		assert!(Options::try_parse_from(["skintone"]).is_err());
	}
}
