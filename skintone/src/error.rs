//! Error cases for each stage of the pipeline

use thiserror::Error;

/// Result type used by the pipeline stages
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons the pipeline could not produce an [`AnalysisResult`](crate::AnalysisResult)
#[derive(Error, Debug)]
pub enum Error {
	/// The input could not be read or decoded as an image
	#[error("failed to decode the image: {0}")]
	Decode(#[from] image::ImageError),

	/// The decoded image has a zero width or height
	#[error("image has no pixels: {width}x{height}")]
	EmptyImage {
		/// Width of the decoded image
		width: u32,
		/// Height of the decoded image
		height: u32,
	},

	/// Too few pixels passed both skin masks
	#[error("insufficient skin sample: {found} pixels (minimum {minimum})")]
	InsufficientSkinSample {
		/// Number of pixels that passed the masks
		found: usize,
		/// The minimum sample size
		minimum: usize,
	},

	/// Clustering did not produce any non-empty cluster
	#[error("clustering produced no usable center")]
	Clustering,
}
