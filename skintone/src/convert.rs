//! Decoding of the input image and conversion into the color spaces used for skin masking

use crate::error::{Error, Result};
use image::{DynamicImage, GenericImageView, RgbImage};
use palette::{FromColor, Hsv, Srgb};
use std::path::{Path, PathBuf};

/// Source of the encoded image data
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
	/// Encoded bytes in any format supported by the enabled `image` features
	Bytes(&'a [u8]),
	/// Path to an image file on the local filesystem
	Path(&'a Path),
}

impl<'a> From<&'a [u8]> for Input<'a> {
	fn from(bytes: &'a [u8]) -> Self {
		Self::Bytes(bytes)
	}
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
	fn from(bytes: &'a Vec<u8>) -> Self {
		Self::Bytes(bytes)
	}
}

impl<'a> From<&'a Path> for Input<'a> {
	fn from(path: &'a Path) -> Self {
		Self::Path(path)
	}
}

impl<'a> From<&'a PathBuf> for Input<'a> {
	fn from(path: &'a PathBuf) -> Self {
		Self::Path(path)
	}
}

/// A string is always interpreted as a filesystem path
impl<'a> From<&'a str> for Input<'a> {
	fn from(path: &'a str) -> Self {
		Self::Path(Path::new(path))
	}
}

/// A pixel in the 8-bit HSV convention: hue in `0..=179` (degrees halved), saturation and value in `0..=255`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv8 {
	/// Hue
	pub h: u8,
	/// Saturation
	pub s: u8,
	/// Value
	pub v: u8,
}

/// A pixel in full range BT.601 luma/chroma with chroma offset by 128
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YCrCb8 {
	/// Luma
	pub y: u8,
	/// Red-difference chroma
	pub cr: u8,
	/// Blue-difference chroma
	pub cb: u8,
}

/// A decoded image together with its per pixel HSV and luma/chroma representations
#[derive(Debug, Clone)]
pub struct ColorPlanes {
	/// The image in RGB
	pub rgb: RgbImage,
	/// HSV pixels in row-major order
	pub hsv: Vec<Hsv8>,
	/// Luma/chroma pixels in row-major order
	pub ycrcb: Vec<YCrCb8>,
}

impl ColorPlanes {
	/// Derive both auxiliary color spaces for an RGB image
	///
	/// # Errors
	/// Returns [`Error::EmptyImage`] if the image has a zero width or height.
	pub fn new(rgb: RgbImage) -> Result<Self> {
		let (width, height) = rgb.dimensions();
		if width == 0 || height == 0 {
			return Err(Error::EmptyImage { width, height });
		}

		let pixels = srgb_pixels(&rgb);
		let hsv = pixels.iter().map(|&srgb| srgb_to_hsv8(srgb)).collect();
		let ycrcb = pixels.iter().map(|&srgb| srgb_to_ycrcb8(srgb)).collect();

		Ok(Self { rgb, hsv, ycrcb })
	}

	/// Width and height of the image
	#[must_use]
	pub fn dimensions(&self) -> (u32, u32) {
		self.rgb.dimensions()
	}

	/// The RGB pixels in row-major order
	#[must_use]
	pub fn pixels(&self) -> &[Srgb<u8>] {
		srgb_pixels(&self.rgb)
	}
}

/// View the raw buffer of an [`RgbImage`] as Srgb colors
fn srgb_pixels(image: &RgbImage) -> &[Srgb<u8>] {
	palette::cast::from_component_slice(image.as_raw())
}

/// Decode the input into an image
///
/// # Errors
/// Returns [`Error::Decode`] if the bytes or file are not a recognizable image.
pub fn decode(input: Input) -> Result<DynamicImage> {
	let image = match input {
		Input::Bytes(bytes) => image::load_from_memory(bytes)?,
		Input::Path(path) => image::open(path)?,
	};
	Ok(image)
}

/// Create a thumbnail with at most `max_pixels` pixels if the image has more than `max_pixels` pixels
#[must_use]
pub fn thumbnail(image: DynamicImage, max_pixels: u32) -> DynamicImage {
	// The number of pixels should be < u64::MAX, since image dimensions are (u32, u32)
	let (width, height) = image.dimensions();
	let pixels = u64::from(width) * u64::from(height);
	if pixels <= u64::from(max_pixels) {
		image
	} else {
		#[allow(clippy::cast_precision_loss)]
		let scale = (f64::from(max_pixels) / pixels as f64).sqrt();

		// multiplying by a positive factor < 1
		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
		let (thumb_width, thumb_height) = (
			((f64::from(width) * scale) as u32).max(1),
			((f64::from(height) * scale) as u32).max(1),
		);

		tracing::debug!("creating a thumbnail with dimensions {thumb_width}x{thumb_height}");
		image.thumbnail(thumb_width, thumb_height)
	}
}

/// Round a channel value and clamp it into the 8-bit range
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f32) -> u8 {
	value.round().clamp(0.0, 255.0) as u8
}

/// Convert an Srgb color to the 8-bit HSV convention
#[must_use]
pub fn srgb_to_hsv8(srgb: Srgb<u8>) -> Hsv8 {
	let hsv: Hsv = Hsv::from_color(srgb.into_format::<f32>());
	Hsv8 {
		h: to_channel(hsv.hue.into_positive_degrees() / 2.0),
		s: to_channel(hsv.saturation * 255.0),
		v: to_channel(hsv.value * 255.0),
	}
}

/// Convert an Srgb color to full range BT.601 luma/chroma
#[must_use]
pub fn srgb_to_ycrcb8(srgb: Srgb<u8>) -> YCrCb8 {
	let r = f32::from(srgb.red);
	let g = f32::from(srgb.green);
	let b = f32::from(srgb.blue);

	let y = 0.299 * r + 0.587 * g + 0.114 * b;
	YCrCb8 {
		y: to_channel(y),
		cr: to_channel((r - y) * 0.713 + 128.0),
		cb: to_channel((b - y) * 0.564 + 128.0),
	}
}
