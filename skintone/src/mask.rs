//! Classification of pixels as plausible skin using two independent color space windows.
//!
//! A pixel is skin only if it falls inside both the HSV window and the luma/chroma window.
//! Backgrounds like wood or beige fabric often pass one of the two but rarely both.

use crate::{
	convert::{ColorPlanes, Hsv8, YCrCb8},
	error::{Error, Result},
};
use palette::Srgb;
use std::ops::RangeInclusive;

/// Inclusive hue window (8-bit convention, degrees halved)
pub const SKIN_HUE: RangeInclusive<u8> = 0..=25;
/// Inclusive saturation window
pub const SKIN_SATURATION: RangeInclusive<u8> = 15..=255;
/// Inclusive value window
pub const SKIN_VALUE: RangeInclusive<u8> = 0..=255;

/// Inclusive luma window
pub const SKIN_LUMA: RangeInclusive<u8> = 0..=255;
/// Inclusive red-difference chroma window
pub const SKIN_CR: RangeInclusive<u8> = 133..=173;
/// Inclusive blue-difference chroma window
pub const SKIN_CB: RangeInclusive<u8> = 77..=127;

/// Samples with fewer skin pixels than this are rejected
pub const MIN_SKIN_PIXELS: usize = 50;

/// Whether an HSV pixel lies in the skin window
#[must_use]
pub fn is_skin_hsv(hsv: Hsv8) -> bool {
	SKIN_HUE.contains(&hsv.h) && SKIN_SATURATION.contains(&hsv.s) && SKIN_VALUE.contains(&hsv.v)
}

/// Whether a luma/chroma pixel lies in the skin window
#[must_use]
pub fn is_skin_ycrcb(ycrcb: YCrCb8) -> bool {
	SKIN_LUMA.contains(&ycrcb.y) && SKIN_CR.contains(&ycrcb.cr) && SKIN_CB.contains(&ycrcb.cb)
}

/// A boolean grid marking the pixels provisionally identified as skin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinMask {
	/// Width of the source image
	width: u32,
	/// Height of the source image
	height: u32,
	/// Row-major mask values
	bits: Vec<bool>,
}

impl SkinMask {
	/// Mask of the pixels inside the HSV skin window
	#[must_use]
	pub fn from_hsv(planes: &ColorPlanes) -> Self {
		Self::from_fn(planes, planes.hsv.iter().map(|&hsv| is_skin_hsv(hsv)))
	}

	/// Mask of the pixels inside the luma/chroma skin window
	#[must_use]
	pub fn from_ycrcb(planes: &ColorPlanes) -> Self {
		Self::from_fn(planes, planes.ycrcb.iter().map(|&ycrcb| is_skin_ycrcb(ycrcb)))
	}

	/// The intersection of both color space masks
	#[must_use]
	pub fn new(planes: &ColorPlanes) -> Self {
		Self::from_hsv(planes).and(&Self::from_ycrcb(planes))
	}

	/// Collect a mask with the dimensions of `planes`
	fn from_fn(planes: &ColorPlanes, bits: impl Iterator<Item = bool>) -> Self {
		let (width, height) = planes.dimensions();
		let bits = bits.collect::<Vec<_>>();
		debug_assert_eq!(bits.len() as u64, u64::from(width) * u64::from(height));
		Self { width, height, bits }
	}

	/// Pixel-wise logical AND of two masks with the same dimensions
	#[must_use]
	pub fn and(&self, other: &Self) -> Self {
		debug_assert_eq!((self.width, self.height), (other.width, other.height));
		Self {
			width: self.width,
			height: self.height,
			bits: self.bits.iter().zip(&other.bits).map(|(&a, &b)| a && b).collect(),
		}
	}

	/// Width and height of the mask
	#[must_use]
	pub const fn dimensions(&self) -> (u32, u32) {
		(self.width, self.height)
	}

	/// The number of pixels marked as skin
	#[must_use]
	pub fn count(&self) -> usize {
		self.bits.iter().filter(|&&bit| bit).count()
	}

	/// The colors of the marked pixels in row-major order
	#[must_use]
	pub fn select(&self, pixels: &[Srgb<u8>]) -> SkinPixelSet {
		let pixels = pixels
			.iter()
			.zip(&self.bits)
			.filter_map(|(&pixel, &bit)| bit.then_some(pixel))
			.collect();

		SkinPixelSet { pixels }
	}
}

/// The colors of all pixels marked as skin, without their positions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkinPixelSet {
	/// Skin colors in row-major order of the source image
	pixels: Vec<Srgb<u8>>,
}

impl SkinPixelSet {
	/// The skin colors
	#[must_use]
	pub fn pixels(&self) -> &[Srgb<u8>] {
		&self.pixels
	}

	/// The number of skin pixels
	#[must_use]
	pub fn len(&self) -> usize {
		self.pixels.len()
	}

	/// Whether there are no skin pixels
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.pixels.is_empty()
	}
}

/// Mask the image and collect the skin pixels, enforcing [`MIN_SKIN_PIXELS`]
///
/// # Errors
/// Returns [`Error::InsufficientSkinSample`] if fewer than [`MIN_SKIN_PIXELS`] pixels pass both masks.
pub fn skin_pixels(planes: &ColorPlanes) -> Result<(SkinMask, SkinPixelSet)> {
	let mask = SkinMask::new(planes);
	let skin = mask.select(planes.pixels());

	let (width, height) = mask.dimensions();
	tracing::debug!("{} pixels of the {width}x{height} image passed the skin masks", mask.count());

	if skin.len() < MIN_SKIN_PIXELS {
		Err(Error::InsufficientSkinSample { found: skin.len(), minimum: MIN_SKIN_PIXELS })
	} else {
		Ok((mask, skin))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::convert::{srgb_to_hsv8, srgb_to_ycrcb8};
	use image::{Rgb, RgbImage};

	const SKIN: Rgb<u8> = Rgb([180, 140, 110]);
	const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

	fn planes_with_skin(width: u32, height: u32, skin: u32) -> ColorPlanes {
		let image = RgbImage::from_fn(width, height, |x, y| if y * width + x < skin { SKIN } else { BLUE });
		ColorPlanes::new(image).expect("non-empty image")
	}

	#[test]
	fn skin_color_passes_both_windows() {
		let planes = planes_with_skin(2, 2, 4);
		assert_eq!(SkinMask::from_hsv(&planes).count(), 4);
		assert_eq!(SkinMask::from_ycrcb(&planes).count(), 4);
	}

	#[test]
	fn blue_fails_both_windows() {
		let planes = planes_with_skin(2, 2, 0);
		assert_eq!(SkinMask::from_hsv(&planes).count(), 0);
		assert_eq!(SkinMask::from_ycrcb(&planes).count(), 0);
	}

	#[test]
	fn mask_is_intersection() {
		// Saturated red passes HSV but its Cr is far above the window
		let red = Srgb::new(255, 0, 0);
		assert!(is_skin_hsv(srgb_to_hsv8(red)));
		assert!(!is_skin_ycrcb(srgb_to_ycrcb8(red)));

		let image = RgbImage::from_fn(2, 1, |x, _| if x == 0 { SKIN } else { Rgb([255, 0, 0]) });
		let planes = ColorPlanes::new(image).expect("non-empty image");
		let mask = SkinMask::new(&planes);

		assert_eq!(SkinMask::from_hsv(&planes).count(), 2);
		assert_eq!(SkinMask::from_ycrcb(&planes).count(), 1);
		assert_eq!(mask.count(), 1);
		assert_eq!(mask.select(planes.pixels()).pixels(), [Srgb::new(180, 140, 110)]);
	}

	#[test]
	fn window_bounds_are_inclusive() {
		assert!(is_skin_hsv(Hsv8 { h: 25, s: 15, v: 0 }));
		assert!(!is_skin_hsv(Hsv8 { h: 26, s: 15, v: 0 }));
		assert!(!is_skin_hsv(Hsv8 { h: 0, s: 14, v: 255 }));

		assert!(is_skin_ycrcb(YCrCb8 { y: 0, cr: 133, cb: 77 }));
		assert!(is_skin_ycrcb(YCrCb8 { y: 255, cr: 173, cb: 127 }));
		assert!(!is_skin_ycrcb(YCrCb8 { y: 128, cr: 132, cb: 100 }));
		assert!(!is_skin_ycrcb(YCrCb8 { y: 128, cr: 150, cb: 128 }));
	}

	#[test]
	fn select_keeps_row_major_order() {
		let image = RgbImage::from_fn(3, 2, |x, y| {
			if (x + y) % 2 == 0 {
				Rgb([180 + x as u8, 140, 110])
			} else {
				BLUE
			}
		});
		let planes = ColorPlanes::new(image).expect("non-empty image");
		let skin = SkinMask::new(&planes).select(planes.pixels());

		assert_eq!(
			skin.pixels(),
			[Srgb::new(180, 140, 110), Srgb::new(182, 140, 110), Srgb::new(181, 140, 110)]
		);
	}

	#[test]
	fn fewer_than_minimum_is_rejected() {
		let planes = planes_with_skin(10, 10, 49);
		assert!(matches!(
			skin_pixels(&planes),
			Err(Error::InsufficientSkinSample { found: 49, minimum: MIN_SKIN_PIXELS })
		));
	}

	#[test]
	fn exactly_minimum_is_accepted() {
		let planes = planes_with_skin(10, 10, 50);
		let (mask, skin) = skin_pixels(&planes).expect("enough skin");
		assert_eq!(mask.count(), 50);
		assert_eq!(skin.len(), 50);
		assert_eq!(mask.dimensions(), (10, 10));
	}
}
