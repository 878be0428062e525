use criterion::{
	black_box, criterion_group, criterion_main, measurement::WallTime, BenchmarkGroup, BenchmarkId, Criterion,
	SamplingMode,
};
use image::{DynamicImage, Rgb, RgbImage};
use skintone::{convert::ColorPlanes, dominant, mask, Brightest, Options};
use std::time::Duration;

const SIZES: [(u32, u32); 3] = [(320, 240), (1280, 720), (1920, 1080)];

/// A noisy skin gradient with a blue border, roughly the mix of a cropped portrait
#[allow(clippy::cast_possible_truncation)]
fn synthetic_portrait(width: u32, height: u32) -> RgbImage {
	RgbImage::from_fn(width, height, |x, y| {
		let border = x < width / 8 || x >= width - width / 8 || y < height / 8;
		if border {
			Rgb([30, 60, 200])
		} else {
			let shade = ((x * 7 + y * 13) % 60) as u8;
			Rgb([150 + shade, 110 + shade, 85 + shade / 2])
		}
	})
}

fn create_group<'a>(c: &'a mut Criterion, name: &'a str) -> BenchmarkGroup<'a, WallTime> {
	let mut group = c.benchmark_group(name);
	group
		.sample_size(30)
		.noise_threshold(0.05)
		.sampling_mode(SamplingMode::Flat)
		.warm_up_time(Duration::from_millis(500));
	group
}

fn conversion(c: &mut Criterion) {
	let mut group = create_group(c, "conversion");

	for (width, height) in SIZES {
		let image = synthetic_portrait(width, height);
		group.bench_with_input(BenchmarkId::from_parameter(format!("{width}x{height}")), &image, |b, image| {
			b.iter(|| ColorPlanes::new(black_box(image.clone())).expect("non-empty image"));
		});
	}
}

fn masking(c: &mut Criterion) {
	let mut group = create_group(c, "masking");

	for (width, height) in SIZES {
		let planes = ColorPlanes::new(synthetic_portrait(width, height)).expect("non-empty image");
		group.bench_with_input(BenchmarkId::from_parameter(format!("{width}x{height}")), &planes, |b, planes| {
			b.iter(|| mask::skin_pixels(black_box(planes)).expect("enough skin"));
		});
	}
}

fn clustering(c: &mut Criterion) {
	let mut group = create_group(c, "clustering");
	group.measurement_time(Duration::from_secs(4));

	for (width, height) in SIZES {
		let planes = ColorPlanes::new(synthetic_portrait(width, height)).expect("non-empty image");
		let (_, skin) = mask::skin_pixels(&planes).expect("enough skin");

		for trials in [1, 4] {
			let options = Options { trials, ..Options::default() };
			group.bench_with_input(
				BenchmarkId::new(format!("{trials} trials"), format!("{width}x{height}")),
				&skin,
				|b, skin| {
					b.iter(|| dominant::dominant_color::<Brightest>(black_box(skin), &options).expect("clusters"));
				},
			);
		}
	}
}

fn all_steps(c: &mut Criterion) {
	let mut group = create_group(c, "all steps");
	group.measurement_time(Duration::from_secs(8));

	for (width, height) in SIZES {
		let image = DynamicImage::ImageRgb8(synthetic_portrait(width, height));
		group.bench_with_input(BenchmarkId::from_parameter(format!("{width}x{height}")), &image, |b, image| {
			b.iter(|| {
				skintone::analyze_image::<Brightest>(black_box(image.clone()), &Options::default())
					.expect("skin detected")
			});
		});
	}
}

criterion_group!(benches, conversion, masking, clustering, all_steps);
criterion_main!(benches);
