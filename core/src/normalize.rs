use crate::region::{Proposal, Region};
use opencv::core::Size;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRegions {
	pub relative: Vec<Proposal>,
	pub absolute: Vec<Region>,
}

impl NormalizedRegions {
	#[inline]
	pub fn len(&self) -> usize {
		self.relative.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.relative.is_empty()
	}
}

/// Keeps regions at least `min_size` pixels on both sides, in the order they
/// were produced, up to `max_regions` of them.
pub fn accept_regions(regions: &[Region], min_size: i32, max_regions: usize) -> Vec<Region> {
	regions
		.iter()
		.copied()
		.filter(|region| region.width > 0 && region.height > 0)
		.filter(|region| region.width >= min_size && region.height >= min_size)
		.take(max_regions)
		.collect()
}

fn ratio(value: i32, extent: i32) -> f64 {
	f64::from(value) / f64::from(extent)
}

fn clamp_offset(value: f64) -> f64 {
	debug_assert!(
		(0.0..1.0).contains(&value),
		"relative offset {value} outside of [0, 1)"
	);
	value.clamp(0.0, 1.0)
}

fn clamp_extent(value: f64) -> f64 {
	debug_assert!(
		value > 0.0 && value <= 1.0,
		"relative extent {value} outside of (0, 1]"
	);
	value.clamp(f64::MIN_POSITIVE, 1.0)
}

pub fn to_relative(region: Region, resized: Size) -> Proposal {
	Proposal::new(
		clamp_offset(ratio(region.x, resized.width)),
		clamp_offset(ratio(region.y, resized.height)),
		clamp_extent(ratio(region.width, resized.width)),
		clamp_extent(ratio(region.height, resized.height)),
	)
}

pub fn to_absolute(region: Region, resized: Size, original: Size) -> Region {
	let rescale = |value: i32, from: i32, to: i32| {
		(f64::from(value) * f64::from(to) / f64::from(from)).round() as i32
	};
	Region::new(
		rescale(region.x, resized.width, original.width),
		rescale(region.y, resized.height, original.height),
		rescale(region.width, resized.width, original.width),
		rescale(region.height, resized.height, original.height),
	)
}

pub fn normalize(
	regions: &[Region],
	resized: Size,
	original: Size,
	min_size: i32,
	max_regions: usize,
) -> NormalizedRegions {
	let accepted = accept_regions(regions, min_size, max_regions);
	NormalizedRegions {
		relative: accepted
			.iter()
			.map(|region| to_relative(*region, resized))
			.collect(),
		absolute: accepted
			.iter()
			.map(|region| to_absolute(*region, resized, original))
			.collect(),
	}
}
