use crate::region::Region;
use color_eyre::eyre::{Result, WrapErr};
use opencv::{
	core::{self, Mat, Rect, Vector},
	prelude::*,
	ximgproc,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
	/// Fast, but with a lower recall.
	#[default]
	Fast,
	/// Slow, but with a much higher recall.
	Quality,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
	pub base_k: i32,
	pub inc_k: i32,
	pub sigma: f32,
}

impl Default for SearchParams {
	fn default() -> Self {
		Self {
			base_k: 150,
			inc_k: 150,
			sigma: 0.8,
		}
	}
}

/// Anything that can turn an image into candidate rectangles.
///
/// Rectangles are in the pixel space of the image passed in, in whatever
/// order the underlying algorithm produces them.
pub trait Segmenter {
	fn segment(&mut self, image: &Mat, mode: SearchMode) -> Result<Vec<Region>>;
}

impl<F> Segmenter for F
where
	F: FnMut(&Mat, SearchMode) -> Result<Vec<Region>>,
{
	fn segment(&mut self, image: &Mat, mode: SearchMode) -> Result<Vec<Region>> {
		self(image, mode)
	}
}

/// OpenCV's `ximgproc` selective search segmentation.
#[derive(Debug, Clone, Default)]
pub struct SelectiveSearch {
	params: SearchParams,
}

impl SelectiveSearch {
	pub fn new(params: SearchParams) -> Self {
		Self { params }
	}

	/// Sets how many threads OpenCV may use internally.
	pub fn set_threads(threads: i32) -> Result<()> {
		core::set_use_optimized(true).wrap_err("failed to enable opencv optimizations")?;
		core::set_num_threads(threads)
			.wrap_err_with(|| format!("failed to set opencv thread count to {threads}"))
	}
}

impl Segmenter for SelectiveSearch {
	fn segment(&mut self, image: &Mat, mode: SearchMode) -> Result<Vec<Region>> {
		let SearchParams {
			base_k,
			inc_k,
			sigma,
		} = self.params;
		let mut search = ximgproc::create_selective_search_segmentation()
			.wrap_err("failed to create selective search segmentation")?;
		search
			.set_base_image(image)
			.wrap_err("failed to set base image for selective search")?;
		let switched = match mode {
			SearchMode::Fast => search.switch_to_selective_search_fast(base_k, inc_k, sigma),
			SearchMode::Quality => search.switch_to_selective_search_quality(base_k, inc_k, sigma),
		};
		switched.wrap_err_with(|| format!("failed to switch selective search to {mode:?} mode"))?;
		let mut rects = Vector::<Rect>::new();
		search
			.process(&mut rects)
			.wrap_err("selective search segmentation failed")?;
		Ok(rects.iter().map(Region::from).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use color_eyre::eyre::eyre;

	#[test]
	fn test_closures_are_segmenters() {
		let mut calls = Vec::new();
		let mut stub = |_: &Mat, mode: SearchMode| -> Result<Vec<Region>> {
			calls.push(mode);
			Ok(vec![Region::new(0, 0, 10, 10)])
		};
		let image = Mat::default();
		assert_eq!(
			stub.segment(&image, SearchMode::Quality).unwrap(),
			vec![Region::new(0, 0, 10, 10)]
		);
		drop(stub);
		assert_eq!(calls, vec![SearchMode::Quality]);
	}

	#[test]
	fn test_selective_search_stays_inside_image() {
		use opencv::core::{Scalar, CV_8UC3};

		let image =
			Mat::new_rows_cols_with_default(60, 80, CV_8UC3, Scalar::new(20.0, 20.0, 20.0, 0.0))
				.unwrap();
		let mut right = Mat::roi(&image, Rect::new(40, 0, 40, 60)).unwrap();
		right
			.set_to(&Scalar::new(0.0, 200.0, 255.0, 0.0), &core::no_array())
			.unwrap();
		drop(right);

		let mut search = SelectiveSearch::default();
		for mode in [SearchMode::Fast, SearchMode::Quality] {
			let regions = search.segment(&image, mode).unwrap();
			assert!(!regions.is_empty(), "{mode:?} found nothing");
			for region in regions {
				assert!(region.x >= 0 && region.y >= 0, "{region:?}");
				assert!(region.width > 0 && region.height > 0, "{region:?}");
				assert!(region.x + region.width <= 80, "{region:?}");
				assert!(region.y + region.height <= 60, "{region:?}");
			}
		}
	}

	#[test]
	fn test_segmenter_errors_propagate() {
		let mut failing = |_: &Mat, _: SearchMode| -> Result<Vec<Region>> { Err(eyre!("boom")) };
		assert!(failing.segment(&Mat::default(), SearchMode::Fast).is_err());
	}
}
