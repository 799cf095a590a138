use crate::region::Region;
use color_eyre::eyre::{bail, ContextCompat, Result, WrapErr};
use opencv::{
	core::{Mat, Vector},
	imgcodecs,
	prelude::*,
};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CropReport {
	pub written: usize,
	pub skipped: usize,
}

fn crop_path(dir: &Path, name: &str, index: usize) -> PathBuf {
	dir.join(format!("{name}_{index}.jpg"))
}

fn write_crop(image: &Mat, region: Region, path: &Path) -> Result<()> {
	let (cols, rows) = (image.cols(), image.rows());
	let fits = |start: i32, extent: i32, limit: i32| {
		start >= 0 && extent > 0 && start.checked_add(extent).is_some_and(|end| end <= limit)
	};
	if !fits(region.x, region.width, cols) || !fits(region.y, region.height, rows) {
		bail!("crop {region:?} falls outside the {cols}x{rows} image");
	}
	let crop =
		Mat::roi(image, region.into()).wrap_err_with(|| format!("invalid roi: {region:?}"))?;
	let path_str = path
		.to_str()
		.wrap_err("invalid path cannot be represented as a str")?;
	if !imgcodecs::imwrite(path_str, &crop, &Vector::new())
		.wrap_err_with(|| format!("failed to encode crop to {}", path.display()))?
	{
		bail!("opencv refused to write crop to {}", path.display());
	}
	Ok(())
}

/// Writes every region of `image` as `<dir>/<name>_<index>.jpg`, with the
/// index counting from 0. Crops that fail are logged and skipped.
pub fn write_crops(
	image: &Mat,
	regions: &[Region],
	dir: &Path,
	name: &str,
) -> Result<CropReport> {
	super::ensure_dir(dir)?;
	let mut report = CropReport::default();
	for (index, region) in regions.iter().copied().enumerate() {
		let path = crop_path(dir, name, index);
		match write_crop(image, region, &path) {
			Ok(()) => report.written += 1,
			Err(err) => {
				warn!("skipping crop #{index} of {name}: {err:#}");
				report.skipped += 1;
			}
		}
	}
	Ok(report)
}

#[cfg(test)]
mod tests {
	use super::*;
	use opencv::core::{Scalar, Size, CV_8UC3};

	#[test]
	fn test_out_of_bounds_crop_is_skipped() {
		let dir = tempfile::tempdir().unwrap();
		let image =
			Mat::new_rows_cols_with_default(200, 400, CV_8UC3, Scalar::new(10.0, 200.0, 90.0, 0.0))
				.unwrap();
		let regions = [
			Region::new(40, 20, 80, 40),
			Region::new(380, 0, 80, 40),
			Region::new(0, 0, 400, 200),
		];

		let report = write_crops(&image, &regions, dir.path(), "img").unwrap();
		assert_eq!(report, CropReport { written: 2, skipped: 1 });

		assert!(crop_path(dir.path(), "img", 0).is_file());
		assert!(!crop_path(dir.path(), "img", 1).exists());
		assert!(crop_path(dir.path(), "img", 2).is_file());

		let first = imgcodecs::imread(
			crop_path(dir.path(), "img", 0).to_str().unwrap(),
			imgcodecs::IMREAD_COLOR,
		)
		.unwrap();
		assert_eq!(first.size().unwrap(), Size::new(80, 40));
	}

	#[test]
	fn test_overflowing_region_is_skipped() {
		let dir = tempfile::tempdir().unwrap();
		let image =
			Mat::new_rows_cols_with_default(10, 10, CV_8UC3, Scalar::all(0.0)).unwrap();
		let regions = [
			Region::new(i32::MAX - 1, 0, i32::MAX, 5),
			Region::new(0, 5, 5, i32::MAX),
			Region::new(0, 0, 5, 5),
		];
		let report = write_crops(&image, &regions, dir.path(), "x").unwrap();
		assert_eq!(report, CropReport { written: 1, skipped: 2 });
		assert!(crop_path(dir.path(), "x", 2).is_file());
	}

	#[test]
	fn test_empty_region_is_skipped() {
		let dir = tempfile::tempdir().unwrap();
		let image =
			Mat::new_rows_cols_with_default(10, 10, CV_8UC3, Scalar::all(0.0)).unwrap();
		let report = write_crops(&image, &[Region::new(0, 0, 0, 5)], dir.path(), "x").unwrap();
		assert_eq!(report, CropReport { written: 0, skipped: 1 });
	}
}
