use color_eyre::eyre::{Result, WrapErr};
use opencv::{
	core::{Mat, Size},
	imgproc::{self, INTER_AREA},
	prelude::*,
};

/// Computes the size an image should be scaled to so that its longer side
/// is at most `max_side`. Sizes already within bounds are returned as-is.
pub fn target_size(original: Size, max_side: i32) -> Size {
	let longer = original.width.max(original.height);
	if longer <= max_side {
		return original;
	}
	let scale = |side: i32| {
		((f64::from(side) * f64::from(max_side) / f64::from(longer)).round() as i32).max(1)
	};
	if original.width >= original.height {
		Size::new(max_side, scale(original.height))
	} else {
		Size::new(scale(original.width), max_side)
	}
}

pub fn resize_to_max_side(image: &Mat, max_side: i32) -> Result<Mat> {
	let original = image.size().wrap_err("failed to get image size")?;
	let target = target_size(original, max_side);
	if target == original {
		return image.try_clone().wrap_err("failed to copy image");
	}
	let mut resized = Mat::default();
	imgproc::resize(image, &mut resized, target, 0.0, 0.0, INTER_AREA).wrap_err_with(|| {
		format!(
			"failed to resize image from {}x{} to {}x{}",
			original.width, original.height, target.width, target.height
		)
	})?;
	Ok(resized)
}
