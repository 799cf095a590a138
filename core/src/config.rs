use crate::{export::index::IndexCoordinates, segment::SearchMode};
use std::path::PathBuf;

pub const DEFAULT_MAX_SIDE: i32 = 300;
pub const DEFAULT_MAX_REGIONS: usize = 1000;
pub const DEFAULT_MIN_SIZE: i32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTarget {
	pub path: PathBuf,
	pub coordinates: IndexCoordinates,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
	pub images_dir: PathBuf,
	/// Images are shrunk so their longer side is at most this many pixels
	/// before segmentation.
	pub max_side: i32,
	pub mode: SearchMode,
	/// Regions narrower or shorter than this (on the resized image) are dropped.
	pub min_size: i32,
	pub max_regions: usize,
	pub output_dir_json: Option<PathBuf>,
	pub output_dir_crop: Option<PathBuf>,
	pub index: Option<IndexTarget>,
}

impl RunConfig {
	pub fn new(images_dir: impl Into<PathBuf>) -> Self {
		Self {
			images_dir: images_dir.into(),
			max_side: DEFAULT_MAX_SIDE,
			mode: SearchMode::default(),
			min_size: DEFAULT_MIN_SIZE,
			max_regions: DEFAULT_MAX_REGIONS,
			output_dir_json: None,
			output_dir_crop: None,
			index: None,
		}
	}

	pub fn has_outputs(&self) -> bool {
		self.output_dir_json.is_some() || self.output_dir_crop.is_some() || self.index.is_some()
	}
}
