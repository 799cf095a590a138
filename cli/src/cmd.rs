use clap::Parser;
use region_proposals_core::{
	config::{DEFAULT_MAX_REGIONS, DEFAULT_MAX_SIDE, DEFAULT_MIN_SIZE},
	export::index::IndexCoordinates,
	IndexTarget, RunConfig, SearchMode, SearchParams,
};
use std::path::PathBuf;

/// Export selective search region proposals for a directory of images.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
	/// Folder containing the input images, or subfolders of them.
	#[arg(long = "imagesDir")]
	pub images_dir: PathBuf,
	/// Images are shrunk so their longer side is at most this before segmentation.
	#[arg(
		long = "maxSide",
		default_value_t = DEFAULT_MAX_SIDE,
		value_parser = clap::value_parser!(i32).range(1..)
	)]
	pub max_side: i32,
	/// Use the slow but high recall selective search strategy.
	#[arg(long)]
	pub quality: bool,
	/// File to write one line of bounding boxes per image to. Must not exist yet.
	#[arg(long = "outputIndexFile")]
	pub output_index_file: Option<PathBuf>,
	/// Write relative coordinates to the index file instead of pixels.
	#[arg(short = 'r', long = "relativeCoordIndexFile")]
	pub relative_coord_index_file: bool,
	/// Folder to write one JSON file of proposals per image to.
	#[arg(long = "outputDirJson", visible_alias = "outputDirJSON")]
	pub output_dir_json: Option<PathBuf>,
	/// Folder to write the proposal crops to.
	#[arg(long = "outputDirCrop")]
	pub output_dir_crop: Option<PathBuf>,
	/// Maximum number of regions to export per image.
	#[arg(long = "maxRegions", default_value_t = DEFAULT_MAX_REGIONS)]
	pub max_regions: usize,
	/// Minimum side, in pixels of the resized image, a region needs to be kept.
	#[arg(
		long = "minSize",
		default_value_t = DEFAULT_MIN_SIZE,
		value_parser = clap::value_parser!(i32).range(0..)
	)]
	pub min_size: i32,
	/// How many threads OpenCV may use.
	#[arg(short = 'j', long, default_value_t = 4)]
	pub threads: i32,
	/// Initial graph segmentation k.
	#[arg(long = "baseK", default_value_t = SearchParams::default().base_k)]
	pub base_k: i32,
	/// Graph segmentation k increment between strategies.
	#[arg(long = "incK", default_value_t = SearchParams::default().inc_k)]
	pub inc_k: i32,
	/// Gaussian sigma of the graph segmentation.
	#[arg(long, default_value_t = SearchParams::default().sigma)]
	pub sigma: f32,
	/// Log every image.
	#[arg(short, long)]
	pub verbose: bool,
}

impl CliArgs {
	pub fn search_params(&self) -> SearchParams {
		SearchParams {
			base_k: self.base_k,
			inc_k: self.inc_k,
			sigma: self.sigma,
		}
	}

	pub fn run_config(&self) -> RunConfig {
		RunConfig {
			images_dir: self.images_dir.clone(),
			max_side: self.max_side,
			mode: if self.quality {
				SearchMode::Quality
			} else {
				SearchMode::Fast
			},
			min_size: self.min_size,
			max_regions: self.max_regions,
			output_dir_json: self.output_dir_json.clone(),
			output_dir_crop: self.output_dir_crop.clone(),
			index: self.output_index_file.clone().map(|path| IndexTarget {
				path,
				coordinates: if self.relative_coord_index_file {
					IndexCoordinates::Relative
				} else {
					IndexCoordinates::Absolute
				},
			}),
		}
	}
}
