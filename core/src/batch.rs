use crate::{
	config::RunConfig,
	export::{
		self,
		crop::{self, CropReport},
		index::{IndexCoordinates, IndexWriter},
		json,
	},
	images::{self, ImageEntry},
	normalize::{self, NormalizedRegions},
	region::{ImageProposals, Region},
	resize,
	segment::Segmenter,
};
use color_eyre::eyre::{bail, Result, WrapErr};
use opencv::{
	core::{Mat, Size},
	prelude::*,
};
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
	Processed { proposals: usize, crops: CropReport },
	Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
	pub processed: usize,
	pub skipped: usize,
	pub proposals: usize,
	pub crops_written: usize,
	pub crops_skipped: usize,
}

struct Segmented {
	original: Mat,
	original_size: Size,
	resized_size: Size,
	regions: Vec<Region>,
}

/// A run over every image below the images directory. Owns the index file,
/// if any, for as long as the run lasts.
pub struct Batch {
	config: RunConfig,
	index: Option<(IndexWriter, IndexCoordinates)>,
	summary: BatchSummary,
}

impl Batch {
	/// Validates the configuration and sets up every output, returning the
	/// images to process in order. Nothing is processed yet.
	pub fn prepare(config: RunConfig) -> Result<(Self, Vec<ImageEntry>)> {
		if !config.images_dir.is_dir() {
			bail!(
				"images directory {} does not exist or is not a directory",
				config.images_dir.display()
			);
		}
		if let Some(target) = &config.index {
			if target.path.exists() {
				bail!(
					"index file {} already exists, refusing to mix runs",
					target.path.display()
				);
			}
		}

		let images = images::discover(&config.images_dir).wrap_err_with(|| {
			format!("failed to find images in {}", config.images_dir.display())
		})?;

		for dir in [&config.output_dir_json, &config.output_dir_crop]
			.into_iter()
			.flatten()
		{
			export::ensure_dir(dir)?;
		}
		let index = match &config.index {
			Some(target) => Some((IndexWriter::create(&target.path)?, target.coordinates)),
			None => None,
		};

		Ok((
			Self {
				config,
				index,
				summary: BatchSummary::default(),
			},
			images,
		))
	}

	#[inline]
	pub fn config(&self) -> &RunConfig {
		&self.config
	}

	#[inline]
	pub fn summary(&self) -> &BatchSummary {
		&self.summary
	}

	fn segment<S>(&self, segmenter: &mut S, image: &ImageEntry) -> Result<Segmented>
	where
		S: Segmenter + ?Sized,
	{
		let original = images::load_image(image.path())?;
		let original_size = original.size().wrap_err("failed to get image size")?;
		let resized = resize::resize_to_max_side(&original, self.config.max_side)?;
		let resized_size = resized.size().wrap_err("failed to get resized image size")?;
		let regions = segmenter
			.segment(&resized, self.config.mode)
			.wrap_err("segmentation failed")?;
		Ok(Segmented {
			original,
			original_size,
			resized_size,
			regions,
		})
	}

	/// Runs one image through the pipeline. Images that cannot be loaded or
	/// segmented are logged and skipped; failing to write the outputs is an
	/// error.
	pub fn process<S>(&mut self, segmenter: &mut S, image: &ImageEntry) -> Result<ImageOutcome>
	where
		S: Segmenter + ?Sized,
	{
		let relative_path = image.relative_path();
		let segmented = match self.segment(segmenter, image) {
			Ok(segmented) => segmented,
			Err(err) => {
				error!("skipping {}: {err:#}", relative_path.display());
				self.summary.skipped += 1;
				return Ok(ImageOutcome::Skipped);
			}
		};

		let NormalizedRegions { relative, absolute } = normalize::normalize(
			&segmented.regions,
			segmented.resized_size,
			segmented.original_size,
			self.config.min_size,
			self.config.max_regions,
		);
		debug!(
			"{}: {} regions found, {} accepted",
			relative_path.display(),
			segmented.regions.len(),
			relative.len()
		);
		let proposals = ImageProposals::new(image.name(), relative);

		if let Some(dir) = &self.config.output_dir_json {
			json::write_proposals(&dir.join(image.subpath()), &proposals).wrap_err_with(|| {
				format!("failed to export json proposals for {}", relative_path.display())
			})?;
		}

		if let Some((writer, coordinates)) = &mut self.index {
			let appended = match coordinates {
				IndexCoordinates::Relative => writer.append(&relative_path, proposals.proposals()),
				IndexCoordinates::Absolute => writer.append(&relative_path, &absolute),
			};
			appended?;
		}

		let crops = match &self.config.output_dir_crop {
			Some(dir) => crop::write_crops(
				&segmented.original,
				&absolute,
				&dir.join(image.subpath()),
				image.name(),
			)
			.wrap_err_with(|| format!("failed to export crops for {}", relative_path.display()))?,
			None => CropReport::default(),
		};

		self.summary.processed += 1;
		self.summary.proposals += absolute.len();
		self.summary.crops_written += crops.written;
		self.summary.crops_skipped += crops.skipped;
		Ok(ImageOutcome::Processed {
			proposals: absolute.len(),
			crops,
		})
	}

	pub fn finish(self) -> Result<BatchSummary> {
		if let Some((writer, _)) = self.index {
			writer.finish()?;
		}
		Ok(self.summary)
	}
}

pub fn run<S>(config: RunConfig, segmenter: &mut S) -> Result<BatchSummary>
where
	S: Segmenter + ?Sized,
{
	let (mut batch, images) = Batch::prepare(config)?;
	for image in &images {
		batch.process(segmenter, image)?;
	}
	batch.finish()
}
