use crate::cmd::CliArgs;
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{HumanCount, ProgressBar, ProgressState, ProgressStyle};
use region_proposals_core::{Batch, ImageOutcome, SelectiveSearch};
use std::fmt::Write;
use tracing::{debug, info, warn};

fn progress_bar(total: u64) -> Result<ProgressBar> {
	let style = ProgressStyle::with_template(
		"[{elapsed}] {wide_bar:.green/red} {pos}/{len} images ({per_sec}, ETA: {eta})",
	)
	.wrap_err("invalid progress bar template")?
	.with_key("pos", |state: &ProgressState, w: &mut dyn Write| {
		let _ = write!(w, "{}", HumanCount(state.pos()));
	})
	.with_key("len", |state: &ProgressState, w: &mut dyn Write| {
		let _ = write!(w, "{}", HumanCount(state.len().unwrap_or_default()));
	})
	.with_key("per_sec", |state: &ProgressState, w: &mut dyn Write| {
		let _ = write!(w, "{:.1} img/s", state.per_sec());
	});
	Ok(ProgressBar::new(total).with_style(style))
}

pub fn propose(args: CliArgs) -> Result<()> {
	let config = args.run_config();
	info!("starting with {config:?}");
	if !config.has_outputs() {
		warn!("no output directory or index file given, proposals will only be counted");
	}

	SelectiveSearch::set_threads(args.threads)?;
	let mut segmenter = SelectiveSearch::new(args.search_params());

	let (mut batch, images) = Batch::prepare(config).wrap_err("failed to prepare batch")?;
	info!("found {} images", images.len());

	let progress = progress_bar(images.len() as u64)?;
	for image in &images {
		let outcome = batch.process(&mut segmenter, image)?;
		if let ImageOutcome::Processed { proposals, crops } = outcome {
			debug!(
				"{}: exported {} proposals, {} crops ({} skipped)",
				image.relative_path().display(),
				proposals,
				crops.written,
				crops.skipped
			);
		}
		progress.inc(1);
	}
	progress.finish();

	let summary = batch.finish().wrap_err("failed to finish batch")?;
	info!(
		"processed {} images ({} skipped), {} proposals, {} crops ({} skipped)",
		summary.processed,
		summary.skipped,
		summary.proposals,
		summary.crops_written,
		summary.crops_skipped
	);
	Ok(())
}
