use crate::region::ImageProposals;
use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer};
use std::{
	fs::File,
	io::{BufWriter, Write},
	path::{Path, PathBuf},
};

const INDENT: &[u8] = b"    ";

/// Writes `<dir>/<image>.json`, returning the path written to.
pub fn write_proposals(dir: &Path, proposals: &ImageProposals) -> Result<PathBuf> {
	super::ensure_dir(dir)?;
	let path = dir.join(format!("{}.json", proposals.image()));
	let file = File::create(&path)
		.wrap_err_with(|| format!("failed to create json file at {}", path.display()))?;
	let mut writer = BufWriter::new(file);
	let mut serializer =
		Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
	proposals
		.serialize(&mut serializer)
		.wrap_err_with(|| format!("failed to serialize proposals to {}", path.display()))?;
	writer
		.flush()
		.wrap_err_with(|| format!("failed to write json file at {}", path.display()))?;
	Ok(path)
}
