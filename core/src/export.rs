pub mod crop;
pub mod index;
pub mod json;

use color_eyre::eyre::{bail, Result, WrapErr};
use std::{fs, path::Path};

/// Makes sure `dir` exists and is a directory.
pub fn ensure_dir(dir: &Path) -> Result<()> {
	if dir.exists() && !dir.is_dir() {
		bail!("output path {} exists but is not a directory", dir.display());
	}
	fs::create_dir_all(dir)
		.wrap_err_with(|| format!("failed to create output directory {}", dir.display()))
}
