use color_eyre::eyre::{bail, Result, WrapErr};
use serde::Serialize;
use std::{
	fs::{self, File, OpenOptions},
	io::{self, Write},
	path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexCoordinates {
	/// Pixels on the original image.
	#[default]
	Absolute,
	/// Fractions of the image's width and height.
	Relative,
}

/// Appends one `<image path>\t<json rectangles>` line per image to a file
/// that did not exist before the run started.
#[derive(Debug)]
pub struct IndexWriter {
	path: PathBuf,
	file: File,
	lines: usize,
}

impl IndexWriter {
	pub fn create(path: &Path) -> Result<Self> {
		if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
			fs::create_dir_all(parent).wrap_err_with(|| {
				format!("failed to create directory for index file {}", path.display())
			})?;
		}
		let file = match OpenOptions::new().append(true).create_new(true).open(path) {
			Ok(file) => file,
			Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
				bail!("index file {} already exists, refusing to append to it", path.display())
			}
			Err(err) => {
				return Err(err)
					.wrap_err_with(|| format!("failed to create index file {}", path.display()))
			}
		};
		Ok(Self {
			path: path.to_path_buf(),
			file,
			lines: 0,
		})
	}

	#[inline]
	pub fn path(&self) -> &Path {
		&self.path
	}

	#[inline]
	pub fn lines(&self) -> usize {
		self.lines
	}

	pub fn append<T: Serialize>(&mut self, image: &Path, rects: &[T]) -> Result<()> {
		let rects = serde_json::to_string(rects)
			.wrap_err_with(|| format!("failed to serialize rectangles for {}", image.display()))?;
		let line = format!("{}\t{}\n", image.display(), rects);
		self.file
			.write_all(line.as_bytes())
			.and_then(|_| self.file.flush())
			.wrap_err_with(|| format!("failed to append to index file {}", self.path.display()))?;
		self.lines += 1;
		Ok(())
	}

	/// Flushes everything to disk. Dropping the writer closes the file too,
	/// this just surfaces any error.
	pub fn finish(mut self) -> Result<()> {
		self.file
			.flush()
			.and_then(|_| self.file.sync_all())
			.wrap_err_with(|| format!("failed to finish index file {}", self.path.display()))
	}
}
