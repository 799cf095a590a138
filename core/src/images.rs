use color_eyre::eyre::{bail, ContextCompat, Result, WrapErr};
use itertools::Itertools;
use opencv::{
	core::Mat,
	imgcodecs::{self, IMREAD_COLOR},
	prelude::*,
};
use std::{
	ffi::OsStr,
	path::{Path, PathBuf},
};
use tracing::warn;
use walkdir::WalkDir;

/// Extensions that are picked up, in the order they are processed.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An input image, located somewhere below the images directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
	path: PathBuf,
	subpath: PathBuf,
	name: String,
}

impl ImageEntry {
	fn new(path: PathBuf, subpath: PathBuf) -> Result<Self> {
		let name = path
			.file_stem()
			.and_then(OsStr::to_str)
			.wrap_err_with(|| format!("invalid image file name {}", path.display()))?
			.to_owned();
		Ok(Self {
			path,
			subpath,
			name,
		})
	}

	#[inline]
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// The subdirectory (relative to the images directory) the image lives in.
	/// Empty when the images directory has no subdirectories.
	#[inline]
	pub fn subpath(&self) -> &Path {
		&self.subpath
	}

	#[inline]
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn relative_path(&self) -> PathBuf {
		match self.path.file_name() {
			Some(file_name) => self.subpath.join(file_name),
			None => self.subpath.clone(),
		}
	}
}

fn file_name_key(path: &Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().to_lowercase())
		.unwrap_or_default()
}

/// Lists the direct subdirectories of `root`, relative to it and sorted by
/// name. If there are none, `root` itself is used with an empty subpath.
pub fn subdirectories(root: &Path) -> Result<Vec<PathBuf>> {
	let mut subpaths = Vec::new();
	for entry in WalkDir::new(root)
		.min_depth(1)
		.max_depth(1)
		.sort_by_file_name()
	{
		let entry = entry.wrap_err_with(|| format!("failed to read {}", root.display()))?;
		if entry.path().is_dir() {
			subpaths.push(PathBuf::from(entry.file_name()));
		}
	}
	if subpaths.is_empty() {
		subpaths.push(PathBuf::new());
	}
	Ok(subpaths)
}

/// Lists the images directly inside `root/subpath`: first every `jpg`, then
/// `jpeg`, then `png`, each group sorted case-insensitively by file name.
pub fn list_images(root: &Path, subpath: &Path) -> Result<Vec<ImageEntry>> {
	let dir = root.join(subpath);
	let files = WalkDir::new(&dir)
		.min_depth(1)
		.max_depth(1)
		.into_iter()
		.map(|entry| entry.wrap_err_with(|| format!("failed to read {}", dir.display())))
		.filter_ok(|entry| entry.path().is_file())
		.map_ok(walkdir::DirEntry::into_path)
		.collect::<Result<Vec<_>>>()?;

	let mut images = Vec::new();
	for extension in IMAGE_EXTENSIONS {
		for path in files
			.iter()
			.filter(|path| {
				path.extension()
					.and_then(OsStr::to_str)
					.is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
			})
			.sorted_by_key(|path| file_name_key(path))
		{
			match ImageEntry::new(path.clone(), subpath.to_path_buf()) {
				Ok(image) => images.push(image),
				Err(err) => warn!("skipping {}: {err:#}", path.display()),
			}
		}
	}
	Ok(images)
}

pub fn discover(root: &Path) -> Result<Vec<ImageEntry>> {
	let mut images = Vec::new();
	for subpath in subdirectories(root)? {
		images.extend(
			list_images(root, &subpath)
				.wrap_err_with(|| format!("failed to list images in {}", subpath.display()))?,
		);
	}
	Ok(images)
}

pub fn load_image(path: &Path) -> Result<Mat> {
	let path_str = path
		.to_str()
		.wrap_err("invalid path cannot be represented as a str")?;
	let image = imgcodecs::imread(path_str, IMREAD_COLOR)
		.wrap_err_with(|| format!("failed to read image from {}", path.display()))?;
	if image.rows() <= 0 || image.cols() <= 0 {
		bail!("opencv could not decode the image at {}", path.display());
	}
	Ok(image)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	fn touch(path: &Path) {
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(path, b"").unwrap();
	}

	#[test]
	fn test_flat_directory_is_its_own_subdirectory() {
		let dir = tempfile::tempdir().unwrap();
		touch(&dir.path().join("a.jpg"));
		assert_eq!(subdirectories(dir.path()).unwrap(), vec![PathBuf::new()]);
	}

	#[test]
	fn test_subdirectories_are_sorted() {
		let dir = tempfile::tempdir().unwrap();
		touch(&dir.path().join("b/x.jpg"));
		touch(&dir.path().join("a/y.jpg"));
		touch(&dir.path().join("root.jpg"));
		assert_eq!(
			subdirectories(dir.path()).unwrap(),
			vec![PathBuf::from("a"), PathBuf::from("b")]
		);

		let names = discover(dir.path())
			.unwrap()
			.into_iter()
			.map(|image| image.relative_path())
			.collect::<Vec<_>>();
		assert_eq!(names, vec![PathBuf::from("a/y.jpg"), PathBuf::from("b/x.jpg")]);
	}

	#[test]
	fn test_extension_order_and_case_insensitive_sort() {
		let dir = tempfile::tempdir().unwrap();
		for name in ["b.png", "C.jpg", "a.jpg", "B.jpeg", "notes.txt", "d.JPG"] {
			touch(&dir.path().join(name));
		}
		let images = list_images(dir.path(), Path::new("")).unwrap();
		let names = images.iter().map(ImageEntry::name).collect::<Vec<_>>();
		assert_eq!(names, vec!["a", "C", "d", "B", "b"]);
		assert_eq!(images[0].subpath(), Path::new(""));
		assert_eq!(images[0].relative_path(), PathBuf::from("a.jpg"));
	}

	#[cfg(unix)]
	#[test]
	fn test_symlinks_are_followed() {
		use std::os::unix::fs::symlink;

		let store = tempfile::tempdir().unwrap();
		touch(&store.path().join("a.jpg"));
		touch(&store.path().join("set/b.png"));

		let dir = tempfile::tempdir().unwrap();
		fs::create_dir(dir.path().join("flat")).unwrap();
		symlink(store.path().join("a.jpg"), dir.path().join("flat/a.jpg")).unwrap();
		let flat = list_images(&dir.path().join("flat"), Path::new("")).unwrap();
		assert_eq!(flat.iter().map(ImageEntry::name).collect::<Vec<_>>(), vec!["a"]);

		let nested = tempfile::tempdir().unwrap();
		symlink(store.path().join("set"), nested.path().join("linked")).unwrap();
		assert_eq!(subdirectories(nested.path()).unwrap(), vec![PathBuf::from("linked")]);
		let names = discover(nested.path())
			.unwrap()
			.into_iter()
			.map(|image| image.relative_path())
			.collect::<Vec<_>>();
		assert_eq!(names, vec![PathBuf::from("linked/b.png")]);
	}

	#[cfg(unix)]
	#[test]
	fn test_non_utf8_name_is_skipped() {
		use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

		let dir = tempfile::tempdir().unwrap();
		touch(&dir.path().join("good.jpg"));
		let bad = dir.path().join(OsStr::from_bytes(b"\xff.jpg"));
		if fs::write(&bad, b"").is_err() {
			// Some filesystems refuse names that are not UTF-8.
			return;
		}
		let images = list_images(dir.path(), Path::new("")).unwrap();
		assert_eq!(images.iter().map(ImageEntry::name).collect::<Vec<_>>(), vec!["good"]);
	}

	#[test]
	fn test_undecodable_image_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("broken.jpg");
		fs::write(&path, b"definitely not a jpeg").unwrap();
		assert!(load_image(&path).is_err());
	}
}
