use opencv::core::Rect;
use serde::Serialize;

/// A rectangle in pixel space, relative to whichever image it was found on.
///
/// Fields are declared alphabetically so the serialized keys come out sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
	pub height: i32,
	pub width: i32,
	pub x: i32,
	pub y: i32,
}

impl Region {
	#[inline]
	pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
		Self {
			height,
			width,
			x,
			y,
		}
	}

	#[inline]
	pub fn area(&self) -> i64 {
		i64::from(self.width) * i64::from(self.height)
	}
}

impl From<Rect> for Region {
	fn from(rect: Rect) -> Self {
		Self::new(rect.x, rect.y, rect.width, rect.height)
	}
}

impl From<Region> for Rect {
	fn from(region: Region) -> Self {
		Rect::new(region.x, region.y, region.width, region.height)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Proposal {
	pub height: f64,
	pub width: f64,
	pub x: f64,
	pub y: f64,
}

impl Proposal {
	#[inline]
	pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			height,
			width,
			x,
			y,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageProposals {
	image: String,
	proposals: Vec<Proposal>,
}

impl ImageProposals {
	pub fn new(image: impl Into<String>, proposals: Vec<Proposal>) -> Self {
		Self {
			image: image.into(),
			proposals,
		}
	}

	#[inline]
	pub fn image(&self) -> &str {
		&self.image
	}

	#[inline]
	pub fn proposals(&self) -> &[Proposal] {
		&self.proposals
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rect_conversion() {
		let region = Region::from(Rect::new(3, 4, 10, 20));
		assert_eq!(region, Region::new(3, 4, 10, 20));
		assert_eq!(Rect::from(region), Rect::new(3, 4, 10, 20));
		assert_eq!(region.area(), 200);
	}

	#[test]
	fn test_serialized_keys_are_sorted() {
		let json = serde_json::to_string(&Region::new(1, 2, 3, 4)).unwrap();
		assert_eq!(json, r#"{"height":4,"width":3,"x":1,"y":2}"#);

		let proposals = ImageProposals::new("000001", vec![Proposal::new(0.0, 0.5, 1.0, 0.25)]);
		let json = serde_json::to_string(&proposals).unwrap();
		assert_eq!(
			json,
			r#"{"image":"000001","proposals":[{"height":0.25,"width":1.0,"x":0.0,"y":0.5}]}"#
		);
	}
}
