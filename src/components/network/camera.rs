//! Pan/zoom transform and the zoom-to-fit computation.

use super::tween::Lerp;

/// Screen = world * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ZoomTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ZoomTransform {
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Scales by `factor` keeping the screen point `(px, py)` fixed.
	pub fn zoom_about(&self, px: f64, py: f64, factor: f64, extent: (f64, f64)) -> Self {
		let k = (self.k * factor).clamp(extent.0, extent.1);
		let ratio = k / self.k;
		Self {
			x: px - (px - self.x) * ratio,
			y: py - (py - self.y) * ratio,
			k,
		}
	}

	pub fn translated(&self, dx: f64, dy: f64) -> Self {
		Self {
			x: self.x + dx,
			y: self.y + dy,
			k: self.k,
		}
	}
}

impl Lerp for ZoomTransform {
	fn lerp(self, other: Self, t: f64) -> Self {
		Self {
			x: self.x.lerp(other.x, t),
			y: self.y.lerp(other.y, t),
			k: self.k.lerp(other.k, t),
		}
	}
}

/// Axis-aligned box in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	/// Box enclosing circles of `radius` around every point; `None` when empty.
	pub fn around(points: impl IntoIterator<Item = (f64, f64)>, radius: f64) -> Option<Self> {
		let (min_x, min_y, max_x, max_y) = points.into_iter().fold(
			None,
			|acc: Option<(f64, f64, f64, f64)>, (x, y)| {
				Some(match acc {
					Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
					None => (x, y, x, y),
				})
			},
		)?;
		Some(Self {
			x: min_x - radius,
			y: min_y - radius,
			width: max_x - min_x + 2.0 * radius,
			height: max_y - min_y + 2.0 * radius,
		})
	}

	pub fn center(&self) -> (f64, f64) {
		(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}
}

/// Visible drawing area; `gutter` is reserved on the left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	pub gutter: f64,
}

/// Transform that centers `bounds` in the viewport at `padding` of its size.
///
/// Returns `None` when either bound dimension is zero, or the viewport has
/// no usable area.
pub fn fit_transform(bounds: Bounds, viewport: Viewport, padding: f64) -> Option<ZoomTransform> {
	let full_width = viewport.width - viewport.gutter;
	let full_height = viewport.height;
	if bounds.width == 0.0 || bounds.height == 0.0 || full_width <= 0.0 || full_height <= 0.0 {
		return None;
	}
	let scale = padding / (bounds.width / full_width).max(bounds.height / full_height);
	let (mid_x, mid_y) = bounds.center();
	Some(ZoomTransform {
		x: full_width / 2.0 - scale * mid_x + viewport.gutter,
		y: full_height / 2.0 - scale * mid_y,
		k: scale,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	const VIEW: Viewport = Viewport {
		width: 870.0,
		height: 600.0,
		gutter: 70.0,
	};

	#[test]
	fn fit_centers_and_pads() {
		let bounds = Bounds {
			x: -100.0,
			y: -50.0,
			width: 200.0,
			height: 100.0,
		};
		let t = fit_transform(bounds, VIEW, 0.85).unwrap();
		// 200/800 = 0.25 dominates 100/600.
		assert!((t.k - 3.4).abs() < 1e-12);
		assert!((t.x - (400.0 + 70.0)).abs() < 1e-9);
		assert!((t.y - 300.0).abs() < 1e-9);
	}

	#[test]
	fn fit_skips_flat_bounds() {
		let flat = Bounds {
			x: 0.0,
			y: 0.0,
			width: 10.0,
			height: 0.0,
		};
		assert_eq!(fit_transform(flat, VIEW, 0.85), None);
		let narrow = Bounds { width: 0.0, height: 10.0, ..flat };
		assert_eq!(fit_transform(narrow, VIEW, 0.85), None);
	}

	#[test]
	fn bounds_of_nothing_is_none() {
		assert_eq!(Bounds::around(std::iter::empty(), 15.0), None);
	}

	#[test]
	fn bounds_include_radius() {
		let b = Bounds::around([(0.0, 0.0), (100.0, 50.0)], 15.0).unwrap();
		assert_eq!(b.x, -15.0);
		assert_eq!(b.y, -15.0);
		assert_eq!(b.width, 130.0);
		assert_eq!(b.height, 80.0);
	}

	#[test]
	fn zoom_is_clamped_and_anchored() {
		let t = ZoomTransform::default();
		let zoomed = t.zoom_about(100.0, 100.0, 100.0, (0.25, 4.0));
		assert_eq!(zoomed.k, 4.0);
		assert_eq!(zoomed.screen_to_world(100.0, 100.0), (100.0, 100.0));
		let out = t.zoom_about(0.0, 0.0, 0.001, (0.25, 4.0));
		assert_eq!(out.k, 0.25);
	}

	#[test]
	fn screen_world_round_trip() {
		let t = ZoomTransform {
			x: 10.0,
			y: 20.0,
			k: 2.0,
		};
		assert_eq!(t.screen_to_world(30.0, 40.0), (10.0, 10.0));
		assert_eq!(t.translated(5.0, -5.0).x, 15.0);
	}
}
