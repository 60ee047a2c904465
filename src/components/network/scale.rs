//! Linear scale mapping a numeric domain onto an output range.

/// Maps `domain` linearly onto `range`, clamping outside the domain.
///
/// A degenerate domain (`min == max`) maps every input to the middle of the
/// range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
	domain: (f64, f64),
	range: (f64, f64),
}

impl LinearScale {
	pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self { domain, range }
	}

	/// Domain spanning the extent of `values`; `(0, 0)` when empty.
	pub fn from_extent(values: impl IntoIterator<Item = f64>, range: (f64, f64)) -> Self {
		let extent = values
			.into_iter()
			.filter(|v| v.is_finite())
			.fold(None, |acc: Option<(f64, f64)>, v| match acc {
				Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
				None => Some((v, v)),
			})
			.unwrap_or((0.0, 0.0));
		Self::new(extent, range)
	}

	pub fn apply(&self, value: f64) -> f64 {
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		let span = d1 - d0;
		if span.abs() < f64::EPSILON || !value.is_finite() {
			return (r0 + r1) / 2.0;
		}
		let t = ((value - d0) / span).clamp(0.0, 1.0);
		r0 + (r1 - r0) * t
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn maps_domain_ends_onto_range_ends() {
		let scale = LinearScale::from_extent([1.0, 3.0, 5.0], (0.05, 0.2));
		assert!((scale.apply(1.0) - 0.05).abs() < 1e-12);
		assert!((scale.apply(5.0) - 0.2).abs() < 1e-12);
		assert!((scale.apply(3.0) - 0.125).abs() < 1e-12);
	}

	#[test]
	fn clamps_outside_domain() {
		let scale = LinearScale::new((0.0, 10.0), (0.05, 0.2));
		assert_eq!(scale.apply(-4.0), 0.05);
		assert_eq!(scale.apply(40.0), 0.2);
	}

	#[test]
	fn single_valued_domain_collapses_into_range() {
		let scale = LinearScale::from_extent([2.5, 2.5, 2.5], (0.05, 0.2));
		let value = scale.apply(2.5);
		assert!(value.is_finite());
		assert!((0.05..=0.2).contains(&value));
		assert_eq!(value, scale.apply(2.5));
	}

	#[test]
	fn empty_extent_is_finite() {
		let scale = LinearScale::from_extent(std::iter::empty(), (0.05, 0.2));
		assert!(scale.apply(0.0).is_finite());
	}
}
