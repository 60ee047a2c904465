/// Values that can be blended for animated transitions.
pub trait Lerp: Copy {
	fn lerp(self, other: Self, t: f64) -> Self;
}

impl Lerp for f64 {
	fn lerp(self, other: Self, t: f64) -> Self {
		self + (other - self) * t
	}
}

pub fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// A timed transition between two values, advanced by elapsed milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween<T> {
	from: T,
	to: T,
	elapsed: f64,
	duration: f64,
}

impl<T: Lerp> Tween<T> {
	pub fn settled(value: T) -> Self {
		Self {
			from: value,
			to: value,
			elapsed: 0.0,
			duration: 0.0,
		}
	}

	pub fn value(&self) -> T {
		if self.is_done() {
			return self.to;
		}
		self.from
			.lerp(self.to, ease_cubic_in_out(self.elapsed / self.duration))
	}

	pub fn target(&self) -> T {
		self.to
	}

	pub fn is_done(&self) -> bool {
		self.duration <= 0.0 || self.elapsed >= self.duration
	}

	/// Starts a new transition from wherever the current one is.
	pub fn retarget(&mut self, to: T, duration_ms: f64) {
		self.from = self.value();
		self.to = to;
		self.elapsed = 0.0;
		self.duration = duration_ms.max(0.0);
	}

	/// Returns `true` while the transition is still in flight.
	pub fn advance(&mut self, dt_ms: f64) -> bool {
		if self.is_done() {
			return false;
		}
		self.elapsed = (self.elapsed + dt_ms).min(self.duration);
		!self.is_done()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn easing_endpoints() {
		assert_eq!(ease_cubic_in_out(0.0), 0.0);
		assert_eq!(ease_cubic_in_out(1.0), 1.0);
		assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-12);
	}

	#[test]
	fn reaches_target_after_duration() {
		let mut tween = Tween::settled(0.0);
		tween.retarget(10.0, 500.0);
		assert_eq!(tween.value(), 0.0);
		assert!(tween.advance(250.0));
		assert!((tween.value() - 5.0).abs() < 1e-9);
		assert!(!tween.advance(250.0));
		assert_eq!(tween.value(), 10.0);
	}

	#[test]
	fn retarget_starts_from_current_value() {
		let mut tween = Tween::settled(0.0);
		tween.retarget(10.0, 100.0);
		tween.advance(50.0);
		tween.retarget(0.0, 100.0);
		assert!((tween.value() - 5.0).abs() < 1e-9);
		assert_eq!(tween.target(), 0.0);
	}

	#[test]
	fn zero_duration_jumps() {
		let mut tween = Tween::settled(1.0);
		tween.retarget(3.0, 0.0);
		assert_eq!(tween.value(), 3.0);
		assert!(!tween.advance(16.0));
	}
}
