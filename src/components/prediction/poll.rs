use log::debug;
use wasm_bindgen::prelude::*;

use crate::{Error, Result};

/// Something that can cancel a scheduled interval by id.
pub trait IntervalTimer {
	fn cancel(&self, id: i32);
}

/// Browser `setInterval` timer; owns the callback for as long as it lives.
pub struct BrowserTimer {
	_callback: Closure<dyn FnMut()>,
}

impl IntervalTimer for BrowserTimer {
	fn cancel(&self, id: i32) {
		if let Some(window) = web_sys::window() {
			window.clear_interval_with_handle(id);
		}
	}
}

/// Handle to a repeating task. Stopping is idempotent and happens on drop.
pub struct PollTask<T: IntervalTimer = BrowserTimer> {
	timer: T,
	id: Option<i32>,
}

impl PollTask<BrowserTimer> {
	/// Runs `tick` every `interval_ms` until stopped.
	pub fn every(interval_ms: i32, tick: impl FnMut() + 'static) -> Result<Self> {
		let window = web_sys::window().ok_or(Error::MissingElement("window"))?;
		let callback = Closure::<dyn FnMut()>::new(tick);
		let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
			callback.as_ref().unchecked_ref(),
			interval_ms,
		)?;
		debug!("Polling every {interval_ms} ms");
		Ok(Self::new(
			BrowserTimer {
				_callback: callback,
			},
			id,
		))
	}
}

impl<T: IntervalTimer> PollTask<T> {
	pub fn new(timer: T, id: i32) -> Self {
		Self {
			timer,
			id: Some(id),
		}
	}

	#[cfg(test)]
	fn is_running(&self) -> bool {
		self.id.is_some()
	}

	pub fn stop(&mut self) {
		if let Some(id) = self.id.take() {
			self.timer.cancel(id);
			debug!("Polling stopped");
		}
	}
}

impl<T: IntervalTimer> Drop for PollTask<T> {
	fn drop(&mut self) {
		self.stop();
	}
}
