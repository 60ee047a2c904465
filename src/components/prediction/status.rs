//! Prediction job status and the monitor state machine driven by polling.

use serde::{Deserialize, Serialize};

/// Step name the backend reports once the whole job is done.
pub const FINAL_STEP: &str = "Prediction";

#[derive(Deserialize)]
enum StateName {
	Waiting,
	Processing,
	Finished,
	Failed,
}

#[derive(Deserialize)]
struct RawStatus {
	#[serde(default)]
	current_step: u32,
	#[serde(default)]
	max_steps: u32,
	#[serde(default)]
	current_step_name: String,
	state: StateName,
}

/// Last reported state of a server-side prediction job.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(from = "RawStatus")]
pub enum PredictionStatus {
	/// Queued, the pipeline has not begun.
	Waiting,
	/// Running step `current_step` of `max_steps`.
	Processing {
		/// One-based index of the running step.
		current_step: u32,
		/// Number of steps in the pipeline.
		max_steps: u32,
		/// Name of the running step.
		current_step_name: String,
	},
	/// The named step completed.
	Finished {
		/// Name of the completed step.
		current_step_name: String,
	},
	/// The job failed or was aborted.
	Failed,
}

/// Request body that starts or aborts the prediction job of a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state")]
pub enum PredictionCommand {
	Start,
	Abort,
}

impl From<RawStatus> for PredictionStatus {
	fn from(raw: RawStatus) -> Self {
		match raw.state {
			StateName::Waiting => PredictionStatus::Waiting,
			StateName::Processing => PredictionStatus::Processing {
				current_step: raw.current_step,
				max_steps: raw.max_steps,
				current_step_name: raw.current_step_name,
			},
			StateName::Finished => PredictionStatus::Finished {
				current_step_name: raw.current_step_name,
			},
			StateName::Failed => PredictionStatus::Failed,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MonitorPhase {
	/// No prediction started from this view; stored statuses are ignored.
	#[default]
	Idle,
	Polling,
	Succeeded,
	Failed,
	/// The status request itself failed.
	Interrupted,
}

/// Messages shown by the progress widget and whether polling continues.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MonitorState {
	pub phase: MonitorPhase,
	pub progress_message: String,
	pub step_message: String,
}

impl MonitorState {
	/// Resets the messages of a previous run and begins polling.
	pub fn start(&mut self) {
		*self = Self {
			phase: MonitorPhase::Polling,
			..Self::default()
		};
	}

	pub fn is_polling(&self) -> bool {
		self.phase == MonitorPhase::Polling
	}

	pub fn is_terminal(&self) -> bool {
		matches!(
			self.phase,
			MonitorPhase::Succeeded | MonitorPhase::Failed | MonitorPhase::Interrupted
		)
	}

	/// Folds one status into the state. Returns whether to keep polling.
	pub fn handle(&mut self, status: &PredictionStatus) -> bool {
		if !self.is_polling() {
			return false;
		}
		match status {
			PredictionStatus::Waiting => {
				self.step_message = "Setup prediction process...".into();
			}
			PredictionStatus::Processing {
				current_step,
				max_steps,
				current_step_name,
			} => {
				self.progress_message = format!("Step {current_step} of {max_steps}");
				self.step_message = current_step_name.clone();
			}
			PredictionStatus::Finished { current_step_name } => {
				// Intermediate steps also report Finished.
				if current_step_name == FINAL_STEP {
					self.step_message = "Prediction successfully!".into();
					self.phase = MonitorPhase::Succeeded;
				}
			}
			PredictionStatus::Failed => {
				self.step_message = "Prediction failed or aborted!".into();
				self.phase = MonitorPhase::Failed;
			}
		}
		self.is_polling()
	}

	pub fn transport_failed(&mut self) {
		if self.is_polling() {
			self.phase = MonitorPhase::Interrupted;
		}
	}
}
