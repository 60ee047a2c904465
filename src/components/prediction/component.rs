use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info, warn};

use super::poll::PollTask;
use super::status::{MonitorPhase, MonitorState, PredictionCommand, PredictionStatus};
use crate::api;
use crate::config::MonitorConfig;

/// Polling state shared between the buttons, the interval and its requests.
struct Monitor {
	config: MonitorConfig,
	project_id: String,
	state: RefCell<MonitorState>,
	task: RefCell<Option<PollTask>>,
	in_flight: Cell<bool>,
	progress: RwSignal<String>,
	step: RwSignal<String>,
	polling: RwSignal<bool>,
	on_finished: Callback<()>,
}

impl Monitor {
	fn start_polling(self: &Rc<Self>) {
		self.stop();
		self.state.borrow_mut().start();
		self.progress.set(String::new());
		self.step.set(String::new());

		let monitor = Rc::clone(self);
		match PollTask::every(self.config.poll_interval_ms, move || monitor.poll()) {
			Ok(task) => {
				*self.task.borrow_mut() = Some(task);
				self.polling.set(true);
			}
			Err(err) => error!("Could not start prediction polling: {err}"),
		}
	}

	fn poll(self: &Rc<Self>) {
		if self.in_flight.replace(true) {
			return;
		}
		let monitor = Rc::clone(self);
		spawn_local(async move {
			let result =
				api::fetch_prediction_status(&monitor.config.api_base, &monitor.project_id).await;
			monitor.in_flight.set(false);
			monitor.receive(result);
		});
	}

	fn receive(&self, result: crate::Result<PredictionStatus>) {
		let succeeded = {
			let mut state = self.state.borrow_mut();
			if !state.is_polling() {
				return;
			}
			match result {
				Ok(status) => {
					state.handle(&status);
					self.progress.set(state.progress_message.clone());
					self.step.set(state.step_message.clone());
				}
				Err(err) => {
					error!("Prediction status request failed: {err}");
					state.transport_failed();
				}
			}
			if !state.is_terminal() {
				return;
			}
			state.phase == MonitorPhase::Succeeded
		};

		self.stop();
		if succeeded {
			info!("Prediction finished for project {}", self.project_id);
			self.on_finished.run(());
		}
	}

	/// Cancels the interval. The task owns a clone of `self`, so this also
	/// releases that cycle.
	fn stop(&self) {
		if let Some(mut task) = self.task.borrow_mut().take() {
			task.stop();
		}
		self.polling.set(false);
	}
}

/// Starts, aborts and reports the prediction job of `project_id`.
///
/// Status polling runs only after a start request succeeded, and stops on
/// success, failure, a failed request, or unmount. `on_finished` fires once
/// per successful run.
#[component]
pub fn PredictionProgress(
	/// Project whose prediction job is controlled.
	#[prop(into)]
	project_id: String,
	/// Backend root and polling interval.
	#[prop(optional)]
	config: MonitorConfig,
	/// Called when a started prediction completes.
	#[prop(into)]
	on_finished: Callback<()>,
) -> impl IntoView {
	let progress = RwSignal::new(String::new());
	let step = RwSignal::new(String::new());
	let polling = RwSignal::new(false);

	let monitor = Rc::new(Monitor {
		config,
		project_id,
		state: RefCell::new(MonitorState::default()),
		task: RefCell::new(None),
		in_flight: Cell::new(false),
		progress,
		step,
		polling,
		on_finished,
	});

	let send_command = {
		let monitor = monitor.clone();
		move |command: PredictionCommand| {
			let monitor = monitor.clone();
			spawn_local(async move {
				let result = api::set_prediction_state(
					&monitor.config.api_base,
					&monitor.project_id,
					command,
				)
				.await;
				match (result, command) {
					(Ok(()), PredictionCommand::Start) => {
						info!("Prediction started for project {}", monitor.project_id);
						monitor.start_polling();
					}
					// The next status reports the abort and ends polling.
					(Ok(()), PredictionCommand::Abort) => {
						info!("Prediction abort requested for project {}", monitor.project_id);
					}
					(Err(err), command) => warn!("Prediction {command:?} request failed: {err}"),
				}
			});
		}
	};
	let start = {
		let send_command = send_command.clone();
		move |_: MouseEvent| send_command(PredictionCommand::Start)
	};
	let abort = move |_: MouseEvent| send_command(PredictionCommand::Abort);

	let monitor_cleanup = StoredValue::new_local(monitor);
	on_cleanup(move || {
		let _ = monitor_cleanup.try_with_value(|monitor| monitor.stop());
	});

	view! {
		<div class="prediction-progress" class:active=move || polling.get()>
			<button
				class="start-prediction"
				disabled=move || polling.get()
				on:click=start
			>
				"Start prediction"
			</button>
			<button
				class="abort-prediction"
				disabled=move || !polling.get()
				on:click=abort
			>
				"Abort"
			</button>
			<span class="prediction-progress-message">{move || progress.get()}</span>
			<span class="prediction-step-message">{move || step.get()}</span>
		</div>
	}
}
