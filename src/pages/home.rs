use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use log::{debug, error, info};

use crate::api;
use crate::components::network::{
	EdgeDetails, Graph, InformationSummary, NetworkCanvas, Sidebar,
};
use crate::components::prediction::PredictionProgress;
use crate::config::{MonitorConfig, VizConfig};

/// Counter that lets an in-flight load notice a newer one replaced it.
#[derive(Clone, Default)]
struct LoadGeneration(Rc<Cell<u64>>);

impl LoadGeneration {
	fn next(&self) -> u64 {
		let generation = self.0.get() + 1;
		self.0.set(generation);
		generation
	}

	fn is_current(&self, generation: u64) -> bool {
		self.0.get() == generation
	}
}

/// Predicted network of the project named by `?project=<id>`.
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let project = Memo::new(move |_| query.read().get("project"));
	let monitor_config = MonitorConfig::default();

	let graph = RwSignal::new(None::<Graph>);
	let load_error = RwSignal::new(None::<Arc<crate::Error>>);
	let reload = RwSignal::new(0u32);
	let information = RwSignal::new(None::<InformationSummary>);
	let details = RwSignal::new(None::<EdgeDetails>);
	let sidebar_open = RwSignal::new(false);

	let api_base = monitor_config.api_base.clone();
	let loads = LoadGeneration::default();
	Effect::new(move |_| {
		reload.track();
		let generation = loads.next();
		// Tear down the current view before fetching its replacement.
		graph.set(None);
		let Some(project_id) = project.get() else {
			return;
		};
		let (api_base, loads) = (api_base.clone(), loads.clone());
		spawn_local(async move {
			let result = api::fetch_predicted_network(&api_base, &project_id).await;
			if !loads.is_current(generation) {
				debug!("Dropping superseded network of project {project_id}");
				return;
			}
			match result {
				Ok(network) => {
					info!("Loaded predicted network for project {project_id}");
					load_error.set(None);
					graph.set(Some(network));
				}
				Err(err) => {
					error!("Loading predicted network failed: {err}");
					load_error.set(Some(Arc::new(err)));
				}
			}
		});
	});

	Effect::new(move |_| {
		if details.with(Option::is_some) {
			sidebar_open.set(true);
		}
	});

	let on_finished: Callback<()> = Callback::new(move |_: ()| reload.update(|n| *n += 1));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{move || load_error.get().map_or(Ok(()), Err)}
		</ErrorBoundary>

		<Show
			when=move || project.get().is_some()
			fallback=|| view! { <p class="empty-state">"Select a project to view its predicted network."</p> }
		>
			<div class="network-page">
				<Sidebar information=information details=details open=sidebar_open />
				<NetworkCanvas
					graph=graph
					config=VizConfig::default()
					information=information
					details=details
				/>
				{
					let config = monitor_config.clone();
					move || {
						project
							.get()
							.map(|project_id| {
								view! {
									<PredictionProgress
										project_id=project_id
										config=config.clone()
										on_finished=on_finished
									/>
								}
							})
					}
				}
			</div>
		</Show>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn newer_load_supersedes_pending_one() {
		let loads = LoadGeneration::default();
		let first = loads.next();
		assert!(loads.is_current(first));

		let second = loads.clone().next();
		assert!(!loads.is_current(first));
		assert!(loads.is_current(second));
	}
}
