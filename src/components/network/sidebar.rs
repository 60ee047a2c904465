use leptos::prelude::*;

use super::details::{EdgeDetails, EdgeEntry, InformationSummary, format_number};

/// Collapsible panel with the network summary and the inspected link.
#[component]
pub fn Sidebar(
	/// General information of the drawn network.
	#[prop(into)]
	information: Signal<Option<InformationSummary>>,
	/// Inspected bundle, if any.
	#[prop(into)]
	details: Signal<Option<EdgeDetails>>,
	/// Whether the panel is expanded.
	open: RwSignal<bool>,
) -> impl IntoView {
	view! {
		<aside class="sidebar" class:active=move || open.get()>
			<button
				id="sidebarCollapse"
				class:active=move || open.get()
				on:click=move |_| open.update(|open| *open = !*open)
			>
				"Details"
			</button>
			<div id="general-information">
				<p class="h7">"GENERAL INFORMATION"</p>
				<hr />
				{move || information.get().map(|info| view! { <GeneralInformation info=info /> })}
			</div>
			<div id="card-edge-placeholder">
				{move || details.get().map(|details| view! { <EdgeInformation details=details /> })}
			</div>
		</aside>
	}
}

#[component]
fn GeneralInformation(info: InformationSummary) -> impl IntoView {
	let methods = info
		.methods
		.into_iter()
		.map(|method| {
			let rows = method
				.rows
				.into_iter()
				.map(|(name, count)| view! { <li><span>{name}</span><span>{count}</span></li> })
				.collect_view();
			view! {
				<span class="first-header">{method.name}</span>
				{rows}
			}
		})
		.collect_view();

	view! {
		<ul id="general-information-nodes-edges">
			<li><span>"Nodes"</span><span>{info.node_count}</span></li>
			<li><span>"Directed edges"</span><span>{info.directed_edge_count}</span></li>
			<li><span>"Undirected edges"</span><span>{info.undirected_edge_count}</span></li>
		</ul>
		<ul id="general-information-methods">{methods}</ul>
	}
}

#[component]
fn EdgeInformation(details: EdgeDetails) -> impl IntoView {
	let edges = details
		.edges
		.into_iter()
		.enumerate()
		.map(|(i, edge)| view! { <EdgeItem index={i + 1} edge=edge /> })
		.collect_view();

	view! {
		<div id="edge-information-card">
			<div class="card-header">
				<p class="h7" id="edge-information-title">{details.title}</p>
				<hr />
			</div>
			<div id="edge-information-card-body" class="card-body">{edges}</div>
		</div>
	}
}

#[component]
fn EdgeItem(index: usize, edge: EdgeEntry) -> impl IntoView {
	let score = edge.score.map(|score| {
		view! { <li><span>"prediction score"</span><span>{format_number(score)}</span></li> }
	});
	let methods = (!edge.methods.is_empty()).then(|| {
		let groups = edge
			.methods
			.into_iter()
			.map(|group| {
				let count = group.sub_methods.len();
				let subs = group
					.sub_methods
					.into_iter()
					.map(|sub| view! { <li><span>{sub}</span></li> })
					.collect_view();
				view! {
					<span class="second-header">{group.name}" ("{count}")"</span>
					{subs}
				}
			})
			.collect_view();
		view! { <ul class="applied-methods">{groups}</ul> }
	});

	view! {
		<ul id=format!("edge-information-{index}")>
			<span class="first-header">{edge.header}</span>
			<li><span>"predicted"</span><span>{edge.predicted.to_string()}</span></li>
			{score}
		</ul>
		{methods}
	}
}
