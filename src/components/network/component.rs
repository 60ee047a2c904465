use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::details::{EdgeDetails, InformationSummary};
use super::render;
use super::state::{FRAME_MS, NetworkSession};
use super::types::Graph;
use crate::config::VizConfig;

type SharedSession = Rc<RefCell<Option<NetworkSession>>>;
type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Canvas view of a predicted network.
///
/// Each new `graph` value tears down the current session and draws a fresh
/// one. Panel contents are published through `information` and `details`.
#[component]
pub fn NetworkCanvas(
	/// Network to draw; `None` removes the current view.
	#[prop(into)]
	graph: Signal<Option<Graph>>,
	/// Layout and camera tunables.
	#[prop(optional)]
	config: VizConfig,
	/// Receives the general information of the drawn network.
	information: RwSignal<Option<InformationSummary>>,
	/// Receives the inspected bundle.
	details: RwSignal<Option<EdgeDetails>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedSession = Rc::new(RefCell::new(None));
	let animate: SharedClosure = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure = Rc::new(RefCell::new(None));
	let frame_id = Rc::new(Cell::new(None::<i32>));

	let teardown = {
		let state = state.clone();
		move || {
			if let Some(mut session) = state.borrow_mut().take() {
				session.destroy();
			}
			information.set(None);
			details.set(None);
		}
	};

	let (state_init, animate_init, resize_cb_init, frame_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		frame_id.clone(),
	);
	let teardown_init = teardown.clone();
	Effect::new(move |_| {
		let graph = graph.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("No window available, cannot draw network");
			return;
		};

		teardown_init();
		let Some(graph) = graph else {
			return;
		};

		let (w, h) = container_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		information.set(Some(InformationSummary::from(&graph.information)));
		*state_init.borrow_mut() = Some(NetworkSession::create(graph, w, h, config.clone()));

		if resize_cb_init.borrow().is_none() {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let (nw, nh) = container_size(&canvas_resize);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if animate_init.borrow().is_none() {
			let Some(ctx) = context_2d(&canvas) else {
				error!("Canvas 2d context unavailable");
				return;
			};
			let (state_anim, animate_inner, frame_inner) =
				(state_init.clone(), animate_init.clone(), frame_init.clone());
			*animate_init.borrow_mut() = Some(Closure::new(move || {
				match *state_anim.borrow_mut() {
					Some(ref mut s) => {
						if s.animation_running {
							s.tick(FRAME_MS);
						}
						render::render(s, &ctx);
					}
					None => {
						if let Some(canvas) = ctx.canvas() {
							ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
						}
					}
				}
				if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
					frame_inner.set(
						win.request_animation_frame(cb.as_ref().unchecked_ref())
							.ok(),
					);
				}
			}));
			if let Some(ref cb) = *animate_init.borrow() {
				frame_init.set(
					window
						.request_animation_frame(cb.as_ref().unchecked_ref())
						.ok(),
				);
			}
		}
	});

	let handles = StoredValue::new_local((animate.clone(), resize_cb.clone(), frame_id.clone()));
	let teardown_cleanup = StoredValue::new_local(teardown);
	on_cleanup(move || {
		let _ = teardown_cleanup.try_with_value(|teardown| teardown());
		let _ = handles.try_with_value(|(animate, resize_cb, frame_id)| {
			let Some(window) = web_sys::window() else {
				return;
			};
			if let Some(id) = frame_id.take() {
				let _ = window.cancel_animation_frame(id);
			}
			animate.borrow_mut().take();
			if let Some(cb) = resize_cb.borrow_mut().take() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		});
	});

	let publish_details = {
		let state = state.clone();
		move || {
			let next = state.borrow().as_ref().and_then(|s| s.details.clone());
			details.set(next);
		}
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if s.node_at_position(x, y).is_none() {
				s.begin_pan(x, y);
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pan_to(x, y);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_pan();
		}
	};

	// Click arrives after mouseup, so the pan decides whether it was a drag.
	let state_click = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_position(&canvas, &ev);
		let modifier = ev.ctrl_key() || ev.meta_key();
		let changed = match *state_click.borrow_mut() {
			Some(ref mut s) => !s.end_pan() && s.click(x, y, modifier),
			None => false,
		};
		if changed {
			publish_details();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_position(&canvas, &ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	let zoom_button = move |factor: f64| {
		let state = state.clone();
		move |_: MouseEvent| match *state.borrow_mut() {
			Some(ref mut s) => s.zoom_step(factor),
			None => warn!("Zoom requested without a network"),
		}
	};

	view! {
		<div class="network-container">
			<canvas
				node_ref=canvas_ref
				class="network-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				on:click=on_click
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="zoom-controls">
				<button on:click=zoom_button(1.2)>"+"</button>
				<button on:click=zoom_button(0.8)>"-"</button>
			</div>
		</div>
	}
}
