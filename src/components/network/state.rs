use std::collections::HashMap;

use log::{debug, info};

use super::adjacency::AdjacencyIndex;
use super::camera::{Bounds, Viewport, ZoomTransform, fit_transform};
use super::details::EdgeDetails;
use super::layout::Simulation;
use super::selection::{Restyle, SelectionState};
use super::style::{Rgb, Style};
use super::tween::Tween;
use super::types::Graph;
use crate::config::VizConfig;

/// Fixed animation step, matching one frame at 60 Hz.
pub const FRAME_MS: f64 = 16.0;

#[derive(Clone, Debug)]
pub struct NodeVisual {
	pub color: Rgb,
	pub style: Tween<Style>,
}

#[derive(Clone, Debug)]
pub struct LinkVisual {
	pub color: Rgb,
	pub style: Tween<Style>,
	/// Simulated endpoints; `None` when an endpoint id is not a node.
	pub endpoints: Option<(usize, usize)>,
	pub end_marker: String,
	/// Only bidirectional bundles carry a start arrowhead.
	pub start_marker: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ArrowMarker {
	pub id: String,
	pub bundle: usize,
	pub fill: Tween<Rgb>,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start: ZoomTransform,
}

pub fn start_marker_id(source: &str, target: &str) -> String {
	format!("start-arrowhead-{source}-{target}")
}

pub fn end_marker_id(source: &str, target: &str) -> String {
	format!("end-arrowhead-{source}-{target}")
}

/// One live visualization: scene, layout, camera and selection.
///
/// Created from a graph payload and torn down with [`NetworkSession::destroy`]
/// before the next payload is drawn.
pub struct NetworkSession {
	pub graph: Graph,
	pub adjacency: AdjacencyIndex,
	pub simulation: Simulation,
	pub nodes: Vec<NodeVisual>,
	pub links: Vec<LinkVisual>,
	pub markers: Vec<ArrowMarker>,
	marker_index: HashMap<String, usize>,
	pub camera: Tween<ZoomTransform>,
	pub pan: PanState,
	pub selection: SelectionState,
	pub details: Option<EdgeDetails>,
	pub config: VizConfig,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
}

impl NetworkSession {
	pub fn create(graph: Graph, width: f64, height: f64, config: VizConfig) -> Self {
		let adjacency = AdjacencyIndex::build(&graph.links);

		let mut markers = Vec::with_capacity(graph.links.len() * 2);
		for (bundle, link) in graph.links.iter().enumerate() {
			let fill = Tween::settled(Rgb::for_edge(&link.edge_color));
			markers.push(ArrowMarker {
				id: end_marker_id(&link.source, &link.target),
				bundle,
				fill,
			});
			markers.push(ArrowMarker {
				id: start_marker_id(&link.source, &link.target),
				bundle,
				fill,
			});
		}
		let marker_index = markers
			.iter()
			.enumerate()
			.map(|(i, marker)| (marker.id.clone(), i))
			.collect();

		let simulation = Simulation::new(&graph, (width / 2.0, height / 2.0), &config);
		let mut endpoints = vec![None; graph.links.len()];
		for (bundle, source, target) in simulation.link_endpoints() {
			endpoints[bundle] = Some((source, target));
		}

		let links = graph
			.links
			.iter()
			.zip(endpoints)
			.map(|(link, endpoints)| {
				let color = Rgb::for_edge(&link.edge_color);
				LinkVisual {
					color,
					style: Tween::settled(Style::full(color)),
					endpoints,
					end_marker: end_marker_id(&link.source, &link.target),
					start_marker: link
						.is_bidirectional()
						.then(|| start_marker_id(&link.source, &link.target)),
				}
			})
			.collect();

		let nodes = (0..graph.nodes.len())
			.map(|i| {
				let color = Rgb::for_node(i);
				NodeVisual {
					color,
					style: Tween::settled(Style::full(color)),
				}
			})
			.collect();

		info!(
			"Network drawn: {} nodes, {} links",
			graph.nodes.len(),
			graph.links.len()
		);

		Self {
			graph,
			adjacency,
			simulation,
			nodes,
			links,
			markers,
			marker_index,
			camera: Tween::settled(ZoomTransform::default()),
			pan: PanState::default(),
			selection: SelectionState::default(),
			details: None,
			config,
			width,
			height,
			animation_running: true,
		}
	}

	/// Stops the session and drops all selection and panel state.
	pub fn destroy(&mut self) {
		self.animation_running = false;
		self.selection.clear();
		self.details = None;
		self.pan = PanState::default();
		info!("Previous network view removed");
	}

	pub fn marker(&self, id: &str) -> Option<&ArrowMarker> {
		self.marker_index.get(id).map(|&i| &self.markers[i])
	}

	pub fn transform(&self) -> ZoomTransform {
		self.camera.value()
	}

	pub fn node_position(&self, index: usize) -> Option<(f64, f64)> {
		self.simulation.node(index).map(|node| (node.x, node.y))
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.transform().screen_to_world(sx, sy);
		let radius_sq = self.config.node_radius * self.config.node_radius;
		// Last drawn wins, it sits on top.
		self.simulation
			.nodes()
			.iter()
			.enumerate()
			.rev()
			.find(|(_, node)| {
				let (dx, dy) = (node.x - gx, node.y - gy);
				dx * dx + dy * dy <= radius_sq
			})
			.map(|(index, _)| index)
	}

	/// Hit-tests a click at screen coordinates and runs the selection model.
	pub fn click(&mut self, sx: f64, sy: f64, modifier: bool) -> bool {
		let target = self.node_at_position(sx, sy);
		self.select(target, modifier)
	}

	/// Returns `false` when the click was ignored.
	pub fn select(&mut self, target: Option<usize>, modifier: bool) -> bool {
		let Some(restyle) = self
			.selection
			.click(target, modifier, &self.graph, &self.adjacency)
		else {
			debug!("Modifier click on {target:?} ignored");
			return false;
		};
		debug!(
			"Selection now {:?}, root {:?}",
			self.selection.mode(),
			self.selection.root
		);
		self.apply(&restyle);
		true
	}

	fn apply(&mut self, restyle: &Restyle) {
		let duration = self.config.restyle_ms;
		for (visual, emphasis) in self.nodes.iter_mut().zip(&restyle.nodes) {
			visual
				.style
				.retarget(emphasis.style(visual.color), duration);
		}
		for (visual, emphasis) in self.links.iter_mut().zip(&restyle.links) {
			visual
				.style
				.retarget(emphasis.style(visual.color), duration);
		}
		for marker in &mut self.markers {
			let bundle = marker.bundle;
			if let Some(emphasis) = restyle.links.get(bundle) {
				marker
					.fill
					.retarget(emphasis.marker_fill(self.links[bundle].color), duration);
			}
		}
		self.details = restyle
			.inspected_link
			.map(|bundle| EdgeDetails::from_bundle(&self.graph.links[bundle]));
	}

	/// Advances layout and animations by `dt_ms`.
	pub fn tick(&mut self, dt_ms: f64) {
		if self.simulation.tick() {
			info!("Layout settled");
			self.zoom_fit(self.config.settle_fit_ms);
		}
		self.camera.advance(dt_ms);
		for node in &mut self.nodes {
			node.style.advance(dt_ms);
		}
		for link in &mut self.links {
			link.style.advance(dt_ms);
		}
		for marker in &mut self.markers {
			marker.fill.advance(dt_ms);
		}
	}

	/// World-space box around every drawn node circle.
	pub fn content_bounds(&self) -> Option<Bounds> {
		Bounds::around(
			self.simulation.nodes().iter().map(|node| (node.x, node.y)),
			self.config.node_radius,
		)
	}

	/// Animates the camera so the whole network is visible and centered.
	///
	/// Returns `false` and leaves the camera alone for a degenerate network.
	pub fn zoom_fit(&mut self, duration_ms: f64) -> bool {
		if self.graph.links.is_empty() {
			return false;
		}
		let Some(bounds) = self.content_bounds() else {
			return false;
		};
		let viewport = Viewport {
			width: self.width,
			height: self.height,
			gutter: self.config.sidebar_gutter,
		};
		let Some(target) = fit_transform(bounds, viewport, self.config.fit_padding) else {
			return false;
		};
		self.camera.retarget(target, duration_ms);
		true
	}

	/// Zooms about the center of the canvas, as the zoom buttons do.
	pub fn zoom_step(&mut self, factor: f64) {
		let extent = (self.config.min_zoom, self.config.max_zoom);
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		let target = self.camera.target().zoom_about(cx, cy, factor, extent);
		self.camera.retarget(target, self.config.zoom_step_ms);
	}

	/// Immediate zoom about a screen point, used for the mouse wheel.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let extent = (self.config.min_zoom, self.config.max_zoom);
		let target = self.transform().zoom_about(sx, sy, factor, extent);
		self.camera = Tween::settled(target);
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: sx,
			start_y: sy,
			transform_start: self.transform(),
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
		if dx.abs() + dy.abs() > 3.0 {
			self.pan.moved = true;
		}
		self.camera = Tween::settled(self.pan.transform_start.translated(dx, dy));
	}

	/// Ends a pan; returns whether the pointer actually dragged.
	pub fn end_pan(&mut self) -> bool {
		let moved = self.pan.active && self.pan.moved;
		self.pan.active = false;
		moved
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.zoom_fit(self.config.resize_fit_ms);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network::selection::SelectionMode;
	use crate::components::network::style::{DIMMED_MARKER, DIMMED_OPACITY};

	const PAYLOAD: &str = r##"{
		"information": {"node_count": 3, "directed_edge_count": 3, "undirected_edge_count": 0,
			"methods_applied": {}},
		"nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
		"links": [
			{"source": "A", "target": "B", "edge_color": "#EB5F5E", "edges": [
				{"source": "A", "target": "B", "predicted": true, "prediction_score": 0.9,
				 "applied_methods": {"Topology": ["Jaccard"]}},
				{"source": "B", "target": "A", "predicted": false}
			]},
			{"source": "B", "target": "C", "edge_color": "#F3A533", "edges": [
				{"source": "B", "target": "C", "predicted": true, "prediction_score": 0.3,
				 "applied_methods": {"Topology": ["Adamic Adar"]}}
			]}
		]
	}"##;

	fn session() -> NetworkSession {
		NetworkSession::create(
			Graph::from_json(PAYLOAD).unwrap(),
			870.0,
			600.0,
			VizConfig::default(),
		)
	}

	fn settle(session: &mut NetworkSession) {
		for _ in 0..2_000 {
			session.tick(FRAME_MS);
		}
	}

	#[test]
	fn markers_exist_for_both_ends_of_every_bundle() {
		let s = session();
		assert_eq!(s.markers.len(), 4);
		for id in [
			"end-arrowhead-A-B",
			"start-arrowhead-A-B",
			"end-arrowhead-B-C",
			"start-arrowhead-B-C",
		] {
			assert!(s.marker(id).is_some(), "missing {id}");
		}
	}

	#[test]
	fn start_arrowhead_only_on_bidirectional_bundles() {
		let s = session();
		assert_eq!(s.links[0].start_marker.as_deref(), Some("start-arrowhead-A-B"));
		assert_eq!(s.links[0].end_marker, "end-arrowhead-A-B");
		assert_eq!(s.links[1].start_marker, None);
		assert_eq!(s.links[1].end_marker, "end-arrowhead-B-C");
	}

	#[test]
	fn adjacency_agrees_with_links() {
		let s = session();
		assert_eq!(s.adjacency.len(), s.links.len());
		for link in &s.graph.links {
			assert!(s.adjacency.contains(&link.source, &link.target));
		}
	}

	#[test]
	fn restyle_animates_to_target() {
		let mut s = session();
		assert!(s.select(Some(0), false));
		assert_eq!(s.nodes[2].style.value(), Style::full(s.nodes[2].color));
		s.tick(250.0);
		let halfway = s.nodes[2].style.value().opacity;
		assert!(halfway < 1.0 && halfway > DIMMED_OPACITY);
		s.tick(250.0);
		assert_eq!(s.nodes[2].style.value(), Style::dimmed());
		assert_eq!(s.links[1].style.value(), Style::dimmed());
		assert_eq!(s.marker("end-arrowhead-B-C").unwrap().fill.value(), DIMMED_MARKER);
		assert_eq!(
			s.marker("end-arrowhead-A-B").unwrap().fill.value(),
			Rgb(0xeb, 0x5f, 0x5e)
		);
	}

	#[test]
	fn inspection_fills_and_clears_details() {
		let mut s = session();
		s.select(Some(0), false);
		assert!(s.select(Some(1), true));
		assert_eq!(s.selection.mode(), SelectionMode::LinkInspected);
		let details = s.details.clone().unwrap();
		assert_eq!(details.title, "EDGES [A, B]");
		assert_eq!(details.edges.len(), 2);

		assert!(!s.select(Some(2), true));
		assert!(s.details.is_some());

		s.select(None, false);
		assert!(s.details.is_none());
		assert_eq!(s.selection.root, None);
	}

	#[test]
	fn settling_fits_the_camera() {
		let mut s = session();
		settle(&mut s);
		assert!(!s.simulation.is_running());
		let t = s.transform();
		assert!(t.k > 0.0);
		assert_ne!(t, ZoomTransform::default());
		let bounds = s.content_bounds().unwrap();
		let (cx, cy) = bounds.center();
		let screen = (cx * t.k + t.x, cy * t.k + t.y);
		assert!((screen.0 - (800.0 / 2.0 + 70.0)).abs() < 1e-6);
		assert!((screen.1 - 300.0).abs() < 1e-6);
	}

	#[test]
	fn click_hits_node_under_pointer() {
		let mut s = session();
		settle(&mut s);
		let t = s.transform();
		let (x, y) = s.node_position(1).unwrap();
		assert_eq!(s.node_at_position(x * t.k + t.x, y * t.k + t.y), Some(1));
		assert!(s.click(x * t.k + t.x, y * t.k + t.y, false));
		assert_eq!(s.selection.root, Some(1));
		assert!(s.click(-10_000.0, -10_000.0, false));
		assert_eq!(s.selection.root, None);
	}

	#[test]
	fn degenerate_network_never_fits() {
		let mut s = NetworkSession::create(Graph::default(), 800.0, 600.0, VizConfig::default());
		settle(&mut s);
		assert!(!s.zoom_fit(500.0));
		assert_eq!(s.transform(), ZoomTransform::default());

		let lonely = Graph::from_json(r#"{"nodes": [{"id": "solo"}]}"#).unwrap();
		let mut s = NetworkSession::create(lonely, 800.0, 600.0, VizConfig::default());
		settle(&mut s);
		assert!(!s.zoom_fit(500.0));
		assert_eq!(s.transform(), ZoomTransform::default());
	}

	#[test]
	fn zoom_step_respects_extent() {
		let mut s = session();
		for _ in 0..20 {
			s.zoom_step(2.0);
		}
		s.tick(1_000.0);
		assert_eq!(s.transform().k, 4.0);
		s.zoom_at(100.0, 100.0, 0.0001);
		assert_eq!(s.transform().k, 0.25);
	}

	#[test]
	fn zoom_step_pivots_on_canvas_center() {
		let mut s = session();
		let before = s.camera.target().screen_to_world(435.0, 300.0);
		s.zoom_step(1.2);
		let target = s.camera.target();
		assert_eq!(target.k, 1.2);
		let (wx, wy) = target.screen_to_world(435.0, 300.0);
		assert!((wx - before.0).abs() < 1e-9);
		assert!((wy - before.1).abs() < 1e-9);
	}

	#[test]
	fn pan_reports_drag() {
		let mut s = session();
		s.begin_pan(10.0, 10.0);
		s.pan_to(50.0, 10.0);
		assert_eq!(s.transform().x, 40.0);
		assert!(s.end_pan());

		s.begin_pan(10.0, 10.0);
		assert!(!s.end_pan());
	}

	#[test]
	fn destroy_clears_selection() {
		let mut s = session();
		s.select(Some(0), false);
		s.select(Some(1), true);
		s.destroy();
		assert_eq!(s.selection.mode(), SelectionMode::Unselected);
		assert!(s.details.is_none());
		assert!(!s.animation_running);
	}
}
