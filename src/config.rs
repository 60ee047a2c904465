//! Tunables for the network viewer and the prediction monitor.
//!
//! Both structs deserialize with every field optional, so a host page can
//! override a single knob and keep the rest.

use serde::Deserialize;

/// Layout, camera and styling knobs of a network session.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct VizConfig {
	/// Many-body force strength; negative repels.
	pub charge_strength: f64,
	/// Rest length of the link force.
	pub link_distance: f64,
	/// Output range for link strengths rescaled from aggregate scores.
	pub link_strength_range: (f64, f64),
	/// Smallest scale reachable by wheel and button zoom.
	pub min_zoom: f64,
	/// Largest scale reachable by wheel and button zoom.
	pub max_zoom: f64,
	/// Share of the viewport the fitted scene may occupy.
	pub fit_padding: f64,
	/// Left gutter reserved for the collapsed sidebar toggle.
	pub sidebar_gutter: f64,
	/// Duration of the zoom-to-fit played once the layout settles.
	pub settle_fit_ms: f64,
	/// Duration of the zoom-to-fit played after a window resize.
	pub resize_fit_ms: f64,
	/// Duration of a zoom button step.
	pub zoom_step_ms: f64,
	/// Duration of highlight and dim transitions.
	pub restyle_ms: f64,
	/// Node circle radius in world units.
	pub node_radius: f64,
}

impl Default for VizConfig {
	fn default() -> Self {
		Self {
			charge_strength: -4000.0,
			link_distance: 30.0,
			link_strength_range: (0.05, 0.2),
			min_zoom: 0.25,
			max_zoom: 4.0,
			fit_padding: 0.85,
			sidebar_gutter: 70.0,
			settle_fit_ms: 500.0,
			resize_fit_ms: 500.0,
			zoom_step_ms: 200.0,
			restyle_ms: 500.0,
			node_radius: 15.0,
		}
	}
}

/// Where and how often the prediction status is polled.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
	/// Backend root, without a trailing `/projects`.
	pub api_base: String,
	/// Delay between two status requests.
	pub poll_interval_ms: i32,
}

impl Default for MonitorConfig {
	fn default() -> Self {
		Self {
			api_base: "http://localhost:8080/api".into(),
			poll_interval_ms: 100,
		}
	}
}
