//! Force-directed layout with a d3-force style cooling schedule.
//!
//! Three forces act per tick, in order: a spring force along every bundle
//! whose strength follows the bundle's aggregate prediction score, a
//! many-body repulsion approximated with a quadtree, and a centering shift
//! of the barycenter.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::warn;

use super::quadtree::QuadTree;
use super::scale::LinearScale;
use super::types::Graph;
use crate::config::VizConfig;

const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.4;
const INITIAL_RADIUS: f64 = 10.0;
/// Barnes–Hut opening angle.
const THETA: f64 = 0.9;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
}

#[derive(Clone, Copy, Debug)]
struct SimLink {
	/// Index into `Graph::links`.
	bundle: usize,
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// Small deterministic generator for breaking exact overlaps.
#[derive(Clone, Debug)]
pub struct Jiggle(u32);

impl Default for Jiggle {
	fn default() -> Self {
		Self(0x9e37_79b9)
	}
}

impl Jiggle {
	pub fn next(&mut self) -> f64 {
		// Numerical Recipes LCG
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		((self.0 as f64 / u32::MAX as f64) - 0.5) * 1e-6
	}
}

pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	alpha: f64,
	alpha_decay: f64,
	charge: f64,
	distance: f64,
	center: (f64, f64),
	running: bool,
	jiggle: Jiggle,
}

impl Simulation {
	pub fn new(graph: &Graph, center: (f64, f64), config: &VizConfig) -> Self {
		let initial_angle = PI * (3.0 - 5.0_f64.sqrt());
		let nodes = (0..graph.nodes.len())
			.map(|i| {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * initial_angle;
				SimNode {
					x: radius * angle.cos(),
					y: radius * angle.sin(),
					..SimNode::default()
				}
			})
			.collect::<Vec<_>>();

		let index_by_id: HashMap<&str, usize> = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.as_str(), i))
			.collect();

		let scale = LinearScale::from_extent(
			graph.links.iter().map(|link| link.aggregate_score()),
			config.link_strength_range,
		);

		let mut degree = vec![0usize; nodes.len()];
		let mut links = Vec::with_capacity(graph.links.len());
		for (bundle, link) in graph.links.iter().enumerate() {
			let (Some(&source), Some(&target)) = (
				index_by_id.get(link.source.as_str()),
				index_by_id.get(link.target.as_str()),
			) else {
				warn!(
					"Skipping link {} -> {}: endpoint not in node set",
					link.source, link.target
				);
				continue;
			};
			degree[source] += 1;
			degree[target] += 1;
			links.push(SimLink {
				bundle,
				source,
				target,
				strength: scale.apply(link.aggregate_score()),
				bias: 0.0,
			});
		}
		for link in &mut links {
			let (s, t) = (degree[link.source] as f64, degree[link.target] as f64);
			link.bias = s / (s + t);
		}

		Self {
			nodes,
			links,
			alpha: 1.0,
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
			charge: config.charge_strength,
			distance: config.link_distance,
			center,
			running: true,
			jiggle: Jiggle::default(),
		}
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn node(&self, index: usize) -> Option<&SimNode> {
		self.nodes.get(index)
	}

	/// `(bundle index, source node, target node)` for every simulated link.
	pub fn link_endpoints(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
		self.links
			.iter()
			.map(|link| (link.bundle, link.source, link.target))
	}

	/// Strength of each simulated link, in bundle order.
	#[cfg(test)]
	fn link_strengths(&self) -> Vec<f64> {
		self.links.iter().map(|link| link.strength).collect()
	}

	#[cfg(test)]
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Advances one step. Returns `true` on the tick the simulation settles.
	pub fn tick(&mut self) -> bool {
		if !self.running {
			return false;
		}

		self.alpha += (0.0 - self.alpha) * self.alpha_decay;
		self.apply_links();
		self.apply_charge();
		self.apply_center();

		for node in &mut self.nodes {
			node.vx *= 1.0 - VELOCITY_DECAY;
			node.vy *= 1.0 - VELOCITY_DECAY;
			node.x += node.vx;
			node.y += node.vy;
		}

		if self.alpha < ALPHA_MIN {
			self.running = false;
			return true;
		}
		false
	}

	fn apply_links(&mut self) {
		let alpha = self.alpha;
		for link in &self.links {
			let (source, target) = (self.nodes[link.source], self.nodes[link.target]);
			let mut x = target.x + target.vx - source.x - source.vx;
			let mut y = target.y + target.vy - source.y - source.vy;
			if x == 0.0 {
				x = self.jiggle.next();
			}
			if y == 0.0 {
				y = self.jiggle.next();
			}
			let distance = (x * x + y * y).sqrt();
			let l = (distance - self.distance) / distance * alpha * link.strength;
			x *= l;
			y *= l;

			let b = link.bias;
			let target = &mut self.nodes[link.target];
			target.vx -= x * b;
			target.vy -= y * b;
			let source = &mut self.nodes[link.source];
			source.vx += x * (1.0 - b);
			source.vy += y * (1.0 - b);
		}
	}

	fn apply_charge(&mut self) {
		let weight = self.charge * self.alpha;
		let points: Vec<(f64, f64)> = self.nodes.iter().map(|node| (node.x, node.y)).collect();
		let Some(tree) = QuadTree::build(&points) else {
			return;
		};
		for (i, node) in self.nodes.iter_mut().enumerate() {
			let (px, py) = tree.pull_on(i, &points, THETA, &mut self.jiggle);
			node.vx += px * weight;
			node.vy += py * weight;
		}
	}

	fn apply_center(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (dx, dy) = (sx / n - self.center.0, sy / n - self.center.1);
		for node in &mut self.nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}
}
