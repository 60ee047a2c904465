//! Click-driven selection model and the restyle plan it produces.
//!
//! A plain click re-roots the exploration on a node (or clears it on the
//! background). A ctrl/meta click on a neighbor of the current root narrows
//! the highlight to the single bundle between the two. Everything here is
//! pure; [`Restyle`] is applied to the scene by the session.

use super::adjacency::AdjacencyIndex;
use super::style::Emphasis;
use super::types::Graph;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
	Unselected,
	RootSelected,
	LinkInspected,
}

/// Focal node and its highlighted neighborhood, as node indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
	pub root: Option<usize>,
	/// Neighbors of `root`, excluding the root itself.
	pub linked: Vec<usize>,
	/// Neighbor picked by a modifier click, while inspecting a single link.
	pub inspected: Option<usize>,
}

/// Target emphasis for every rendered element after a click.
#[derive(Clone, Debug, PartialEq)]
pub struct Restyle {
	/// Per node, in `Graph::nodes` order.
	pub nodes: Vec<Emphasis>,
	/// Per bundle, in `Graph::links` order. Arrowhead markers follow their bundle.
	pub links: Vec<Emphasis>,
	/// Bundle under single-link inspection.
	pub inspected_link: Option<usize>,
}

impl SelectionState {
	pub fn mode(&self) -> SelectionMode {
		match (self.root, self.inspected) {
			(Some(_), Some(_)) => SelectionMode::LinkInspected,
			(Some(_), None) => SelectionMode::RootSelected,
			(None, _) => SelectionMode::Unselected,
		}
	}

	pub fn clear(&mut self) {
		*self = Self::default();
	}

	/// Handles a click on `target` (a node index, or `None` for the background).
	///
	/// Returns `None` when a modifier click is rejected; the state is then
	/// left exactly as it was.
	pub fn click(
		&mut self,
		target: Option<usize>,
		modifier: bool,
		graph: &Graph,
		adjacency: &AdjacencyIndex,
	) -> Option<Restyle> {
		let single_link = if modifier {
			match (self.root, target) {
				(Some(root), Some(d)) if root != d && self.linked.contains(&d) => true,
				_ => return None,
			}
		} else {
			match target {
				None => self.root = None,
				Some(d) if Some(d) != self.root => self.root = Some(d),
				Some(_) => {}
			}
			self.linked.clear();
			false
		};
		self.inspected = if single_link { target } else { None };

		let Some(d) = target else {
			return Some(Restyle {
				nodes: vec![Emphasis::Highlight; graph.nodes.len()],
				links: vec![Emphasis::Highlight; graph.links.len()],
				inspected_link: None,
			});
		};
		let root = self.root;
		let focus_id = graph.nodes[d].id.as_str();

		let mut nodes = Vec::with_capacity(graph.nodes.len());
		for (index, node) in graph.nodes.iter().enumerate() {
			let emphasis = if single_link {
				if Some(index) == root || index == d {
					Emphasis::Highlight
				} else {
					Emphasis::Dimmed
				}
			} else if adjacency.is_connected(&node.id, focus_id) {
				if index != d {
					self.linked.push(index);
				}
				Emphasis::Highlight
			} else {
				Emphasis::Dimmed
			};
			nodes.push(emphasis);
		}

		let root_id = root.map(|r| graph.nodes[r].id.as_str());
		let mut inspected_link = None;
		let links = graph
			.links
			.iter()
			.enumerate()
			.map(|(index, link)| {
				if !single_link && link.touches(focus_id) {
					return Emphasis::Highlight;
				}
				if single_link && root_id.is_some_and(|root_id| link.joins(root_id, focus_id)) {
					inspected_link.get_or_insert(index);
					return Emphasis::Highlight;
				}
				Emphasis::Dimmed
			})
			.collect();

		Some(Restyle {
			nodes,
			links,
			inspected_link,
		})
	}
}
