use indexmap::IndexMap;
use serde::Deserialize;

/// Summary counts shipped alongside a predicted network. Display only.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphInformation {
	pub node_count: u64,
	pub directed_edge_count: u64,
	pub undirected_edge_count: u64,
	pub methods_applied: IndexMap<String, IndexMap<String, f64>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Node {
	pub id: String,
}

/// One predicted or observed relation.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Edge {
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub predicted: bool,
	#[serde(default)]
	pub prediction_score: Option<f64>,
	#[serde(default)]
	pub applied_methods: IndexMap<String, Vec<String>>,
}

/// All edges between an unordered endpoint pair, drawn as a single line.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LinkBundle {
	pub source: String,
	pub target: String,
	pub edge_color: String,
	pub edges: Vec<Edge>,
}

impl LinkBundle {
	/// Sum of the prediction scores of every edge, absent scores count as zero.
	pub fn aggregate_score(&self) -> f64 {
		self.edges
			.iter()
			.map(|edge| edge.prediction_score.unwrap_or(0.0))
			.sum()
	}

	/// Bundles carrying more than one edge get arrowheads at both ends.
	pub fn is_bidirectional(&self) -> bool {
		self.edges.len() > 1
	}

	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}

	/// True when this bundle joins `a` and `b` in either direction.
	pub fn joins(&self, a: &str, b: &str) -> bool {
		(self.source == a && self.target == b) || (self.source == b && self.target == a)
	}
}

/// Rendering input. Immutable for the lifetime of one session.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Graph {
	/// Counts shown in the general information panel.
	#[serde(default)]
	pub information: GraphInformation,
	/// Drawn in order; later nodes paint over earlier ones.
	#[serde(default)]
	pub nodes: Vec<Node>,
	/// One entry per connected node pair.
	#[serde(default)]
	pub links: Vec<LinkBundle>,
}

impl Graph {
	/// Decodes the predicted-network payload.
	pub fn from_json(text: &str) -> crate::Result<Self> {
		Ok(serde_json::from_str(text)?)
	}

	/// True when there is nothing to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const PAYLOAD: &str = r##"{
		"information": {
			"node_count": 3,
			"directed_edge_count": 2,
			"undirected_edge_count": 0,
			"methods_applied": {"Topology": {"Adamic Adar": 2, "Jaccard": 1}}
		},
		"nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
		"links": [
			{"source": "A", "target": "B", "edge_color": "#EB5F5E", "edges": [
				{"source": "A", "target": "B", "predicted": true, "prediction_score": 0.75,
				 "applied_methods": {"Topology": ["Adamic Adar", "Jaccard"]}},
				{"source": "B", "target": "A", "predicted": false}
			]},
			{"source": "B", "target": "C", "edge_color": "#000000", "edges": [
				{"source": "B", "target": "C", "predicted": false}
			]}
		]
	}"##;

	#[test]
	fn decodes_prediction_payload() {
		let graph = Graph::from_json(PAYLOAD).unwrap();
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.links.len(), 2);
		assert_eq!(graph.information.node_count, 3);
		let topology = &graph.information.methods_applied["Topology"];
		assert_eq!(
			topology.keys().collect::<Vec<_>>(),
			vec!["Adamic Adar", "Jaccard"]
		);

		let first = &graph.links[0];
		assert!(first.is_bidirectional());
		assert_eq!(first.edges[0].prediction_score, Some(0.75));
		assert_eq!(first.edges[0].applied_methods["Topology"].len(), 2);
		assert_eq!(first.edges[1].prediction_score, None);
		assert!(!graph.links[1].is_bidirectional());
	}

	#[test]
	fn aggregate_score_treats_missing_as_zero() {
		let graph = Graph::from_json(PAYLOAD).unwrap();
		assert_eq!(graph.links[0].aggregate_score(), 0.75);
		assert_eq!(graph.links[1].aggregate_score(), 0.0);
	}

	#[test]
	fn joins_ignores_direction() {
		let graph = Graph::from_json(PAYLOAD).unwrap();
		assert!(graph.links[0].joins("B", "A"));
		assert!(graph.links[0].joins("A", "B"));
		assert!(!graph.links[0].joins("A", "C"));
	}

	#[test]
	fn empty_payload_is_an_empty_graph() {
		let graph = Graph::from_json("{}").unwrap();
		assert!(graph.is_empty());
		assert!(graph.links.is_empty());
	}

	#[test]
	fn malformed_payload_is_a_decode_error() {
		assert!(matches!(
			Graph::from_json("{\"nodes\": 3}"),
			Err(crate::Error::Decode(_))
		));
	}
}
