//! Side panel contents: the network summary and the single-link edge list.

use super::types::{GraphInformation, LinkBundle};

#[derive(Clone, Debug, PartialEq)]
pub struct MethodGroup {
	pub name: String,
	pub sub_methods: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeEntry {
	pub header: String,
	pub predicted: bool,
	/// Only set for predicted edges.
	pub score: Option<f64>,
	pub methods: Vec<MethodGroup>,
}

/// Everything shown while a single bundle is inspected.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeDetails {
	pub title: String,
	pub edges: Vec<EdgeEntry>,
}

impl EdgeDetails {
	pub fn from_bundle(bundle: &LinkBundle) -> Self {
		let (source, target) = bundle
			.edges
			.first()
			.map(|edge| (edge.source.as_str(), edge.target.as_str()))
			.unwrap_or((bundle.source.as_str(), bundle.target.as_str()));

		let edges = bundle
			.edges
			.iter()
			.map(|edge| EdgeEntry {
				header: format!("{} -> {}", edge.source, edge.target),
				predicted: edge.predicted,
				score: edge
					.predicted
					.then(|| edge.prediction_score.unwrap_or(0.0)),
				methods: if edge.predicted {
					edge.applied_methods
						.iter()
						.map(|(name, subs)| MethodGroup {
							name: name.clone(),
							sub_methods: subs.clone(),
						})
						.collect()
				} else {
					Vec::new()
				},
			})
			.collect();

		Self {
			title: format!("EDGES [{source}, {target}]"),
			edges,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodCounts {
	pub name: String,
	pub rows: Vec<(String, String)>,
}

/// General information panel, filled once per drawn network.
#[derive(Clone, Debug, PartialEq)]
pub struct InformationSummary {
	pub node_count: u64,
	pub directed_edge_count: u64,
	pub undirected_edge_count: u64,
	pub methods: Vec<MethodCounts>,
}

impl From<&GraphInformation> for InformationSummary {
	fn from(info: &GraphInformation) -> Self {
		Self {
			node_count: info.node_count,
			directed_edge_count: info.directed_edge_count,
			undirected_edge_count: info.undirected_edge_count,
			methods: info
				.methods_applied
				.iter()
				.map(|(name, counts)| MethodCounts {
					name: name.clone(),
					rows: counts
						.iter()
						.map(|(sub, count)| (sub.clone(), format_number(*count)))
						.collect(),
				})
				.collect(),
		}
	}
}

/// Whole numbers print without a fractional part.
pub fn format_number(value: f64) -> String {
	if value.fract() == 0.0 && value.abs() < 1e15 {
		format!("{}", value as i64)
	} else {
		format!("{value}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network::types::Graph;

	fn bundle() -> LinkBundle {
		let graph = Graph::from_json(
			r##"{"nodes": [{"id": "1"}, {"id": "2"}], "links": [
				{"source": "1", "target": "2", "edge_color": "#F3A533", "edges": [
					{"source": "1", "target": "2", "predicted": false},
					{"source": "2", "target": "1", "predicted": true, "prediction_score": 1.5,
					 "applied_methods": {"Social Theory": ["Homophily"], "Topology": ["Jaccard", "Adamic Adar"]}}
				]}
			]}"##,
		)
		.unwrap();
		graph.links[0].clone()
	}

	#[test]
	fn details_list_every_edge() {
		let details = EdgeDetails::from_bundle(&bundle());
		assert_eq!(details.title, "EDGES [1, 2]");
		assert_eq!(details.edges.len(), 2);

		let observed = &details.edges[0];
		assert_eq!(observed.header, "1 -> 2");
		assert!(!observed.predicted);
		assert_eq!(observed.score, None);
		assert!(observed.methods.is_empty());

		let predicted = &details.edges[1];
		assert_eq!(predicted.header, "2 -> 1");
		assert_eq!(predicted.score, Some(1.5));
		assert_eq!(predicted.methods.len(), 2);
		assert_eq!(predicted.methods[0].name, "Social Theory");
		assert_eq!(predicted.methods[1].sub_methods, vec!["Jaccard", "Adamic Adar"]);
	}

	#[test]
	fn summary_formats_counts() {
		let info: GraphInformation = serde_json::from_str(
			r#"{"node_count": 4, "directed_edge_count": 3, "undirected_edge_count": 1,
				"methods_applied": {"Topology": {"Jaccard": 3, "Weighted": 0.5}}}"#,
		)
		.unwrap();
		let summary = InformationSummary::from(&info);
		assert_eq!(summary.node_count, 4);
		assert_eq!(summary.methods[0].name, "Topology");
		assert_eq!(
			summary.methods[0].rows,
			vec![
				("Jaccard".to_string(), "3".to_string()),
				("Weighted".to_string(), "0.5".to_string())
			]
		);
	}
}
