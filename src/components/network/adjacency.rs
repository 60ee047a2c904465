use std::collections::{HashMap, HashSet};

use super::types::LinkBundle;

/// Read-only record of which id pairs are joined by a rendered bundle.
///
/// Targets are grouped under the bundle's source id; lookups check both
/// orderings and borrow the ids they are given.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	targets: HashMap<String, HashSet<String>>,
}

impl AdjacencyIndex {
	pub fn build(links: &[LinkBundle]) -> Self {
		let mut targets: HashMap<String, HashSet<String>> = HashMap::new();
		for link in links {
			targets
				.entry(link.source.clone())
				.or_default()
				.insert(link.target.clone());
		}
		Self { targets }
	}

	pub fn contains(&self, source: &str, target: &str) -> bool {
		self.targets
			.get(source)
			.is_some_and(|targets| targets.contains(target))
	}

	pub fn is_connected(&self, a: &str, b: &str) -> bool {
		a == b || self.contains(a, b) || self.contains(b, a)
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.targets.values().map(HashSet::len).sum()
	}
}
