use serde::Deserialize;

fn default_val() -> f64 {
	1.0
}

/// A concept extracted by the backend pipeline.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub name: String,
	#[serde(default = "default_val")]
	pub val: f64,
}

/// A directed relation between two concepts. Duplicate pairs are allowed.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub label: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GraphDataset {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphEdge>,
}

impl GraphDataset {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.nodes.iter().any(|n| n.id == id)
	}

	pub fn node_names(&self) -> Vec<String> {
		self.nodes.iter().map(|n| n.name.clone()).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_val_defaults_when_absent() {
		let data: GraphDataset = serde_json::from_str(
			r#"{"nodes":[{"id":"a","name":"A"}],"links":[{"source":"a","target":"b"}]}"#,
		)
		.unwrap();
		assert_eq!(data.nodes[0].val, 1.0);
		assert_eq!(data.links[0].label, "");
	}

	#[test]
	fn missing_links_deserialize_to_empty() {
		let data: GraphDataset =
			serde_json::from_str(r#"{"nodes":[{"id":"a","name":"A","val":3.0}]}"#).unwrap();
		assert!(data.links.is_empty());
		assert!(data.contains_node("a"));
		assert!(!data.contains_node("b"));
	}
}
