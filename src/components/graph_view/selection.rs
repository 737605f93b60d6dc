use std::collections::HashSet;

use super::types::GraphDataset;

/// Click-handling policy for the graph view. Exactly one is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
	#[default]
	Normal,
	SelectNeighbors,
	RemoveNeighbors,
}

/// Source of randomness for sampling. Injectable so tests can seed it.
pub trait RandomSource {
	fn next_u64(&mut self) -> u64;

	fn next_index(&mut self, bound: usize) -> usize {
		if bound <= 1 {
			return 0;
		}
		(self.next_u64() % bound as u64) as usize
	}
}

/// xorshift64* generator. Not cryptographic; good enough for UI sampling.
#[derive(Clone, Debug)]
pub struct XorShiftRng {
	state: u64,
}

impl XorShiftRng {
	pub fn new(seed: u64) -> Self {
		// Avoid a zero state.
		let state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
		Self { state }
	}
}

impl RandomSource for XorShiftRng {
	fn next_u64(&mut self) -> u64 {
		let mut x = self.state;
		x ^= x >> 12;
		x ^= x << 25;
		x ^= x >> 27;
		self.state = x;
		x.wrapping_mul(0x2545_F491_4F6C_DD1D)
	}
}

/// Owns the loaded dataset, the selected node ids and the active
/// interaction mode, and resolves node clicks against all three.
#[derive(Clone, Debug, Default)]
pub struct SelectionEngine {
	data: GraphDataset,
	selected: HashSet<String>,
	mode: InteractionMode,
}

impl SelectionEngine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the dataset wholesale. Every reload starts a new selection
	/// session; nothing carries over.
	pub fn load_dataset(&mut self, data: GraphDataset) {
		self.data = data;
		self.selected.clear();
	}

	pub fn data(&self) -> &GraphDataset {
		&self.data
	}

	pub fn mode(&self) -> InteractionMode {
		self.mode
	}

	pub fn set_mode(&mut self, mode: InteractionMode) {
		self.mode = mode;
	}

	/// Button semantics: activating a non-Normal mode turns the other one
	/// off; activating the mode that is already on returns to Normal.
	pub fn toggle_mode(&mut self, mode: InteractionMode) {
		self.mode = if self.mode == mode {
			InteractionMode::Normal
		} else {
			mode
		};
	}

	pub fn selected_ids(&self) -> &HashSet<String> {
		&self.selected
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.contains(id)
	}

	pub fn selection_len(&self) -> usize {
		self.selected.len()
	}

	/// Display names of the selected nodes, in dataset order.
	pub fn selected_names(&self) -> Vec<String> {
		self.data
			.nodes
			.iter()
			.filter(|n| self.selected.contains(&n.id))
			.map(|n| n.name.clone())
			.collect()
	}

	/// The node plus every node one edge away, direction-agnostic.
	/// Derived from the edge list at call time; dangling endpoints are
	/// ignored when membership is applied.
	fn closed_neighborhood(&self, id: &str) -> HashSet<String> {
		let mut hood = HashSet::new();
		hood.insert(id.to_string());
		for link in &self.data.links {
			if link.source == id {
				hood.insert(link.target.clone());
			} else if link.target == id {
				hood.insert(link.source.clone());
			}
		}
		hood
	}

	pub fn on_node_click(&mut self, id: &str) {
		if !self.data.contains_node(id) {
			return;
		}
		match self.mode {
			InteractionMode::Normal => {
				if !self.selected.remove(id) {
					self.selected.insert(id.to_string());
				}
			}
			InteractionMode::SelectNeighbors => {
				for n in self.closed_neighborhood(id) {
					if self.data.contains_node(&n) {
						self.selected.insert(n);
					}
				}
			}
			InteractionMode::RemoveNeighbors => {
				for n in self.closed_neighborhood(id) {
					self.selected.remove(&n);
				}
			}
		}
	}

	pub fn clear_selection(&mut self) {
		self.selected.clear();
	}

	/// Replaces the selection with `min(k, |nodes|)` distinct nodes drawn
	/// via a Fisher-Yates shuffle over the injected source.
	pub fn random_select(&mut self, k: usize, rng: &mut dyn RandomSource) {
		let n = self.data.nodes.len();
		if n == 0 {
			return;
		}
		let k = k.min(n);
		let mut order: Vec<usize> = (0..n).collect();
		for i in (1..n).rev() {
			let j = rng.next_index(i + 1);
			order.swap(i, j);
		}
		self.selected = order
			.into_iter()
			.take(k)
			.map(|i| self.data.nodes[i].id.clone())
			.collect();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::types::{GraphEdge, GraphNode};

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.to_string(),
			name: id.to_ascii_uppercase(),
			val: 1.0,
		}
	}

	fn edge(source: &str, target: &str) -> GraphEdge {
		GraphEdge {
			source: source.to_string(),
			target: target.to_string(),
			label: String::new(),
		}
	}

	fn chain_abc() -> GraphDataset {
		GraphDataset {
			nodes: vec![node("a"), node("b"), node("c")],
			links: vec![edge("a", "b"), edge("b", "c")],
		}
	}

	fn engine(data: GraphDataset) -> SelectionEngine {
		let mut e = SelectionEngine::new();
		e.load_dataset(data);
		e
	}

	#[test]
	fn normal_mode_double_click_restores_prior_selection() {
		let mut e = engine(chain_abc());
		e.on_node_click("a");
		assert!(e.is_selected("a"));
		e.on_node_click("a");
		assert!(!e.is_selected("a"));
		assert_eq!(e.selection_len(), 0);
	}

	#[test]
	fn normal_mode_toggle_leaves_other_nodes_alone() {
		let mut e = engine(chain_abc());
		e.on_node_click("a");
		e.on_node_click("b");
		e.on_node_click("a");
		assert!(e.is_selected("b"));
		assert!(!e.is_selected("a"));
	}

	#[test]
	fn select_neighbors_takes_closed_neighborhood_union() {
		let mut e = engine(chain_abc());
		e.set_mode(InteractionMode::SelectNeighbors);
		// b touches both a and c, so one click selects everything.
		e.on_node_click("b");
		assert_eq!(e.selection_len(), 3);
	}

	#[test]
	fn select_neighbors_never_shrinks_selection() {
		let mut e = engine(chain_abc());
		e.on_node_click("c");
		e.set_mode(InteractionMode::SelectNeighbors);
		for id in ["a", "b", "a", "c"] {
			let before = e.selection_len();
			e.on_node_click(id);
			assert!(e.selection_len() >= before);
		}
	}

	#[test]
	fn remove_neighbors_subtracts_closed_neighborhood() {
		let mut e = engine(chain_abc());
		e.set_mode(InteractionMode::SelectNeighbors);
		e.on_node_click("b");
		// Neighborhood of a is {a, b}; only c survives.
		e.set_mode(InteractionMode::RemoveNeighbors);
		e.on_node_click("a");
		assert_eq!(e.selected_names(), vec!["C".to_string()]);
	}

	#[test]
	fn remove_neighbors_never_grows_selection() {
		let mut e = engine(chain_abc());
		e.set_mode(InteractionMode::SelectNeighbors);
		e.on_node_click("b");
		e.set_mode(InteractionMode::RemoveNeighbors);
		for id in ["c", "c", "b"] {
			let before = e.selection_len();
			e.on_node_click(id);
			assert!(e.selection_len() <= before);
		}
	}

	#[test]
	fn isolated_node_neighborhood_is_just_itself() {
		let mut e = engine(GraphDataset {
			nodes: vec![node("a"), node("b")],
			links: vec![],
		});
		e.set_mode(InteractionMode::SelectNeighbors);
		e.on_node_click("a");
		assert!(e.is_selected("a"));
		assert_eq!(e.selection_len(), 1);
	}

	#[test]
	fn click_on_empty_dataset_is_a_noop() {
		let mut e = SelectionEngine::new();
		e.on_node_click("a");
		assert_eq!(e.selection_len(), 0);
	}

	#[test]
	fn dangling_edge_endpoints_are_not_selected() {
		let mut e = engine(GraphDataset {
			nodes: vec![node("a")],
			links: vec![edge("a", "ghost")],
		});
		e.set_mode(InteractionMode::SelectNeighbors);
		e.on_node_click("a");
		assert!(e.is_selected("a"));
		assert!(!e.is_selected("ghost"));
		assert_eq!(e.selection_len(), 1);
	}

	#[test]
	fn edges_are_undirected_for_adjacency() {
		let mut e = engine(chain_abc());
		e.set_mode(InteractionMode::SelectNeighbors);
		// a is only an edge *source*; clicking c must still reach b.
		e.on_node_click("c");
		assert!(e.is_selected("b"));
		assert!(e.is_selected("c"));
		assert!(!e.is_selected("a"));
	}

	#[test]
	fn toggling_active_mode_returns_to_normal() {
		let mut e = engine(chain_abc());
		e.toggle_mode(InteractionMode::SelectNeighbors);
		assert_eq!(e.mode(), InteractionMode::SelectNeighbors);
		e.toggle_mode(InteractionMode::SelectNeighbors);
		assert_eq!(e.mode(), InteractionMode::Normal);
	}

	#[test]
	fn non_normal_modes_are_mutually_exclusive() {
		let mut e = engine(chain_abc());
		e.toggle_mode(InteractionMode::SelectNeighbors);
		e.toggle_mode(InteractionMode::RemoveNeighbors);
		assert_eq!(e.mode(), InteractionMode::RemoveNeighbors);
		e.set_mode(InteractionMode::SelectNeighbors);
		assert_eq!(e.mode(), InteractionMode::SelectNeighbors);
	}

	#[test]
	fn mode_changes_keep_the_selection() {
		let mut e = engine(chain_abc());
		e.on_node_click("a");
		e.toggle_mode(InteractionMode::RemoveNeighbors);
		assert!(e.is_selected("a"));
	}

	#[test]
	fn load_dataset_always_clears_selection() {
		let mut e = engine(chain_abc());
		e.on_node_click("a");
		e.on_node_click("b");
		e.load_dataset(chain_abc());
		assert_eq!(e.selection_len(), 0);
	}

	#[test]
	fn random_select_replaces_rather_than_unions() {
		let mut e = engine(chain_abc());
		e.on_node_click("a");
		e.on_node_click("b");
		e.on_node_click("c");
		let mut rng = XorShiftRng::new(7);
		e.random_select(1, &mut rng);
		assert_eq!(e.selection_len(), 1);
	}

	#[test]
	fn random_select_clamps_k_to_node_count() {
		let mut e = engine(chain_abc());
		let mut rng = XorShiftRng::new(42);
		e.random_select(100, &mut rng);
		assert_eq!(e.selection_len(), 3);
	}

	#[test]
	fn random_select_yields_distinct_ids_from_the_dataset() {
		let mut e = engine(chain_abc());
		let mut rng = XorShiftRng::new(3);
		e.random_select(2, &mut rng);
		assert_eq!(e.selection_len(), 2);
		for id in e.selected_ids() {
			assert!(e.data().contains_node(id));
		}
	}

	#[test]
	fn random_select_is_deterministic_for_a_fixed_seed() {
		let pick = |seed: u64| {
			let mut e = engine(chain_abc());
			let mut rng = XorShiftRng::new(seed);
			e.random_select(2, &mut rng);
			let mut ids: Vec<String> = e.selected_ids().iter().cloned().collect();
			ids.sort();
			ids
		};
		assert_eq!(pick(9), pick(9));
	}

	#[test]
	fn random_select_on_empty_dataset_is_a_noop() {
		let mut e = SelectionEngine::new();
		let mut rng = XorShiftRng::new(1);
		e.random_select(3, &mut rng);
		assert_eq!(e.selection_len(), 0);
	}
}
