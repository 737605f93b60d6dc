use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::physics::{LayoutSim, PhysicsConfig};
use super::types::GraphDataset;

/// Seconds of stabilization left after a reheat.
const REHEAT_SECS: f64 = 3.0;
/// Minimum world-space hit radius so tiny nodes stay clickable.
const MIN_HIT_RADIUS: f64 = 8.0;

#[derive(Clone, Debug, Default)]
pub struct NodeBody {
	pub id: String,
	pub name: String,
	pub val: f64,
}

#[derive(Clone, Debug)]
pub struct EdgeLine {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: f64,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

pub struct GraphViewState {
	data: GraphDataset,
	pub graph: ForceGraph<NodeBody, ()>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	idx_to_id: HashMap<DefaultNodeIdx, String>,
	edges: Vec<EdgeLine>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hovered_edge: Option<usize>,
	pub width: f64,
	pub height: f64,
	pub config: PhysicsConfig,
	cooldown: f64,
}

// Spring pull and charge push both scale with the requested rest distance.
fn sim_params(config: &PhysicsConfig) -> SimulationParameters {
	let scale = config.link_distance / PhysicsConfig::default().link_distance;
	SimulationParameters {
		force_charge: (150.0 * scale) as f32,
		force_spring: (0.05 / scale) as f32,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

impl GraphViewState {
	pub fn new(data: &GraphDataset, config: &PhysicsConfig, width: f64, height: f64) -> Self {
		let mut state = Self {
			data: data.clone(),
			graph: ForceGraph::new(sim_params(config)),
			id_to_idx: HashMap::new(),
			idx_to_id: HashMap::new(),
			edges: Vec::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hovered_edge: None,
			width,
			height,
			config: *config,
			cooldown: REHEAT_SECS,
		};
		state.populate(None);
		state
	}

	/// Builds the simulation graph from the dataset. Edges with endpoints
	/// missing from the node list are skipped rather than rejected.
	fn populate(&mut self, keep_positions: Option<&HashMap<String, (f32, f32)>>) {
		self.graph = ForceGraph::new(sim_params(&self.config));
		self.id_to_idx.clear();
		self.idx_to_id.clear();
		self.edges.clear();

		let n = self.data.nodes.len().max(1);
		for (i, node) in self.data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / n as f64;
			let seeded = (
				(self.width / 2.0 + 100.0 * angle.cos()) as f32,
				(self.height / 2.0 + 100.0 * angle.sin()) as f32,
			);
			let (x, y) = keep_positions
				.and_then(|m| m.get(&node.id))
				.copied()
				.unwrap_or(seeded);

			let idx = self.graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeBody {
					id: node.id.clone(),
					name: node.name.clone(),
					val: node.val,
				},
			});
			self.id_to_idx.insert(node.id.clone(), idx);
			self.idx_to_id.insert(idx, node.id.clone());
		}

		for link in &self.data.links {
			if let (Some(&src), Some(&tgt)) = (
				self.id_to_idx.get(&link.source),
				self.id_to_idx.get(&link.target),
			) {
				self.graph.add_edge(src, tgt, EdgeData::default());
				self.edges.push(EdgeLine {
					source: src,
					target: tgt,
					label: link.label.clone(),
				});
			}
		}
	}

	pub fn edges(&self) -> &[EdgeLine] {
		&self.edges
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<&str> {
		self.idx_to_id.get(&idx).map(String::as_str)
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::with_capacity(self.idx_to_id.len());
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_radius(&self, val: f64) -> f64 {
		val.max(0.0).sqrt() * self.config.node_base_size
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let hit = self.node_radius(node.data.user_data.val).max(MIN_HIT_RADIUS);
			if (dx * dx + dy * dy).sqrt() < hit {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.positions();
		let threshold = 6.0 / self.transform.k.max(0.1);
		let mut found = None;
		for (i, edge) in self.edges.iter().enumerate() {
			let (Some(&(x1, y1)), Some(&(x2, y2))) =
				(positions.get(&edge.source), positions.get(&edge.target))
			else {
				continue;
			};
			if segment_distance(gx, gy, x1, y1, x2, y2) < threshold {
				found = Some(i);
			}
		}
		found
	}

	pub fn tick(&mut self, dt: f32) {
		if self.cooldown <= 0.0 {
			return;
		}
		self.graph.update(dt);
		self.cooldown = (self.cooldown - dt as f64).max(0.0);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

impl LayoutSim for GraphViewState {
	fn apply(&mut self, config: &PhysicsConfig) {
		self.config = *config;
		// Re-parameterize in place: rebuild the simulation but keep every
		// node where the previous run left it.
		let mut positions: HashMap<String, (f32, f32)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.data.user_data.id.clone(), (node.x(), node.y()));
		});
		self.populate(Some(&positions));
	}

	fn reheat(&mut self) {
		self.cooldown = REHEAT_SECS;
	}
}

impl LayoutSim for Option<GraphViewState> {
	fn apply(&mut self, config: &PhysicsConfig) {
		if let Some(state) = self {
			state.apply(config);
		}
	}

	fn reheat(&mut self) {
		if let Some(state) = self {
			state.reheat();
		}
	}
}

fn segment_distance(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let len_sq = dx * dx + dy * dy;
	if len_sq < 1e-9 {
		return ((px - x1).powi(2) + (py - y1).powi(2)).sqrt();
	}
	let t = (((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0);
	let (cx, cy) = (x1 + t * dx, y1 + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn segment_distance_handles_interior_and_endpoints() {
		assert!((segment_distance(5.0, 3.0, 0.0, 0.0, 10.0, 0.0) - 3.0).abs() < 1e-9);
		assert!((segment_distance(-4.0, 0.0, 0.0, 0.0, 10.0, 0.0) - 4.0).abs() < 1e-9);
		// Degenerate segment falls back to point distance.
		assert!((segment_distance(3.0, 4.0, 0.0, 0.0, 0.0, 0.0) - 5.0).abs() < 1e-9);
	}
}
