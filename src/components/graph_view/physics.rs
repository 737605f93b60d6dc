/// Tunable layout parameters for the force view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsConfig {
	pub link_distance: f64,
	pub node_font_size: f64,
	pub edge_font_size: f64,
	pub line_width: f64,
	pub node_base_size: f64,
}

impl Default for PhysicsConfig {
	fn default() -> Self {
		Self {
			link_distance: 65.0,
			node_font_size: 17.0,
			edge_font_size: 14.0,
			line_width: 3.0,
			node_base_size: 2.0,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKey {
	LinkDistance,
	NodeFontSize,
	EdgeFontSize,
	LineWidth,
	NodeBaseSize,
}

/// Slider metadata, shared by the UI controls and the controller's clamp.
#[derive(Clone, Copy, Debug)]
pub struct ParamSpec {
	pub key: ParamKey,
	pub label: &'static str,
	pub min: f64,
	pub max: f64,
	pub step: f64,
}

pub const PARAM_SPECS: &[ParamSpec] = &[
	ParamSpec {
		key: ParamKey::LinkDistance,
		label: "Link distance",
		min: 20.0,
		max: 500.0,
		step: 1.0,
	},
	ParamSpec {
		key: ParamKey::NodeFontSize,
		label: "Node font size",
		min: 8.0,
		max: 30.0,
		step: 1.0,
	},
	ParamSpec {
		key: ParamKey::EdgeFontSize,
		label: "Edge font size",
		min: 5.0,
		max: 27.0,
		step: 1.0,
	},
	ParamSpec {
		key: ParamKey::LineWidth,
		label: "Line width",
		min: 1.0,
		max: 6.0,
		step: 1.0,
	},
	ParamSpec {
		key: ParamKey::NodeBaseSize,
		label: "Node size",
		min: 0.5,
		max: 10.0,
		step: 0.1,
	},
];

impl ParamKey {
	pub fn spec(self) -> &'static ParamSpec {
		PARAM_SPECS
			.iter()
			.find(|s| s.key == self)
			.unwrap_or(&PARAM_SPECS[0])
	}
}

impl PhysicsConfig {
	pub fn get(&self, key: ParamKey) -> f64 {
		match key {
			ParamKey::LinkDistance => self.link_distance,
			ParamKey::NodeFontSize => self.node_font_size,
			ParamKey::EdgeFontSize => self.edge_font_size,
			ParamKey::LineWidth => self.line_width,
			ParamKey::NodeBaseSize => self.node_base_size,
		}
	}

	fn set(&mut self, key: ParamKey, value: f64) {
		match key {
			ParamKey::LinkDistance => self.link_distance = value,
			ParamKey::NodeFontSize => self.node_font_size = value,
			ParamKey::EdgeFontSize => self.edge_font_size = value,
			ParamKey::LineWidth => self.line_width = value,
			ParamKey::NodeBaseSize => self.node_base_size = value,
		}
	}
}

/// Seam between the controller and the running simulation. The canvas
/// state implements this; tests use a recording stub.
pub trait LayoutSim {
	fn apply(&mut self, config: &PhysicsConfig);
	fn reheat(&mut self);
}

/// Holds the physics configuration and keeps the simulation in sync with
/// it. Every explicit parameter change restarts stabilization; the initial
/// push happens exactly once, when the surface first has real dimensions.
#[derive(Clone, Debug, Default)]
pub struct LayoutController {
	config: PhysicsConfig,
	initialized: bool,
}

impl LayoutController {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn config(&self) -> PhysicsConfig {
		self.config
	}

	/// Merges one key into the config (clamped to its declared range,
	/// other keys untouched), pushes the config and reheats once.
	pub fn update_param(&mut self, sim: &mut dyn LayoutSim, key: ParamKey, value: f64) {
		let spec = key.spec();
		self.config.set(key, value.clamp(spec.min, spec.max));
		sim.apply(&self.config);
		sim.reheat();
	}

	/// One-shot initial push, latched on the first call that sees a
	/// non-zero surface. Later dimension events are no-ops.
	pub fn ensure_initialized(&mut self, sim: &mut dyn LayoutSim, width: f64, height: f64) -> bool {
		if self.initialized || width <= 0.0 || height <= 0.0 {
			return false;
		}
		sim.apply(&self.config);
		sim.reheat();
		self.initialized = true;
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Default)]
	struct RecordingSim {
		applied: Vec<PhysicsConfig>,
		reheats: usize,
	}

	impl LayoutSim for RecordingSim {
		fn apply(&mut self, config: &PhysicsConfig) {
			self.applied.push(*config);
		}

		fn reheat(&mut self) {
			self.reheats += 1;
		}
	}

	#[test]
	fn update_param_reheats_exactly_once_and_preserves_other_fields() {
		let mut ctl = LayoutController::new();
		let mut sim = RecordingSim::default();
		ctl.update_param(&mut sim, ParamKey::LinkDistance, 120.0);
		assert_eq!(sim.reheats, 1);
		let cfg = ctl.config();
		assert_eq!(cfg.link_distance, 120.0);
		let defaults = PhysicsConfig::default();
		assert_eq!(cfg.node_font_size, defaults.node_font_size);
		assert_eq!(cfg.edge_font_size, defaults.edge_font_size);
		assert_eq!(cfg.line_width, defaults.line_width);
		assert_eq!(cfg.node_base_size, defaults.node_base_size);
	}

	#[test]
	fn update_param_clamps_to_declared_range() {
		let mut ctl = LayoutController::new();
		let mut sim = RecordingSim::default();
		ctl.update_param(&mut sim, ParamKey::LinkDistance, 10_000.0);
		assert_eq!(ctl.config().link_distance, 500.0);
		ctl.update_param(&mut sim, ParamKey::NodeBaseSize, -3.0);
		assert_eq!(ctl.config().node_base_size, 0.5);
	}

	#[test]
	fn initialization_runs_once_for_the_first_real_dimensions() {
		let mut ctl = LayoutController::new();
		let mut sim = RecordingSim::default();
		assert!(!ctl.ensure_initialized(&mut sim, 0.0, 480.0));
		assert_eq!(sim.reheats, 0);
		assert!(ctl.ensure_initialized(&mut sim, 640.0, 480.0));
		assert_eq!(sim.reheats, 1);
		// Resize events after the first pass must not re-trigger it.
		assert!(!ctl.ensure_initialized(&mut sim, 800.0, 600.0));
		assert_eq!(sim.reheats, 1);
	}

	#[test]
	fn explicit_updates_reheat_even_after_initialization() {
		let mut ctl = LayoutController::new();
		let mut sim = RecordingSim::default();
		ctl.ensure_initialized(&mut sim, 640.0, 480.0);
		ctl.update_param(&mut sim, ParamKey::LineWidth, 5.0);
		assert_eq!(sim.reheats, 2);
		assert_eq!(sim.applied.last().unwrap().line_width, 5.0);
	}
}
