use leptos::prelude::*;
use serde::Deserialize;

/// Completion flags reported by the backend for the three pipeline stages.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct StepState {
	#[serde(default)]
	pub preprocess: bool,
	#[serde(default)]
	pub augment: bool,
	#[serde(default)]
	pub tree: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineProgress {
	pub percentage: f64,
	pub current_step: String,
	pub estimated_time: String,
	pub is_running: bool,
}

/// Partial progress update; unset fields keep their previous values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressPatch {
	pub percentage: Option<f64>,
	pub current_step: Option<String>,
	pub estimated_time: Option<String>,
	pub is_running: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
	pub input_path: String,
	pub output_path: String,
	pub step_state: StepState,
	pub graph_path: String,
	pub concepts: Vec<String>,
	pub progress: PipelineProgress,
}

/// The closed set of transitions the UI state admits.
#[derive(Clone, Debug)]
pub enum Action {
	SetInput(String),
	SetOutput(String),
	LoadState(StepState),
	SetGraph(String),
	SetConcepts(Vec<String>),
	SetProgress(ProgressPatch),
	ResetProgress,
}

pub fn reduce(mut state: AppState, action: Action) -> AppState {
	match action {
		Action::SetInput(path) => state.input_path = path,
		Action::SetOutput(path) => state.output_path = path,
		Action::LoadState(steps) => state.step_state = steps,
		Action::SetGraph(path) => state.graph_path = path,
		Action::SetConcepts(concepts) => state.concepts = concepts,
		Action::SetProgress(patch) => {
			let p = &mut state.progress;
			if let Some(v) = patch.percentage {
				p.percentage = v;
			}
			if let Some(v) = patch.current_step {
				p.current_step = v;
			}
			if let Some(v) = patch.estimated_time {
				p.estimated_time = v;
			}
			if let Some(v) = patch.is_running {
				p.is_running = v;
			}
		}
		Action::ResetProgress => state.progress = PipelineProgress::default(),
	}
	state
}

/// Context handle around the single app-state signal. Components read
/// through `state` and mutate only by dispatching actions.
#[derive(Clone, Copy)]
pub struct AppStore {
	state: RwSignal<AppState>,
}

impl AppStore {
	pub fn state(&self) -> RwSignal<AppState> {
		self.state
	}

	pub fn dispatch(&self, action: Action) {
		self.state.update(|s| *s = reduce(s.clone(), action));
	}
}

pub fn provide_app_store() {
	provide_context(AppStore {
		state: RwSignal::new(AppState::default()),
	});
}

pub fn use_app_store() -> AppStore {
	expect_context::<AppStore>()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn setters_replace_only_their_own_field() {
		let s = reduce(AppState::default(), Action::SetInput("/in".into()));
		let s = reduce(s, Action::SetOutput("/out".into()));
		assert_eq!(s.input_path, "/in");
		assert_eq!(s.output_path, "/out");
		assert!(s.graph_path.is_empty());
	}

	#[test]
	fn progress_patch_merges_over_previous_values() {
		let mut s = AppState::default();
		s.progress.current_step = "preprocess".into();
		s.progress.is_running = true;
		let s = reduce(
			s,
			Action::SetProgress(ProgressPatch {
				percentage: Some(40.0),
				..ProgressPatch::default()
			}),
		);
		assert_eq!(s.progress.percentage, 40.0);
		assert_eq!(s.progress.current_step, "preprocess");
		assert!(s.progress.is_running);
	}

	#[test]
	fn reset_progress_returns_to_idle_zero() {
		let mut s = AppState::default();
		s.progress = PipelineProgress {
			percentage: 80.0,
			current_step: "tree".into(),
			estimated_time: "2m 0s".into(),
			is_running: true,
		};
		let s = reduce(s, Action::ResetProgress);
		assert_eq!(s.progress, PipelineProgress::default());
	}

	#[test]
	fn step_state_deserializes_with_missing_flags() {
		let steps: StepState = serde_json::from_str(r#"{"preprocess":true}"#).unwrap();
		assert!(steps.preprocess);
		assert!(!steps.augment);
		assert!(!steps.tree);
	}
}
