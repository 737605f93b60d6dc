use leptos::prelude::*;
use leptos::task::spawn_local;
use log::info;

use crate::errors::{self, DisplayError};
use crate::estimate::{estimate_file, estimate_folder, format_duration, format_file_size};
use crate::rpc;
use crate::storage;
use crate::store::{Action, ProgressPatch, use_app_store};

use super::error_notice::ErrorNotice;
use super::progress::{ProgressPanel, ProgressStats};

fn file_extension(path: &str) -> Option<&str> {
	let name = path.rsplit(['/', '\\']).next()?;
	let (stem, ext) = name.rsplit_once('.')?;
	(!stem.is_empty()).then_some(ext)
}

/// Advisory prediction for the run, from folder metadata when the backend
/// can provide it, otherwise from the input path's extension.
async fn predict_run_secs(input_path: &str, first_step: &str) -> u64 {
	if let Some(info) = rpc::get_folder_info(input_path).await {
		info!(
			"input: {} files, {} ({:?})",
			info.file_count,
			format_file_size(info.total_size),
			info.file_types
		);
		return estimate_folder(info.total_size, info.file_count, &info.file_types, first_step);
	}
	let ext = file_extension(input_path).unwrap_or_default();
	// Without folder metadata the file size is unknown; a medium-bucket
	// guess keeps the figure in a plausible range.
	estimate_file(2 * 1024 * 1024, ext, first_step)
}

#[component]
pub fn PipelinePanel() -> impl IntoView {
	let store = use_app_store();
	let state = store.state();

	let preprocess = RwSignal::new(true);
	let augment = RwSignal::new(true);
	let tree = RwSignal::new(true);
	let pipeline_error: RwSignal<Option<DisplayError>> = RwSignal::new(None);

	let running = Memo::new(move |_| state.with(|s| s.progress.is_running));

	let pick_input = move |_| {
		spawn_local(async move {
			if let Some(path) = rpc::select_input().await {
				store.dispatch(Action::SetInput(path));
			}
		});
	};

	let pick_output = move |_| {
		spawn_local(async move {
			let Some(picked) = rpc::select_folder().await else {
				return;
			};
			// Best effort: the backend may normalize or create the folder.
			let path = rpc::create_output_folder(&picked).await.unwrap_or(picked);
			store.dispatch(Action::SetOutput(path.clone()));
			// The output folder remembers which stages already ran.
			if let Ok(steps) = rpc::load_state(&path).await {
				store.dispatch(Action::LoadState(steps));
			}
		});
	};

	let run = move |_| {
		let input_path = state.with_untracked(|s| s.input_path.clone());
		let output_path = state.with_untracked(|s| s.output_path.clone());
		let steps: Vec<String> = [
			("preprocess", preprocess.get_untracked()),
			("augment", augment.get_untracked()),
			("tree", tree.get_untracked()),
		]
		.iter()
		.filter(|(_, on)| *on)
		.map(|(name, _)| name.to_string())
		.collect();
		if input_path.is_empty() || output_path.is_empty() || steps.is_empty() {
			return;
		}

		pipeline_error.set(None);
		let first_step = steps[0].clone();
		store.dispatch(Action::SetProgress(ProgressPatch {
			percentage: Some(0.0),
			current_step: Some(first_step.clone()),
			estimated_time: Some(String::new()),
			is_running: Some(true),
		}));

		spawn_local(async move {
			let predicted = predict_run_secs(&input_path, &first_step).await;
			store.dispatch(Action::SetProgress(ProgressPatch {
				estimated_time: Some(format_duration(predicted)),
				..ProgressPatch::default()
			}));

			let started = js_sys::Date::now();
			let result = rpc::run_pipeline(&input_path, &output_path, &steps).await;
			let elapsed_secs = (js_sys::Date::now() - started) / 1000.0;

			match result {
				Ok(()) => {
					info!("pipeline finished in {elapsed_secs:.0}s");
					let mut history = storage::load_progress_history();
					history.record_run(&steps, elapsed_secs);
					let _ = storage::save_progress_history(&history);

					if let Ok(flags) = rpc::load_state(&output_path).await {
						store.dispatch(Action::LoadState(flags));
					}
					if steps.iter().any(|s| s == "tree") {
						let graph_path =
							format!("{}/tree/graph", output_path.trim_end_matches(['/', '\\']));
						store.dispatch(Action::SetGraph(graph_path));
					}
				}
				Err(failure) => {
					pipeline_error.set(Some(errors::resolve(&failure)));
				}
			}
			store.dispatch(Action::ResetProgress);
		});
	};

	let step_row = move |label: &'static str, flag: RwSignal<bool>, done: Memo<bool>| {
		view! {
			<label class="step-row">
				<input
					type="checkbox"
					prop:checked=move || flag.get()
					on:change=move |ev| flag.set(event_target_checked(&ev))
				/>
				{label}
				{move || done.get().then(|| view! { <span class="step-done">" (done)"</span> })}
			</label>
		}
	};

	let preprocess_done = Memo::new(move |_| state.with(|s| s.step_state.preprocess));
	let augment_done = Memo::new(move |_| state.with(|s| s.step_state.augment));
	let tree_done = Memo::new(move |_| state.with(|s| s.step_state.tree));

	view! {
		<section class="panel">
			<h1>"Pipeline"</h1>

			<ErrorNotice error=pipeline_error />

			<div class="path-card">
				<h2>"Input"</h2>
				<button type="button" on:click=pick_input disabled=move || running.get()>
					"Select input"
				</button>
				<p class="path-value">
					{move || {
						let path = state.with(|s| s.input_path.clone());
						if path.is_empty() { "not selected".to_string() } else { path }
					}}
				</p>
			</div>

			<div class="path-card">
				<h2>"Output"</h2>
				<button type="button" on:click=pick_output disabled=move || running.get()>
					"Select output"
				</button>
				<p class="path-value">
					{move || {
						let path = state.with(|s| s.output_path.clone());
						if path.is_empty() { "not selected".to_string() } else { path }
					}}
				</p>
			</div>

			<div class="path-card">
				<h2>"Steps"</h2>
				{step_row("preprocess", preprocess, preprocess_done)}
				{step_row("augment", augment, augment_done)}
				{step_row("tree", tree, tree_done)}
			</div>

			<button type="button" class="run-button" on:click=run disabled=move || running.get()>
				{move || if running.get() { "Processing..." } else { "Run pipeline" }}
			</button>

			<ProgressPanel />
			<ProgressStats />
		</section>
	}
}
