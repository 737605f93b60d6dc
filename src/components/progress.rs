use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;

use crate::estimate::format_duration;
use crate::storage;
use crate::store::use_app_store;

fn clear_interval(id: Option<i32>) {
	if let (Some(id), Some(window)) = (id, web_sys::window()) {
		window.clear_interval_with_handle(id);
	}
}

/// Progress bar with an elapsed-seconds ticker. The ticker runs on a
/// one-second interval while the pipeline is running and resets to zero
/// the moment it stops.
#[component]
pub fn ProgressPanel() -> impl IntoView {
	let store = use_app_store();
	let state = store.state();
	let progress = Memo::new(move |_| state.with(|s| s.progress.clone()));

	let (elapsed, set_elapsed) = signal(0u64);
	let (interval_id, set_interval_id) = signal::<Option<i32>>(None);

	Effect::new(move |_| {
		let running = progress.with(|p| p.is_running);
		if running {
			if interval_id.get_untracked().is_some() {
				return;
			}
			let Some(window) = web_sys::window() else {
				return;
			};
			let cb = Closure::wrap(Box::new(move || {
				set_elapsed.update(|e| *e += 1);
			}) as Box<dyn FnMut()>);
			match window.set_interval_with_callback_and_timeout_and_arguments_0(
				cb.as_ref().unchecked_ref(),
				1000,
			) {
				Ok(id) => {
					cb.forget();
					set_interval_id.set(Some(id));
				}
				Err(_) => warn!("failed to start the elapsed-time interval"),
			}
		} else {
			clear_interval(interval_id.get_untracked());
			set_interval_id.set(None);
			set_elapsed.set(0);
		}
	});

	on_cleanup(move || clear_interval(interval_id.get_untracked()));

	view! {
		{move || {
			let p = progress.get();
			p.is_running
				.then(|| {
					view! {
						<div class="progress-panel">
							<div class="progress-header">
								<span>{p.current_step.clone()}</span>
								<span>{format!("{}%", p.percentage.round())}</span>
							</div>
							<div class="progress-track">
								<div
									class="progress-fill"
									style=format!("width: {}%", p.percentage.clamp(0.0, 100.0))
								/>
							</div>
							<div class="progress-times">
								<span>{move || format!("Elapsed: {}", format_duration(elapsed.get()))}</span>
								<span>
									{if p.estimated_time.is_empty() {
										"Estimating...".to_string()
									} else {
										format!("Estimated total: {}", p.estimated_time)
									}}
								</span>
							</div>
						</div>
					}
				})
		}}
	}
}

/// Run statistics from the persisted history. Hidden until at least one
/// run has been recorded.
#[component]
pub fn ProgressStats() -> impl IntoView {
	let history = storage::load_progress_history();

	view! {
		{(history.total_runs > 0)
			.then(|| {
				view! {
					<div class="progress-stats">
						<h3>"Run statistics"</h3>
						<div class="progress-stats-grid">
							<div>
								<div class="stat-value">{history.total_runs}</div>
								<div class="stat-label">"total runs"</div>
							</div>
							<div>
								<div class="stat-value">{history.step_count()}</div>
								<div class="stat-label">"steps recorded"</div>
							</div>
							<div>
								<div class="stat-value">{format_duration(history.average_secs())}</div>
								<div class="stat-label">"average step time"</div>
							</div>
						</div>
					</div>
				}
			})}
	}
}
