use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::info;

use crate::rpc::{self, Difficulty, RequestSeq};
use crate::store::{Action, use_app_store};

use super::graph_view::{
	GraphCanvas, GraphDataset, GraphViewState, InteractionMode, LayoutController, PARAM_SPECS,
	SelectionEngine, XorShiftRng,
};

#[component]
pub fn KgPreviewPanel() -> impl IntoView {
	let store = use_app_store();
	let state = store.state();

	let engine = RwSignal::new(SelectionEngine::new());
	let dataset = RwSignal::new(GraphDataset::default());
	let controller = Rc::new(RefCell::new(LayoutController::new()));
	let sim: Rc<RefCell<Option<GraphViewState>>> = Rc::new(RefCell::new(None));
	let (config, set_config) = signal(controller.borrow().config());

	let loading = RwSignal::new(false);
	let has_loaded = RwSignal::new(false);
	let load_error: RwSignal<Option<String>> = RwSignal::new(None);
	let random_k = RwSignal::new(3usize);

	let generating = RwSignal::new(false);
	let difficulty = RwSignal::new(Difficulty::Medium);
	let saved_path = RwSignal::new(String::new());

	// Tickets make a superseded reload response a no-op instead of letting
	// the slower fetch win.
	let seq = StoredValue::new(RequestSeq::default());

	let load_graph = move || {
		let output_path = state.with_untracked(|s| s.output_path.clone());
		if output_path.is_empty() {
			load_error.set(Some(
				"Run the pipeline first to build a knowledge graph".to_string(),
			));
			return;
		}
		loading.set(true);
		load_error.set(None);
		let ticket = seq.try_update_value(|s| s.begin()).unwrap_or_default();

		spawn_local(async move {
			let result = rpc::get_knowledge_graph(&output_path).await;
			if !seq.with_value(|s| s.is_current(ticket)) {
				return;
			}
			loading.set(false);
			match result {
				Ok(data) => {
					info!("loaded graph: {} nodes, {} links", data.nodes.len(), data.links.len());
					store.dispatch(Action::SetConcepts(data.node_names()));
					store.dispatch(Action::SetGraph(format!(
						"{}/tree/graph",
						output_path.trim_end_matches(['/', '\\'])
					)));
					engine.update(|e| e.load_dataset(data.clone()));
					dataset.set(data);
					has_loaded.set(true);
				}
				Err(message) => load_error.set(Some(message)),
			}
		});
	};

	// Load automatically once a graph path is known and nothing is shown yet.
	Effect::new(move |_| {
		let graph_path = state.with(|s| s.graph_path.clone());
		if !graph_path.is_empty() && !has_loaded.get() {
			load_graph();
		}
	});

	let mode_button = move |label: &'static str, mode: InteractionMode| {
		view! {
			<button
				type="button"
				class="mode-button"
				class:active=move || engine.with(|e| e.mode() == mode)
				on:click=move |_| engine.update(|e| e.toggle_mode(mode))
			>
				{label}
				{move || engine.with(|e| e.mode() == mode).then(|| " ✓")}
			</button>
		}
	};

	let random_select = move |_| {
		let k = random_k.get_untracked().max(1);
		let mut rng = XorShiftRng::new(js_sys::Date::now().to_bits());
		engine.update(|e| e.random_select(k, &mut rng));
	};

	let controller_sliders = controller.clone();
	let sim_sliders = sim.clone();
	let sliders = PARAM_SPECS
		.iter()
		.map(|spec| {
			let key = spec.key;
			let controller = controller_sliders.clone();
			let sim = sim_sliders.clone();
			view! {
				<div class="physics-slider">
					<label>
						{move || format!("{}: {}", spec.label, config.get().get(key))}
					</label>
					<input
						type="range"
						min=spec.min
						max=spec.max
						step=spec.step
						prop:value=move || config.get().get(key)
						on:input=move |ev| {
							if let Ok(value) = event_target_value(&ev).parse::<f64>() {
								controller
									.borrow_mut()
									.update_param(&mut *sim.borrow_mut(), key, value);
								set_config.set(controller.borrow().config());
							}
						}
					/>
				</div>
			}
		})
		.collect_view();

	let generate = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let concepts = engine.with_untracked(|e| e.selected_names());
		if concepts.is_empty() || generating.get_untracked() {
			return;
		}
		let graph_path = state.with_untracked(|s| s.graph_path.clone());
		let output_path = state.with_untracked(|s| s.output_path.clone());
		let level = difficulty.get_untracked();
		generating.set(true);
		saved_path.set(String::new());

		spawn_local(async move {
			match rpc::generate_qa(&graph_path, &concepts, level, &output_path).await {
				Ok(()) => saved_path.set(format!(
					"{}/QA",
					output_path.trim_end_matches(['/', '\\'])
				)),
				Err(message) => load_error.set(Some(message)),
			}
			generating.set(false);
		});
	};

	view! {
		<section class="panel">
			<h1>"Knowledge graph & question generation"</h1>

			<div class="preview-toolbar">
				<button type="button" on:click=move |_| load_graph() disabled=move || loading.get()>
					{move || if loading.get() { "Loading..." } else { "Reload graph" }}
				</button>
				{mode_button("Select neighbors", InteractionMode::SelectNeighbors)}
				{mode_button("Remove neighbors", InteractionMode::RemoveNeighbors)}
				<button type="button" on:click=move |_| engine.update(|e| e.clear_selection())>
					"Clear selection"
				</button>
				<input
					type="number"
					class="random-k"
					min=1
					prop:value=move || random_k.get()
					on:input=move |ev| {
						if let Ok(value) = event_target_value(&ev).parse::<usize>() {
							let upper = dataset.with_untracked(|d| d.nodes.len()).max(1);
							if value >= 1 {
								random_k.set(value.min(upper));
							}
						}
					}
				/>
				<button type="button" on:click=random_select>
					"Random select"
				</button>
			</div>

			{move || {
				load_error
					.get()
					.map(|message| {
						view! {
							<div class="load-error">
								<p>{format!("Error: {message}")}</p>
								<p class="load-error-hint">
									"Make sure the pipeline has run and produced a graph"
								</p>
							</div>
						}
					})
			}}

			<div class="mode-hint">
				<p>
					{move || {
						match engine.with(|e| e.mode()) {
							InteractionMode::SelectNeighbors => {
								"Clicking a node selects it together with all of its neighbors"
							}
							InteractionMode::RemoveNeighbors => {
								"Clicking a node deselects it together with all of its neighbors"
							}
							InteractionMode::Normal => {
								"Clicking a node adds it to or removes it from the concept list"
							}
						}
					}}
				</p>
				<p>
					"Selected concepts: "
					<span class="selected-names">
						{move || {
							let names = engine.with(|e| e.selected_names());
							if names.is_empty() { "none".to_string() } else { names.join(", ") }
						}}
					</span>
				</p>
			</div>

			<div class="physics-controls">
				<h2>"Layout parameters"</h2>
				<div class="physics-sliders">{sliders}</div>
			</div>

			<div class="graph-container">
				<GraphCanvas
					data=dataset
					engine=engine
					controller=controller.clone()
					sim=sim.clone()
				/>
			</div>

			<form class="qa-form" on:submit=generate>
				<h2>"Question generation"</h2>
				<label>
					"Difficulty"
					<select on:change=move |ev| {
						difficulty.set(Difficulty::from_wire(&event_target_value(&ev)))
					}>
						{Difficulty::ALL
							.into_iter()
							.map(|d| {
								view! {
									<option
										value=d.wire_value()
										selected=move || difficulty.get() == d
									>
										{d.label()}
									</option>
								}
							})
							.collect_view()}
					</select>
				</label>
				<button
					type="submit"
					disabled=move || {
						generating.get() || engine.with(|e| e.selection_len() == 0)
					}
				>
					{move || if generating.get() { "Generating..." } else { "Generate questions" }}
				</button>
				{move || {
					let path = saved_path.get();
					(!path.is_empty())
						.then(|| {
							let open_path = path.clone();
							view! {
								<p class="qa-saved">
									{format!("Questions saved to {path} ")}
									<button
										type="button"
										on:click=move |_| {
											let path = open_path.clone();
											spawn_local(async move {
												rpc::open_folder(&path).await;
											});
										}
									>
										"Open folder"
									</button>
								</p>
							}
						})
				}}
			</form>
		</section>
	}
}
