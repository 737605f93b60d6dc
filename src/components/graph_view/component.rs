use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::physics::LayoutController;
use super::render;
use super::selection::SelectionEngine;
use super::state::GraphViewState;
use super::types::GraphDataset;

/// Cursor travel below this many pixels counts as a click, not a drag.
const CLICK_SLOP: f64 = 4.0;

#[component]
pub fn GraphCanvas(
	#[prop(into)] data: Signal<GraphDataset>,
	engine: RwSignal<SelectionEngine>,
	controller: Rc<RefCell<LayoutController>>,
	sim: Rc<RefCell<Option<GraphViewState>>>,
	#[prop(default = 500.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (sim_init, animate_init, controller_init) =
		(sim.clone(), animate.clone(), controller.clone());

	Effect::new(move |_| {
		// Tracks the dataset signal: every reload rebuilds the simulation.
		let dataset = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let w = canvas
			.parent_element()
			.map(|p| p.client_width() as f64)
			.unwrap_or(800.0);
		let h = height;
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let config = controller_init.borrow().config();
		*sim_init.borrow_mut() = Some(GraphViewState::new(&dataset, &config, w, h));
		controller_init
			.borrow_mut()
			.ensure_initialized(&mut *sim_init.borrow_mut(), w, h);

		if animate_init.borrow().is_some() {
			return;
		}
		let Ok(Some(ctx_obj)) = canvas.get_context("2d") else {
			return;
		};
		let Ok(ctx) = ctx_obj.dyn_into::<CanvasRenderingContext2d>() else {
			return;
		};

		let (sim_anim, animate_inner) = (sim_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *sim_anim.borrow_mut() {
				s.tick(0.016);
				// The selection lives in the engine; read it untracked so
				// the render loop never registers reactive subscriptions.
				let selected = engine
					.try_with_untracked(|e| e.selected_ids().clone())
					.unwrap_or_default();
				render::render(s, &ctx, &selected);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(window) = web_sys::window() {
					let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), &*animate_init.borrow()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let event_pos = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let sim_md = sim.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = event_pos(&ev) else {
			return;
		};
		if let Some(ref mut s) = *sim_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.moved = 0.0;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let sim_mm = sim.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = event_pos(&ev) else {
			return;
		};
		if let Some(ref mut s) = *sim_mm.borrow_mut() {
			if s.drag.active {
				let (dx, dy) = (x - s.drag.start_x, y - s.drag.start_y);
				s.drag.moved = (dx * dx + dy * dy).sqrt();
				if s.drag.moved >= CLICK_SLOP {
					if let Some(idx) = s.drag.node_idx {
						let (nx, ny) = (
							s.drag.node_start_x + (dx / s.transform.k) as f32,
							s.drag.node_start_y + (dy / s.transform.k) as f32,
						);
						s.graph.visit_nodes_mut(|node| {
							if node.index() == idx {
								node.data.x = nx;
								node.data.y = ny;
								node.data.is_anchor = true;
							}
						});
					}
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			} else {
				s.hovered_edge = s.edge_at_position(x, y);
			}
		}
	};

	let sim_mu = sim.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = {
			let mut sim = sim_mu.borrow_mut();
			let Some(ref mut s) = *sim else {
				return;
			};
			let clicked = if s.drag.active && s.drag.moved < CLICK_SLOP {
				s.drag
					.node_idx
					.and_then(|idx| s.node_id(idx).map(str::to_string))
			} else {
				None
			};
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			clicked
		};
		// A short press on a node is the click the selection engine acts on.
		if let Some(id) = clicked {
			engine.update(|e| e.on_node_click(&id));
		}
	};

	let sim_ml = sim.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *sim_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.hovered_edge = None;
		}
	};

	let sim_wh = sim.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = event_pos(&ev) else {
			return;
		};
		if let Some(ref mut s) = *sim_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
