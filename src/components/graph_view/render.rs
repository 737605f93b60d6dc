use std::collections::HashSet;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::GraphViewState;

const NODE_FILL: &str = "#69b3a2";
const NODE_FILL_SELECTED: &str = "#FF6B6B";
const LABEL_FILL: &str = "#000";
const LABEL_FILL_SELECTED: &str = "#C53030";
const EDGE_STROKE: &str = "#999";
const EDGE_LABEL_FILL: &str = "#333";

pub fn render(state: &GraphViewState, ctx: &CanvasRenderingContext2d, selected: &HashSet<String>) {
	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx, selected);
	ctx.restore();
}

fn draw_edges(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let positions = state.positions();
	let line_width = state.config.line_width / k;

	let mut radii = std::collections::HashMap::new();
	state.graph.visit_nodes(|node| {
		radii.insert(node.index(), state.node_radius(node.data.user_data.val));
	});

	for (i, edge) in state.edges().iter().enumerate() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		ctx.set_stroke_style_str(EDGE_STROKE);
		ctx.set_line_width(line_width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();

		// Arrowhead sits just outside the target node's circle.
		let target_radius = radii.get(&edge.target).copied().unwrap_or(0.0);
		let (end_x, end_y) = (x2 - ux * target_radius, y2 - uy * target_radius);
		let arrow_len = 4.1 * state.config.line_width / k;
		let arrow_w = 2.5 * state.config.line_width / k;

		ctx.set_fill_style_str(EDGE_STROKE);
		ctx.begin_path();
		ctx.move_to(end_x, end_y);
		ctx.line_to(end_x - arrow_len * ux - arrow_w * uy, end_y - arrow_len * uy + arrow_w * ux);
		ctx.line_to(end_x - arrow_len * ux + arrow_w * uy, end_y - arrow_len * uy - arrow_w * ux);
		ctx.close_path();
		ctx.fill();

		// Relation labels only on the hovered edge.
		if state.hovered_edge == Some(i) && !edge.label.is_empty() {
			let (mid_x, mid_y) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
			let font_size = state.config.edge_font_size / k;
			ctx.set_font(&format!("{font_size}px sans-serif"));
			ctx.set_text_align("center");
			ctx.set_text_baseline("middle");
			ctx.set_fill_style_str(EDGE_LABEL_FILL);
			let _ = ctx.fill_text(&edge.label, mid_x, mid_y);
		}
	}
}

fn draw_nodes(state: &GraphViewState, ctx: &CanvasRenderingContext2d, selected: &HashSet<String>) {
	let k = state.transform.k;
	let font_size = state.config.node_font_size / k;

	state.graph.visit_nodes(|node| {
		let body = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let radius = state.node_radius(body.val);
		let is_selected = selected.contains(&body.id);

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(if is_selected { NODE_FILL_SELECTED } else { NODE_FILL });
		ctx.fill();

		if is_selected {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 3.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(NODE_FILL_SELECTED);
			ctx.set_line_width(2.0 / k);
			ctx.stroke();
		}

		ctx.set_font(&format!("{font_size}px sans-serif"));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.set_fill_style_str(if is_selected { LABEL_FILL_SELECTED } else { LABEL_FILL });
		let _ = ctx.fill_text(&body.name, x, y + radius + font_size + 1.0 / k);
	});
}
