use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::{group_color, stroke_width};
use super::state::{NODE_RADIUS, RelationshipGraphState};

const LABEL_FONT: &str = "10px \"Open Sans\", \"Helvetica\", sans-serif";
const TITLE_FONT: &str = "14px \"Open Sans\", \"Helvetica\", sans-serif";

pub fn render(state: &RelationshipGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.width / 2.0, state.height / 2.0);
	draw_title(state, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_hover(state, ctx);
	ctx.restore();
}

fn draw_title(state: &RelationshipGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#333");
	ctx.set_font(TITLE_FONT);
	let _ = ctx.fill_text(
		&state.config.title,
		-state.width / 2.0 + 20.0,
		-state.height / 2.0 + 20.0,
	);
}

fn draw_edges(state: &RelationshipGraphState, ctx: &CanvasRenderingContext2d) {
	let nodes = state.simulation.nodes();
	ctx.set_stroke_style_str("rgba(153, 153, 153, 0.6)");
	for link in state.simulation.links() {
		let (s, t) = (&nodes[link.source.0], &nodes[link.target.0]);
		ctx.set_line_width(stroke_width(link.value));
		ctx.begin_path();
		ctx.move_to(s.x, s.y);
		ctx.line_to(t.x, t.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &RelationshipGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_font(LABEL_FONT);
	ctx.set_stroke_style_str("#fff");
	ctx.set_line_width(1.5);
	for node in state.simulation.nodes() {
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(group_color(&state.config.color_range, node.group));
		ctx.fill();
		ctx.stroke();

		ctx.set_fill_style_str("#333");
		let _ = ctx.fill_text(&node.id, node.x + 6.0, node.y + 3.0);
	}
}

// Tooltip with the full node id next to the hovered node.
fn draw_hover(state: &RelationshipGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(node) = state.hover.and_then(|idx| state.simulation.node(idx)) else {
		return;
	};
	let (x, y) = (node.x + 10.0, node.y - 12.0);
	ctx.set_font(LABEL_FONT);
	let width = ctx
		.measure_text(&node.id)
		.map(|m| m.width())
		.unwrap_or(node.id.len() as f64 * 6.0);
	ctx.set_fill_style_str("rgba(0, 0, 0, 0.75)");
	ctx.fill_rect(x - 4.0, y - 11.0, width + 8.0, 15.0);
	ctx.set_fill_style_str("#fff");
	let _ = ctx.fill_text(&node.id, x, y);
}
