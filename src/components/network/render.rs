use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::NetworkSession;
use super::style::Rgb;

const BACKGROUND: &str = "#ffffff";
const LINK_WIDTH: f64 = 3.0;
/// Arrowhead size in world units (marker 3x3 of a 10 unit path at stroke 3).
const ARROW_SIZE: f64 = 9.0;
const LABEL_FONT: &str = "10px sans-serif";

pub fn render(session: &NetworkSession, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, session.width, session.height);
	ctx.save();
	let t = session.transform();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	draw_links(session, ctx);
	draw_nodes(session, ctx);
	ctx.restore();
}

fn draw_links(session: &NetworkSession, ctx: &CanvasRenderingContext2d) {
	let radius = session.config.node_radius;
	ctx.set_line_width(LINK_WIDTH);

	for link in &session.links {
		let Some((source, target)) = link.endpoints else {
			continue;
		};
		let (Some((x1, y1)), Some((x2, y2))) = (
			session.node_position(source),
			session.node_position(target),
		) else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let style = link.style.value();
		ctx.set_stroke_style_str(&style.color.css(style.opacity));
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();

		let (ux, uy) = (dx / dist, dy / dist);
		if let Some(fill) = marker_fill(session, &link.end_marker) {
			draw_arrowhead(ctx, (x2 - ux * radius, y2 - uy * radius), (ux, uy), fill, style.opacity);
		}
		if let Some(fill) = link
			.start_marker
			.as_deref()
			.and_then(|id| marker_fill(session, id))
		{
			draw_arrowhead(ctx, (x1 + ux * radius, y1 + uy * radius), (-ux, -uy), fill, style.opacity);
		}
	}
}

fn marker_fill(session: &NetworkSession, id: &str) -> Option<Rgb> {
	session.marker(id).map(|marker| marker.fill.value())
}

/// Filled triangle whose tip sits at `tip`, pointing along `dir`.
fn draw_arrowhead(
	ctx: &CanvasRenderingContext2d,
	tip: (f64, f64),
	dir: (f64, f64),
	fill: Rgb,
	opacity: f64,
) {
	let (ux, uy) = dir;
	let (back_x, back_y) = (tip.0 - ux * ARROW_SIZE, tip.1 - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.set_fill_style_str(&fill.css(opacity));
	ctx.begin_path();
	ctx.move_to(tip.0, tip.1);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(session: &NetworkSession, ctx: &CanvasRenderingContext2d) {
	let radius = session.config.node_radius;
	ctx.set_font(LABEL_FONT);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for (index, node) in session.graph.nodes.iter().enumerate() {
		let (Some((x, y)), Some(visual)) = (session.node_position(index), session.nodes.get(index))
		else {
			continue;
		};
		let style = visual.style.value();

		ctx.set_global_alpha(style.opacity);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&style.color.css(1.0));
		ctx.fill();
		ctx.set_global_alpha(1.0);

		// Labels are not restyled by selection.
		ctx.set_fill_style_str("white");
		let _ = ctx.fill_text(&node.id, x, y + 1.0);
	}
}
