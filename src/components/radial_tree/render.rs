//! Canvas rendering for the radial tree.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Links, or sunburst sectors (layout space)
//! 3. Filtered-out nodes, then active nodes, then highlighted nodes on top
//! 4. Hover tooltip (screen space)

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{RadialTreeState, Variant};
use super::theme::{Color, Theme};
use crate::tree::{project, ArcSegment, Link, NodeId, NodeKind, OpacityConfig, PositionedNode};

/// Attempt to smooth values that would otherwise cause abrupt visual changes.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Canvas angle (radians, from +x, clockwise) for a layout angle in degrees.
fn canvas_angle(degrees: f64) -> f64 {
	(degrees - 90.0).to_radians()
}

/// Renders the complete tree to the canvas.
pub fn render(
	state: &RadialTreeState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
	opacity: &OpacityConfig,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	if state.catalog.hierarchy.is_root_only() {
		draw_empty_state(state, ctx, theme);
		return;
	}

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	match state.variant {
		Variant::Radial => {
			draw_links(state, ctx, &scale, theme, opacity);
			draw_nodes(state, ctx, &scale, theme, opacity);
		}
		Variant::Sunburst => {
			draw_sectors(state, ctx, &scale, theme, opacity);
		}
	}

	ctx.restore();

	if let Some(id) = state.highlight.hovered_node {
		draw_tooltip(state, ctx, theme, id);
	}
}

fn draw_background(state: &RadialTreeState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = theme
		.background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				state.width.max(state.height) * 0.8,
			)
			.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_empty_state(state: &RadialTreeState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.label.muted.to_css());
	ctx.set_font("16px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text("No brands to display", state.width / 2.0, state.height / 2.0);
}

/// Blend a base alpha towards 1 as highlight intensity rises, and away from
/// it when something else is highlighted.
fn highlighted_alpha(base: f64, own_t: f64, max_t: f64) -> f64 {
	if own_t > 0.01 {
		base + (1.0 - base) * own_t
	} else {
		base * (1.0 - 0.6 * max_t)
	}
}

fn draw_links(
	state: &RadialTreeState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	opacity: &OpacityConfig,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let rotation = state.transform.rotation;
	let layout = &state.catalog.layout;

	// Inactive first so active links are drawn over them.
	let (active, inactive): (Vec<&Link>, Vec<&Link>) = layout
		.links()
		.iter()
		.partition(|l| state.visibility.is_link_active(l));

	for (links, is_active) in [(inactive, false), (active, true)] {
		if !is_active && theme.link.dash_inactive {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(scale.inactive_dash.0),
				&JsValue::from_f64(scale.inactive_dash.1),
			));
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		for link in links {
			let link_t = smooth_step(state.highlight.link_intensity(link.source, link.target));
			let alpha = highlighted_alpha(state.visibility.link_opacity(link, opacity), link_t, max_t);
			if alpha < 0.01 {
				continue;
			}

			let color = if link_t > 0.01 {
				theme.link.color.lighten(0.3 * link_t)
			} else {
				theme.link.color
			};
			ctx.set_stroke_style_str(&color.with_alpha(alpha * color.a).to_css());
			ctx.set_line_width(scale.link_width * (1.0 + 0.6 * link_t));

			let source = layout.node(link.source);
			let target = layout.node(link.target);
			draw_link_path(ctx, source, target, rotation, theme.link.curved);
		}
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

/// Radial Bézier from parent to child: both control points sit on the mid
/// radius, one at each endpoint's angle.
fn draw_link_path(
	ctx: &CanvasRenderingContext2d,
	source: &PositionedNode,
	target: &PositionedNode,
	rotation: f64,
	curved: bool,
) {
	let start = source.point(rotation);
	let end = target.point(rotation);

	ctx.begin_path();
	ctx.move_to(start.x, start.y);
	if curved {
		let mid = (source.radius + target.radius) / 2.0;
		let c1 = project(source.angle_degrees + rotation, mid);
		let c2 = project(target.angle_degrees + rotation, mid);
		ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
	} else {
		ctx.line_to(end.x, end.y);
	}
	ctx.stroke();
}

fn draw_nodes(
	state: &RadialTreeState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	opacity: &OpacityConfig,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let nodes = state.catalog.hierarchy.nodes();

	// Pass 1: nodes outside the active set
	for node in nodes.iter().filter(|n| !state.visibility.is_active(n.id)) {
		if state.highlight.node_intensity(node.id) <= 0.001 {
			draw_node(state, ctx, scale, theme, opacity, node.id, max_t);
		}
	}

	// Pass 2: active nodes
	for node in nodes.iter().filter(|n| state.visibility.is_active(n.id)) {
		if state.highlight.node_intensity(node.id) <= 0.001 {
			draw_node(state, ctx, scale, theme, opacity, node.id, max_t);
		}
	}

	// Pass 3: highlighted/transitioning nodes on top
	for node in nodes {
		if state.highlight.node_intensity(node.id) > 0.001 {
			draw_node(state, ctx, scale, theme, opacity, node.id, max_t);
		}
	}
}

fn draw_node(
	state: &RadialTreeState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	opacity: &OpacityConfig,
	id: NodeId,
	max_t: f64,
) {
	let node = state.catalog.hierarchy.node(id);
	let pos = state.catalog.layout.node(id);
	let p = pos.point(state.transform.rotation);
	let node_t = smooth_step(state.highlight.node_intensity(id));
	let hover_t = if state.highlight.hovered_node == Some(id) {
		node_t
	} else {
		0.0
	};

	let alpha = highlighted_alpha(state.visibility.node_opacity(id, opacity), node_t, max_t);
	let radius = scale.node_radius(node.kind) * (1.0 + 0.25 * node_t + 0.15 * hover_t);
	let color = state.node_color(id);

	ctx.set_global_alpha(alpha);
	fill_disc(ctx, p.x, p.y, radius, color, theme.node.use_gradient);

	match node.kind {
		NodeKind::Root => {
			stroke_ring(ctx, p.x, p.y, radius + scale.ring_offset, theme.node.border_color, scale.ring_width);
		}
		NodeKind::ParentEntity => {
			stroke_ring(ctx, p.x, p.y, radius + scale.ring_offset, color, scale.ring_width);
			stroke_ring(ctx, p.x, p.y, radius + scale.ring_offset * 2.5, color.with_alpha(0.5), scale.ring_width * 0.5);
		}
		NodeKind::Category => {
			if theme.node.border_width > 0.0 {
				stroke_ring(ctx, p.x, p.y, radius, theme.node.border_color, theme.node.border_width / scale.k);
			}
		}
		NodeKind::Brand => {}
	}

	if hover_t > 0.01 {
		stroke_ring(
			ctx,
			p.x,
			p.y,
			radius + scale.ring_offset,
			theme.label.color.with_alpha(0.8 * hover_t),
			scale.ring_width,
		);
	}

	ctx.set_global_alpha(1.0);

	let label_alpha = (alpha * scale.label_alpha(node.kind)).max(node_t);
	if label_alpha > 0.02 {
		ctx.set_global_alpha(label_alpha);
		draw_label(state, ctx, scale, theme, id, pos, radius);
		ctx.set_global_alpha(1.0);
	}
}

fn fill_disc(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, color: Color, gradient: bool) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);

	let fill = gradient
		.then(|| {
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
				.ok()
		})
		.flatten();
	match fill {
		Some(g) => {
			let _ = g.add_color_stop(0.0, &color.lighten(0.4).to_css());
			let _ = g.add_color_stop(0.7, &color.to_css());
			let _ = g.add_color_stop(1.0, &color.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&g);
		}
		None => ctx.set_fill_style_str(&color.to_css()),
	}
	ctx.fill();
}

fn stroke_ring(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, color: Color, width: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(width);
	ctx.stroke();
}

/// Root label sits above the centre; categories get a horizontal label on
/// their outer side; brands get radial text reading outwards, flipped on the
/// left half so it is never upside down.
fn draw_label(
	state: &RadialTreeState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	id: NodeId,
	pos: &PositionedNode,
	radius: f64,
) {
	let node = state.catalog.hierarchy.node(id);
	let angle = pos.rotated_angle(state.transform.rotation);
	ctx.set_fill_style_str(&theme.label.color.to_css());
	ctx.set_text_baseline("middle");

	match node.kind {
		NodeKind::Root => {
			ctx.set_font(&scale.heading_font);
			ctx.set_text_align("center");
			let _ = ctx.fill_text(&node.name, 0.0, -(radius + scale.label_gap * 3.0));
		}
		NodeKind::ParentEntity | NodeKind::Category => {
			ctx.set_font(&scale.heading_font);
			let offset = pos.radius + radius + scale.label_gap;
			let at = project(angle, offset);
			ctx.set_text_align(if angle < 180.0 { "left" } else { "right" });
			let _ = ctx.fill_text(&node.name, at.x, at.y);
		}
		NodeKind::Brand => {
			ctx.set_font(&scale.label_font);
			let left = angle > 180.0;
			let offset = pos.radius + radius + scale.label_gap;

			ctx.save();
			let _ = ctx.rotate(canvas_angle(angle));
			let _ = ctx.translate(offset, 0.0);
			if left {
				let _ = ctx.rotate(PI);
			}
			ctx.set_text_align(if left { "right" } else { "left" });
			let _ = ctx.fill_text(&node.name, 0.0, 0.0);

			if let Some(note) = state.annotation(id) {
				let width = ctx.measure_text(&node.name).map(|m| m.width()).unwrap_or(0.0);
				let x = if left {
					-(width + scale.label_gap)
				} else {
					width + scale.label_gap
				};
				ctx.set_fill_style_str(&theme.label.annotation.to_css());
				let _ = ctx.fill_text(note, x, 0.0);
			}
			ctx.restore();
		}
	}
}

fn draw_sectors(
	state: &RadialTreeState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	opacity: &OpacityConfig,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let rotation = state.transform.rotation;

	for sector in &state.catalog.sectors {
		let node_t = smooth_step(state.highlight.node_intensity(sector.id));
		let alpha = highlighted_alpha(state.visibility.node_opacity(sector.id, opacity), node_t, max_t);
		let color = state.node_color(sector.id);
		let fill = if node_t > 0.01 {
			color.lighten(0.2 * node_t)
		} else {
			color
		};

		ctx.set_global_alpha(alpha);
		sector_path(ctx, sector, rotation);
		ctx.set_fill_style_str(&fill.to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&theme.node.sector_stroke.to_css());
		ctx.set_line_width(scale.link_width);
		ctx.stroke();

		draw_sector_label(state, ctx, scale, theme, sector);
		ctx.set_global_alpha(1.0);
	}

	let root = state.catalog.hierarchy.root();
	let radius = crate::tree::sunburst::centre_radius(state.geometry());
	ctx.set_global_alpha(1.0);
	fill_disc(ctx, 0.0, 0.0, radius, state.node_color(root).with_alpha(0.15), false);
	ctx.set_fill_style_str(&theme.label.color.to_css());
	ctx.set_font(&scale.heading_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&state.catalog.hierarchy.node(root).name, 0.0, 0.0);
}

fn sector_path(ctx: &CanvasRenderingContext2d, sector: &ArcSegment, rotation: f64) {
	let start = canvas_angle(sector.start_angle + rotation);
	let end = canvas_angle(sector.end_angle + rotation);
	ctx.begin_path();
	let _ = ctx.arc(0.0, 0.0, sector.outer_radius, start, end);
	let _ = ctx.arc_with_anticlockwise(0.0, 0.0, sector.inner_radius, end, start, true);
	ctx.close_path();
}

/// Radial label along the sector's mid angle, only when the arc has room.
fn draw_sector_label(
	state: &RadialTreeState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	sector: &ArcSegment,
) {
	let node = state.catalog.hierarchy.node(sector.id);
	let mid_radius = (sector.inner_radius + sector.outer_radius) / 2.0;
	let arc_room = sector.span().to_radians() * mid_radius * scale.k;
	let label_alpha = scale.label_alpha(node.kind);
	if arc_room < 10.0 || label_alpha < 0.02 {
		return;
	}

	let angle = crate::tree::layout::normalize_angle(sector.mid_angle() + state.transform.rotation);
	let left = angle > 180.0;

	ctx.save();
	let _ = ctx.rotate(canvas_angle(angle));
	let _ = ctx.translate(mid_radius, 0.0);
	if left {
		let _ = ctx.rotate(PI);
	}
	ctx.set_global_alpha(label_alpha);
	ctx.set_fill_style_str(&theme.label.color.to_css());
	ctx.set_font(match node.kind {
		NodeKind::Brand => &scale.label_font,
		NodeKind::Root | NodeKind::ParentEntity | NodeKind::Category => &scale.heading_font,
	});
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&node.name, 0.0, 0.0);
	ctx.restore();
}

/// Lines shown in the hover tooltip for a node.
pub fn tooltip_lines(state: &RadialTreeState, id: NodeId) -> Vec<String> {
	let tree = &state.catalog.hierarchy;
	let node = tree.node(id);
	let mut lines = vec![node.name.clone()];
	match node.kind {
		NodeKind::Root => {
			lines.push(format!("{} brands", tree.leaves().len()));
		}
		NodeKind::ParentEntity | NodeKind::Category => {
			let brands = tree
				.depth_first()
				.into_iter()
				.filter(|&d| tree.node(d).is_leaf() && tree.ancestors(d).any(|a| a == id))
				.count();
			lines.push(format!("{} brands", brands));
		}
		NodeKind::Brand => {
			if let Some(record) = tree.record(id) {
				if !record.tagline().is_empty() {
					lines.push(record.tagline().to_string());
				}
				if !record.region.is_empty() {
					lines.push(record.region.clone());
				}
			}
		}
	}
	if let Some(note) = state.annotation(id) {
		lines.push(format!("Ownership: {}", note));
	}
	lines
}

fn draw_tooltip(state: &RadialTreeState, ctx: &CanvasRenderingContext2d, theme: &Theme, id: NodeId) {
	let anchor = match state.variant {
		Variant::Radial => state.catalog.layout.node(id).point(state.transform.rotation),
		Variant::Sunburst => match state.catalog.sector(id) {
			Some(s) => project(
				s.mid_angle() + state.transform.rotation,
				(s.inner_radius + s.outer_radius) / 2.0,
			),
			None => Default::default(),
		},
	};
	let (sx, sy) = state.transform.layout_to_screen(anchor);
	let lines = tooltip_lines(state, id);

	const LINE_HEIGHT: f64 = 16.0;
	const PADDING: f64 = 8.0;
	ctx.set_font("12px sans-serif");
	let width = lines
		.iter()
		.filter_map(|l| ctx.measure_text(l).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let box_w = width + PADDING * 2.0;
	let box_h = lines.len() as f64 * LINE_HEIGHT + PADDING * 2.0 - 4.0;

	// Keep the box on screen.
	let x = (sx + 12.0).min(state.width - box_w - 4.0).max(4.0);
	let y = (sy + 12.0).min(state.height - box_h - 4.0).max(4.0);

	ctx.set_fill_style_str(&theme.label.tooltip_background.to_css());
	ctx.fill_rect(x, y, box_w, box_h);
	ctx.set_text_align("left");
	ctx.set_text_baseline("top");
	for (i, line) in lines.iter().enumerate() {
		let color = if i == 0 {
			theme.label.color
		} else {
			theme.label.muted
		};
		ctx.set_fill_style_str(&color.to_css());
		let _ = ctx.fill_text(line, x + PADDING, y + PADDING + i as f64 * LINE_HEIGHT);
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::components::radial_tree::state::ViewConfig;
	use crate::tree::{BrandRecord, Catalog, FilterState, LayoutConfig, TreeConfig};

	#[test]
	fn highlight_blend_brightens_target_and_dims_others() {
		assert!((highlighted_alpha(0.4, 1.0, 1.0) - 1.0).abs() < 1e-9);
		assert_eq!(highlighted_alpha(0.4, 0.0, 0.0), 0.4);
		assert!((highlighted_alpha(1.0, 0.0, 1.0) - 0.4).abs() < 1e-9);
	}

	#[test]
	fn canvas_angle_matches_projection() {
		let p = project(30.0, 1.0);
		let a = canvas_angle(30.0);
		assert!((a.cos() - p.x).abs() < 1e-12 && (a.sin() - p.y).abs() < 1e-12);
	}

	#[test]
	fn tooltip_describes_brands_and_categories() {
		let records = vec![
			BrandRecord::new("Aqua", "Water", "EU").with_tagline("Pure spring"),
			BrandRecord::new("Brook", "Water", "US"),
		];
		let catalog = Arc::new(Catalog::build(&records, &TreeConfig::default(), &LayoutConfig::default()));
		let visibility = catalog.evaluate(&FilterState::default());
		let state = RadialTreeState::new(
			catalog.clone(),
			visibility,
			LayoutConfig::default(),
			&ViewConfig::default(),
			&Theme::default(),
			None,
			640.0,
			480.0,
		);

		let aqua = catalog.hierarchy.find("Aqua").next().unwrap();
		let water = catalog.hierarchy.find("Water").next().unwrap();
		assert_eq!(tooltip_lines(&state, aqua), ["Aqua", "Pure spring", "EU"]);
		assert_eq!(tooltip_lines(&state, water), ["Water", "2 brands"]);
		assert_eq!(tooltip_lines(&state, catalog.hierarchy.root()), ["Portfolio", "2 brands"]);
	}
}
