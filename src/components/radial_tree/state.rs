//! Tree view state and interaction tracking.
//!
//! Holds the built catalog with its current visibility, the view transform
//! (pan, zoom, rotation), and hover highlight state with smooth intensity
//! transitions. Nothing here touches the DOM, so it is exercised directly in
//! tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Deserialize;

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::{Color, Theme};
use crate::tree::layout::{normalize_angle, unproject};
use crate::tree::sunburst::centre_radius;
use crate::tree::{Catalog, LayoutConfig, NodeAnnotation, NodeId, NodeKind, Point, Visibility};

/// Which drawing the canvas produces from the same catalog.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
	#[default]
	Radial,
	Sunburst,
}

impl Variant {
	pub fn toggled(self) -> Self {
		match self {
			Variant::Radial => Variant::Sunburst,
			Variant::Sunburst => Variant::Radial,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Variant::Radial => "Radial tree",
			Variant::Sunburst => "Sunburst",
		}
	}
}

/// Bounds and step sizes for view gestures.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
	pub zoom_min: f64,
	pub zoom_max: f64,
	/// Multiplier applied per wheel notch.
	pub wheel_zoom_factor: f64,
	/// Degrees rotated per shift+wheel notch.
	pub rotation_step: f64,
	/// Initial zoom is fitted so the outermost ring plus this margin fits.
	pub fit_margin: f64,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			zoom_min: 0.3,
			zoom_max: 5.0,
			wheel_zoom_factor: 1.1,
			rotation_step: 5.0,
			fit_margin: 120.0,
		}
	}
}

/// Pan, zoom and rotation applied to the whole diagram.
///
/// Screen position of a layout point `p` is `(x + p.x * k, y + p.y * k)`
/// after rotating `p` by `rotation` degrees around the root.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped to the configured range.
	pub k: f64,
	/// Rotation offset in degrees, wrapped into `[0, 360)`.
	pub rotation: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
			rotation: 0.0,
		}
	}
}

impl ViewTransform {
	/// Centre the root in a `width` x `height` canvas, zoomed to fit `extent`.
	pub fn fitted(width: f64, height: f64, extent: f64, config: &ViewConfig) -> Self {
		let k = if extent > 0.0 {
			(width.min(height) / 2.0 / extent).clamp(config.zoom_min, config.zoom_max)
		} else {
			1.0
		};
		Self {
			x: width / 2.0,
			y: height / 2.0,
			k,
			rotation: 0.0,
		}
	}

	/// Zoom by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, config: &ViewConfig) {
		let new_k = (self.k * factor).clamp(config.zoom_min, config.zoom_max);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	pub fn rotate_by(&mut self, degrees: f64) {
		self.rotation = normalize_angle(self.rotation + degrees);
	}

	pub fn screen_to_layout(&self, sx: f64, sy: f64) -> Point {
		Point {
			x: (sx - self.x) / self.k,
			y: (sy - self.y) / self.k,
		}
	}

	pub fn layout_to_screen(&self, p: Point) -> (f64, f64) {
		(self.x + p.x * self.k, self.y + p.y * self.k)
	}
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	/// Set once the pointer has moved far enough to count as a drag.
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Pointer travel (pixels) below which a press-release counts as a click.
pub const CLICK_SLOP: f64 = 4.0;

/// Manages smooth highlight transitions with per-node intensity tracking.
///
/// Hovering a node highlights it and its whole ancestor chain up to the root.
/// Each node's intensity (0.0 to 1.0) eases towards whether it is in that
/// chain, with exponential smoothing and a short hold time so skimming the
/// edge of a hit zone does not flicker.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	/// Currently hovered node (if any)
	pub hovered_node: Option<NodeId>,
	/// Hovered node plus its ancestors
	target_set: HashSet<NodeId>,
	/// Nodes not in this map have intensity 0.
	node_intensity: HashMap<NodeId, f64>,
	/// Per-node time remaining before fade-out can begin
	hold_timer: HashMap<NodeId, f64>,
	/// Cached max intensity (updated each tick)
	cached_max: f64,
}

/// Minimum time (seconds) a highlight must be held before it can fade out.
const MIN_HOLD_TIME: f64 = 0.12;

impl HighlightState {
	/// Update the hovered node and recompute the highlighted ancestor chain.
	pub fn set_hover(&mut self, node: Option<NodeId>, catalog: &Catalog) {
		if self.hovered_node == node {
			return;
		}

		self.hovered_node = node;
		self.target_set.clear();

		if let Some(id) = node {
			self.target_set.insert(id);
			self.target_set.extend(catalog.hierarchy.ancestors(id));
			for &idx in &self.target_set {
				self.hold_timer.insert(idx, MIN_HOLD_TIME);
			}
		}
	}

	/// Ease all intensities towards their targets.
	///
	/// value += (target - value) * (1 - e^(-speed * dt))
	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 6.0; // ~150ms to 95%
		const FADE_OUT_SPEED: f64 = 4.0; // ~250ms to 95%

		let fade_in_factor = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out_decay = (-FADE_OUT_SPEED * dt).exp();

		for &idx in &self.target_set {
			let intensity = self.node_intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in_factor;
		}

		let mut new_max: f64 = 0.0;

		self.hold_timer.retain(|idx, timer| {
			if self.target_set.contains(idx) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		self.node_intensity.retain(|idx, intensity| {
			if !self.target_set.contains(idx) {
				let hold_remaining = self.hold_timer.get(idx).copied().unwrap_or(0.0);
				if hold_remaining <= 0.0 {
					*intensity *= fade_out_decay;
				}
			}
			new_max = new_max.max(*intensity);
			*intensity > 0.005
		});

		self.cached_max = new_max;
	}

	pub fn node_intensity(&self, id: NodeId) -> f64 {
		self.node_intensity.get(&id).copied().unwrap_or(0.0)
	}

	/// Geometric mean of the endpoint intensities.
	pub fn link_intensity(&self, a: NodeId, b: NodeId) -> f64 {
		(self.node_intensity(a) * self.node_intensity(b)).sqrt()
	}

	pub fn max_intensity(&self) -> f64 {
		self.cached_max
	}
}

/// Everything the renderer needs for one frame.
///
/// Created when the component mounts; the filter effect swaps in new
/// [`Visibility`] values and gestures mutate the transform.
pub struct RadialTreeState {
	pub catalog: Arc<Catalog>,
	pub visibility: Visibility,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub highlight: HighlightState,
	pub variant: Variant,
	pub width: f64,
	pub height: f64,
	/// Initial transform, restored on double click.
	home: ViewTransform,
	colors: Vec<Color>,
	annotations: Vec<Option<String>>,
	geometry: LayoutConfig,
}

impl RadialTreeState {
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		catalog: Arc<Catalog>,
		visibility: Visibility,
		geometry: LayoutConfig,
		view: &ViewConfig,
		theme: &Theme,
		annotation: Option<&dyn NodeAnnotation>,
		width: f64,
		height: f64,
	) -> Self {
		let extent = outer_extent(&catalog, &geometry) + view.fit_margin;
		let home = ViewTransform::fitted(width, height, extent, view);
		let colors = branch_colors(&catalog, theme);
		let annotations = catalog
			.hierarchy
			.nodes()
			.iter()
			.map(|n| annotation.and_then(|a| a.annotate(&catalog.hierarchy, n.id)))
			.collect();

		Self {
			catalog,
			visibility,
			transform: home.clone(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			variant: Variant::default(),
			width,
			height,
			home,
			colors,
			annotations,
			geometry,
		}
	}

	pub fn node_color(&self, id: NodeId) -> Color {
		self.colors[id.0]
	}

	pub fn annotation(&self, id: NodeId) -> Option<&str> {
		self.annotations[id.0].as_deref()
	}

	pub fn geometry(&self) -> &LayoutConfig {
		&self.geometry
	}

	pub fn set_visibility(&mut self, visibility: Visibility) {
		self.visibility = visibility;
	}

	/// The node drawn under screen point `(sx, sy)`.
	pub fn node_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<NodeId> {
		let p = self.transform.screen_to_layout(sx, sy);
		match self.variant {
			Variant::Radial => {
				let scale = ScaledValues::new(config, self.transform.k);
				self.catalog
					.layout
					.nodes()
					.iter()
					.map(|n| (n.id, n.point(self.transform.rotation).distance(p)))
					.filter(|&(_, d)| d < scale.hit_radius)
					.min_by(|a, b| a.1.total_cmp(&b.1))
					.map(|(id, _)| id)
			}
			Variant::Sunburst => {
				let (angle, radius) = unproject(p);
				if radius < centre_radius(&self.geometry) {
					return Some(self.catalog.hierarchy.root());
				}
				let angle = normalize_angle(angle - self.transform.rotation);
				self.catalog
					.sectors
					.iter()
					.find(|s| s.contains(angle, radius))
					.map(|s| s.id)
			}
		}
	}

	pub fn set_hover(&mut self, node: Option<NodeId>) {
		self.highlight.set_hover(node, &self.catalog);
	}

	pub fn tick(&mut self, dt: f64) {
		self.highlight.tick(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.home.x = width / 2.0;
		self.home.y = height / 2.0;
		self.width = width;
		self.height = height;
	}

	pub fn reset_view(&mut self) {
		self.transform = self.home.clone();
	}
}

/// Largest ring radius in use.
fn outer_extent(catalog: &Catalog, geometry: &LayoutConfig) -> f64 {
	let deepest = catalog
		.hierarchy
		.nodes()
		.iter()
		.map(|n| n.depth)
		.max()
		.unwrap_or(0);
	geometry.radius_at(deepest)
}

/// Fill color for every node: each top-level branch takes the next palette
/// entry, descendants inherit it and brands are drawn a little lighter.
fn branch_colors(catalog: &Catalog, theme: &Theme) -> Vec<Color> {
	let tree = &catalog.hierarchy;
	let mut branch_index = HashMap::new();
	let mut next = 0;
	for &id in &tree.node(tree.root()).children {
		if tree.node(id).kind == NodeKind::Category {
			branch_index.insert(id, next);
			next += 1;
		}
	}

	tree.nodes()
		.iter()
		.map(|n| {
			let branch = tree.branch_of(n.id);
			let base = match branch.map(|b| tree.node(b).kind) {
				Some(NodeKind::ParentEntity) => theme.node.parent_color,
				_ => branch
					.and_then(|b| branch_index.get(&b))
					.map(|&i| theme.palette.get(i))
					.unwrap_or(theme.node.root_color),
			};
			match n.kind {
				NodeKind::Root => theme.node.root_color,
				NodeKind::Brand => base.lighten(theme.node.brand_lighten),
				NodeKind::ParentEntity | NodeKind::Category => base,
			}
		})
		.collect()
}
