//! Zoom-dependent scaling configuration for tree visuals.
//!
//! # Coordinate Spaces
//!
//! - **Layout-space**: the coordinate system of the radial layout, centred on
//!   the root. Values here grow on screen when zooming in.
//! - **Screen-space**: pixel coordinates on the canvas, unaffected by zoom.
//!
//! Drawing happens after the canvas transform (pan, then zoom `k`), so every
//! size computed here is returned in layout-space.

use crate::tree::NodeKind;

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Fixed pixel size on screen whatever the zoom.
	Screen,
	/// Grows with zoom but never leaves `[min_screen, max_screen]` pixels.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Compute the layout-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = layout_size * k
				let min_world = min_screen / k;
				let max_world = max_screen / k;
				base.clamp(min_world, max_world)
			}
		}
	}
}

/// Defines how alpha/opacity scales with zoom level.
#[derive(Clone, Debug)]
pub enum AlphaBehavior {
	Constant,
	/// Opaque from `full_alpha_k` up, invisible at `zero_alpha_k` and below.
	Fade {
		zero_alpha_k: f64,
		full_alpha_k: f64,
	},
}

impl AlphaBehavior {
	/// Compute alpha multiplier for a given zoom level.
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				let t = (k - zero_alpha_k) / (full_alpha_k - zero_alpha_k);
				t.clamp(0.0, 1.0)
			}
		}
	}
}

/// Configuration for node visual scaling.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Base radius per node kind, in layout units.
	pub root_radius: f64,
	pub parent_radius: f64,
	pub category_radius: f64,
	pub brand_radius: f64,
	pub radius_behavior: ScaleBehavior,
	/// Hit detection radius in layout units.
	pub hit_radius: f64,
	pub hit_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Minimum zoom level for label font scaling.
	pub label_min_k: f64,
	/// Brand labels crowd at low zoom; fade them out.
	pub brand_label_alpha: AlphaBehavior,
	/// Category and parent-entity labels.
	pub structural_label_alpha: AlphaBehavior,
}

/// Configuration for link visual scaling.
#[derive(Clone, Debug)]
pub struct LinkScaleConfig {
	/// Base line width in screen pixels.
	pub line_width: f64,
	/// Dash pattern (dash, gap) for inactive links, in screen pixels.
	pub inactive_dash: (f64, f64),
}

/// Configuration for the hover ring.
#[derive(Clone, Debug)]
pub struct GlowScaleConfig {
	/// Stroke width for hover ring in screen pixels.
	pub ring_width: f64,
	/// Ring offset from node edge in screen pixels.
	pub ring_offset: f64,
}

/// Complete scale configuration for all tree elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub link: LinkScaleConfig,
	pub glow: GlowScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				root_radius: 9.0,
				parent_radius: 8.0,
				category_radius: 6.0,
				brand_radius: 4.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 3.0,
					max_screen: 28.0,
				},
				hit_radius: 10.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 6.0,
					max_screen: f64::INFINITY,
				},
				label_size: 11.0,
				label_min_k: 0.6,
				brand_label_alpha: AlphaBehavior::Fade {
					zero_alpha_k: 0.45,
					full_alpha_k: 0.9,
				},
				structural_label_alpha: AlphaBehavior::Constant,
			},
			link: LinkScaleConfig {
				line_width: 1.2,
				inactive_dash: (3.0, 3.0),
			},
			glow: GlowScaleConfig {
				ring_width: 1.5,
				ring_offset: 2.0,
			},
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in layout-space (ready to use after canvas transform).
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	root_radius: f64,
	parent_radius: f64,
	category_radius: f64,
	brand_radius: f64,
	/// Hit detection radius in layout-space.
	pub hit_radius: f64,
	/// Label font string (e.g., "11px sans-serif").
	pub label_font: String,
	/// Bold variant for structural labels.
	pub heading_font: String,
	/// Gap between a node and its label.
	pub label_gap: f64,
	pub brand_label_alpha: f64,
	pub structural_label_alpha: f64,
	/// Link line width in layout-space.
	pub link_width: f64,
	pub inactive_dash: (f64, f64),
	/// Hover ring width in layout-space.
	pub ring_width: f64,
	/// Hover ring offset in layout-space.
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Compute scaled values from configuration and current zoom level.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let node = &config.node;
		let radius = |base: f64| node.radius_behavior.apply(base, k);
		let label_font_size = node.label_size / k.max(node.label_min_k);

		Self {
			k,
			root_radius: radius(node.root_radius),
			parent_radius: radius(node.parent_radius),
			category_radius: radius(node.category_radius),
			brand_radius: radius(node.brand_radius),
			hit_radius: node.hit_behavior.apply(node.hit_radius, k),
			label_font: format!("{}px sans-serif", label_font_size),
			heading_font: format!("600 {}px sans-serif", label_font_size * 1.1),
			label_gap: 4.0 / k,
			brand_label_alpha: node.brand_label_alpha.apply(k),
			structural_label_alpha: node.structural_label_alpha.apply(k),
			link_width: config.link.line_width / k,
			inactive_dash: (
				config.link.inactive_dash.0 / k,
				config.link.inactive_dash.1 / k,
			),
			ring_width: config.glow.ring_width / k,
			ring_offset: config.glow.ring_offset / k,
		}
	}

	/// Drawn radius of a node of the given kind.
	pub fn node_radius(&self, kind: NodeKind) -> f64 {
		match kind {
			NodeKind::Root => self.root_radius,
			NodeKind::ParentEntity => self.parent_radius,
			NodeKind::Category => self.category_radius,
			NodeKind::Brand => self.brand_radius,
		}
	}

	pub fn label_alpha(&self, kind: NodeKind) -> f64 {
		match kind {
			NodeKind::Brand => self.brand_label_alpha,
			NodeKind::Root | NodeKind::ParentEntity | NodeKind::Category => {
				self.structural_label_alpha
			}
		}
	}
}
