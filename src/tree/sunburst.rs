//! Sunburst partition: one annular sector per non-root node.
//!
//! Uses the same leaf slots as the radial layout, so a brand's sector is
//! centred on its radial angle plus half a slot and sibling sectors tile
//! their parent's span exactly.

use super::layout::{normalize_angle, LayoutConfig};
use super::types::{Hierarchy, NodeId};

/// Sector of the sunburst ring at one depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSegment {
	pub id: NodeId,
	pub depth: usize,
	pub start_angle: f64,
	pub end_angle: f64,
	pub inner_radius: f64,
	pub outer_radius: f64,
}

impl ArcSegment {
	pub fn span(&self) -> f64 {
		self.end_angle - self.start_angle
	}

	pub fn mid_angle(&self) -> f64 {
		(self.start_angle + self.end_angle) / 2.0
	}

	/// Hit test in polar space, `angle` already corrected for rotation.
	pub fn contains(&self, angle: f64, radius: f64) -> bool {
		radius >= self.inner_radius
			&& radius < self.outer_radius
			&& normalize_angle(angle - self.start_angle) < self.span()
	}
}

/// Radius of the empty disc left for the root label.
pub fn centre_radius(config: &LayoutConfig) -> f64 {
	config.ring_step() / 3.0
}

/// Partition the layout's angular extent among all non-root nodes.
pub fn partition(tree: &Hierarchy, config: &LayoutConfig) -> Vec<ArcSegment> {
	let leaves = tree.leaves();
	if leaves.is_empty() {
		return Vec::new();
	}
	let slot = config.total_angle / leaves.len() as f64;

	// (first slot, one past last slot) per node.
	let mut spans: Vec<Option<(usize, usize)>> = vec![None; tree.len()];
	for (i, leaf) in leaves.iter().enumerate() {
		spans[leaf.0] = Some((i, i + 1));
	}
	let order = tree.depth_first();
	for &id in order.iter().rev() {
		let merged = tree
			.node(id)
			.children
			.iter()
			.filter_map(|c| spans[c.0])
			.reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)));
		if merged.is_some() {
			spans[id.0] = merged;
		}
	}

	order
		.into_iter()
		.filter(|&id| id != tree.root())
		.filter_map(|id| {
			let (first, last) = spans[id.0]?;
			let depth = tree.node(id).depth;
			Some(ArcSegment {
				id,
				depth,
				start_angle: first as f64 * slot,
				end_angle: last as f64 * slot,
				inner_radius: config
					.radius_at(depth - 1)
					.max(centre_radius(config)),
				outer_radius: config.radius_at(depth),
			})
		})
		.collect()
}
