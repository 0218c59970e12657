//! Radial cluster layout.
//!
//! Leaves are spread at equal angular steps in depth-first order, internal
//! nodes sit at the mean angle of their children, and radius grows with depth.
//! Angles are in degrees with 0 at twelve o'clock, increasing clockwise.
//! Cartesian positions are derived on demand so rotation and zoom never need
//! a re-layout.

use serde::Deserialize;

use super::types::{Hierarchy, NodeId};

/// Layout geometry settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
	/// Angular extent shared by all leaves, in degrees.
	pub total_angle: f64,
	/// Radius of the ring holding one-level brands.
	pub max_radius: f64,
	/// Optional per-depth radius table. Depths past its end continue from the
	/// last entry, one `ring_step()` per level.
	pub radii: Vec<f64>,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			total_angle: 360.0,
			max_radius: 320.0,
			radii: Vec::new(),
		}
	}
}

impl LayoutConfig {
	/// Distance between consecutive depth rings.
	pub fn ring_step(&self) -> f64 {
		self.max_radius / 2.0
	}

	/// Radius of the ring at `depth`. The root is always at the centre.
	///
	/// Depths past the end of the `radii` table continue outwards from its
	/// last entry in `ring_step` increments.
	pub fn radius_at(&self, depth: usize) -> f64 {
		if depth == 0 {
			return 0.0;
		}
		if let Some(&r) = self.radii.get(depth) {
			return r;
		}
		match self.radii.last() {
			Some(&last) => last + (depth + 1 - self.radii.len()) as f64 * self.ring_step(),
			None => depth as f64 * self.ring_step(),
		}
	}
}

/// A point in layout space, centred on the root.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

/// Project polar coordinates (degrees, 0 = up, clockwise) to Cartesian.
pub fn project(angle_degrees: f64, radius: f64) -> Point {
	let theta = (angle_degrees - 90.0).to_radians();
	Point {
		x: radius * theta.cos(),
		y: radius * theta.sin(),
	}
}

/// Inverse of [`project`]: polar angle (degrees, 0 = up, clockwise) and radius.
pub fn unproject(point: Point) -> (f64, f64) {
	let angle = normalize_angle(point.y.atan2(point.x).to_degrees() + 90.0);
	(angle, point.x.hypot(point.y))
}

/// Wrap an angle into `[0, 360)`.
pub fn normalize_angle(degrees: f64) -> f64 {
	degrees.rem_euclid(360.0)
}

/// Polar position of one hierarchy node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedNode {
	pub id: NodeId,
	pub angle_degrees: f64,
	pub radius: f64,
}

impl PositionedNode {
	/// Cartesian position after applying a rotation offset.
	pub fn point(&self, rotation: f64) -> Point {
		project(self.angle_degrees + rotation, self.radius)
	}

	/// Angle after rotation, wrapped into `[0, 360)`.
	pub fn rotated_angle(&self, rotation: f64) -> f64 {
		normalize_angle(self.angle_degrees + rotation)
	}
}

/// A parent -> child edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	pub source: NodeId,
	pub target: NodeId,
}

/// Positions for every node of a hierarchy, indexed by [`NodeId`].
#[derive(Clone, Debug, PartialEq)]
pub struct RadialLayout {
	nodes: Vec<PositionedNode>,
	links: Vec<Link>,
	leaf_step: f64,
}

impl RadialLayout {
	pub fn node(&self, id: NodeId) -> &PositionedNode {
		&self.nodes[id.0]
	}

	pub fn nodes(&self) -> &[PositionedNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Angular distance between consecutive leaves (0 when there are none).
	pub fn leaf_step(&self) -> f64 {
		self.leaf_step
	}
}

/// Assign an angle and radius to every node.
pub fn layout(tree: &Hierarchy, config: &LayoutConfig) -> RadialLayout {
	let leaves = tree.leaves();
	let leaf_step = if leaves.is_empty() {
		0.0
	} else {
		config.total_angle / leaves.len() as f64
	};

	let mut angles = vec![0.0; tree.len()];
	for (i, leaf) in leaves.iter().enumerate() {
		angles[leaf.0] = i as f64 * leaf_step;
	}

	let order = tree.depth_first();
	// Children before parents.
	for &id in order.iter().rev() {
		let children = &tree.node(id).children;
		if children.is_empty() {
			continue;
		}
		let sum: f64 = children.iter().map(|c| angles[c.0]).sum();
		angles[id.0] = sum / children.len() as f64;
	}

	let nodes = tree
		.nodes()
		.iter()
		.map(|n| PositionedNode {
			id: n.id,
			angle_degrees: angles[n.id.0],
			radius: config.radius_at(n.depth),
		})
		.collect();

	let links = order
		.iter()
		.filter_map(|&id| {
			tree.node(id).parent.map(|source| Link { source, target: id })
		})
		.collect();

	RadialLayout {
		nodes,
		links,
		leaf_step,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tree::builder::{build_hierarchy, TreeConfig};
	use crate::tree::types::BrandRecord;

	const EPS: f64 = 1e-9;

	fn tree_of(records: &[BrandRecord]) -> Hierarchy {
		build_hierarchy(records, &TreeConfig::default()).hierarchy
	}

	#[test]
	fn projection_puts_zero_degrees_at_the_top() {
		let up = project(0.0, 10.0);
		assert!(up.x.abs() < EPS && (up.y + 10.0).abs() < EPS);

		let right = project(90.0, 10.0);
		assert!((right.x - 10.0).abs() < EPS && right.y.abs() < EPS);

		let down = project(180.0, 10.0);
		assert!(down.x.abs() < EPS && (down.y - 10.0).abs() < EPS);
	}

	#[test]
	fn unproject_inverts_project() {
		for angle in [10.0, 45.0, 135.0, 270.0, 350.0] {
			let (a, r) = unproject(project(angle, 42.0));
			assert!((a - angle).abs() < 1e-6, "{angle} -> {a}");
			assert!((r - 42.0).abs() < 1e-9);
		}
	}

	#[test]
	fn rotation_wraps_without_clamping() {
		assert_eq!(normalize_angle(370.0), 10.0);
		assert_eq!(normalize_angle(-90.0), 270.0);
		let node = PositionedNode {
			id: NodeId(1),
			angle_degrees: 300.0,
			radius: 5.0,
		};
		assert!((node.rotated_angle(120.0) - 60.0).abs() < EPS);
	}

	#[test]
	fn single_leaf_sits_at_zero() {
		let tree = tree_of(&[BrandRecord::new("A", "Water", "EU")]);
		let layout = layout(&tree, &LayoutConfig::default());
		let a = tree.find("A").next().unwrap();

		assert_eq!(layout.node(a).angle_degrees, 0.0);
		assert_eq!(layout.node(a).radius, 320.0);
		assert_eq!(layout.leaf_step(), 360.0);
		assert_eq!(layout.node(tree.root()).radius, 0.0);
	}

	#[test]
	fn leaves_are_evenly_spaced_and_parents_average_children() {
		let tree = tree_of(&[
			BrandRecord::new("A", "Snacks", "EU"),
			BrandRecord::new("B", "Snacks", "EU"),
			BrandRecord::new("C", "Water", "EU"),
			BrandRecord::new("D", "Water", "EU"),
		]);
		let layout = layout(&tree, &LayoutConfig::default());

		let angles: Vec<f64> = tree
			.leaves()
			.iter()
			.map(|&id| layout.node(id).angle_degrees)
			.collect();
		assert_eq!(angles, [0.0, 90.0, 180.0, 270.0]);

		let snacks = tree.find("Snacks").next().unwrap();
		let water = tree.find("Water").next().unwrap();
		assert!((layout.node(snacks).angle_degrees - 45.0).abs() < EPS);
		assert!((layout.node(water).angle_degrees - 225.0).abs() < EPS);
		assert_eq!(layout.node(snacks).radius, 160.0);
		assert_eq!(layout.links().len(), tree.len() - 1);
	}

	#[test]
	fn radii_table_overrides_uniform_rings() {
		let config = LayoutConfig {
			radii: vec![50.0, 90.0],
			..LayoutConfig::default()
		};
		assert_eq!(config.radius_at(0), 0.0);
		assert_eq!(config.radius_at(1), 90.0);
		assert_eq!(config.radius_at(3), 90.0 + 2.0 * 160.0);
	}

	#[test]
	fn rings_past_a_short_table_stay_outside_it() {
		let config = LayoutConfig {
			radii: vec![0.0, 300.0, 600.0],
			..LayoutConfig::default()
		};
		assert_eq!(config.radius_at(2), 600.0);
		assert_eq!(config.radius_at(3), 760.0);
		for depth in 1..6 {
			assert!(config.radius_at(depth + 1) > config.radius_at(depth));
		}
	}

	#[test]
	fn empty_tree_places_root_at_origin() {
		let tree = tree_of(&[]);
		let layout = layout(&tree, &LayoutConfig::default());
		assert_eq!(layout.nodes().len(), 1);
		assert_eq!(layout.node(tree.root()).angle_degrees, 0.0);
		assert_eq!(layout.node(tree.root()).radius, 0.0);
		assert!(layout.links().is_empty());
	}
}
