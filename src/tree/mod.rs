//! Brand hierarchy core: tree building, radial layout, sunburst partition and
//! filter evaluation. Everything here is pure and synchronous; the canvas
//! component owns all view state.

pub mod annotation;
pub mod builder;
pub mod filter;
pub mod layout;
pub mod sunburst;
mod types;

use std::collections::BTreeSet;

use log::info;

pub use annotation::{NodeAnnotation, OwnershipAnnotation};
pub use builder::{
	build_hierarchy, BuildOutput, Diagnostic, ParentEntityConfig, TreeConfig,
	UnknownSubCategoryPolicy,
};
pub use filter::{evaluate, FilterState, OpacityConfig, Visibility, ALL_REGIONS};
pub use layout::{layout, project, LayoutConfig, Link, Point, PositionedNode, RadialLayout};
pub use sunburst::{partition, ArcSegment};
pub use types::{BrandRecord, Hierarchy, HierarchyNode, NodeId, NodeKind};

/// A built hierarchy together with its geometry and load diagnostics.
///
/// Built once per data load; filtering only produces a fresh [`Visibility`].
#[derive(Clone, Debug)]
pub struct Catalog {
	pub hierarchy: Hierarchy,
	pub layout: RadialLayout,
	pub sectors: Vec<ArcSegment>,
	pub diagnostics: Vec<Diagnostic>,
	/// Distinct regions of accepted brands, sorted.
	pub regions: Vec<String>,
}

impl Catalog {
	pub fn build(records: &[BrandRecord], tree: &TreeConfig, geometry: &LayoutConfig) -> Self {
		let BuildOutput {
			hierarchy,
			diagnostics,
		} = build_hierarchy(records, tree);
		let layout = layout(&hierarchy, geometry);
		let sectors = partition(&hierarchy, geometry);
		// Only leaves can match a region filter.
		let regions = hierarchy
			.leaves()
			.into_iter()
			.filter_map(|id| hierarchy.record(id))
			.map(|r| r.region.trim())
			.filter(|r| !r.is_empty())
			.map(str::to_string)
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect();

		info!(
			"brand-explorer: catalog has {} brands in {} nodes ({} diagnostics)",
			hierarchy.leaves().len(),
			hierarchy.len(),
			diagnostics.len()
		);
		Self {
			hierarchy,
			layout,
			sectors,
			diagnostics,
			regions,
		}
	}

	/// Visibility of every node under `filter`.
	pub fn evaluate(&self, filter: &FilterState) -> Visibility {
		evaluate(&self.hierarchy, filter)
	}

	pub fn sector(&self, id: NodeId) -> Option<&ArcSegment> {
		self.sectors.iter().find(|s| s.id == id)
	}
}

impl Default for Catalog {
	fn default() -> Self {
		Self::build(&[], &TreeConfig::default(), &LayoutConfig::default())
	}
}
