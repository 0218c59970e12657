//! Search and region filtering over a built hierarchy.
//!
//! The filter never changes the tree. It annotates nodes: matched leaves,
//! their ancestors (active), and the structural category / parent-entity
//! nodes which stay visible but dimmed when nothing under them matches.

use std::collections::BTreeSet;

use serde::Deserialize;

use super::layout::Link;
use super::types::{BrandRecord, Hierarchy, NodeId};

/// Region value that disables the region filter.
pub const ALL_REGIONS: &str = "all";

/// Current search box and region selector values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
	/// Case-insensitive substring matched against name, description and tagline.
	/// Surrounding whitespace is ignored, so `" spring"` searches for `spring`.
	pub search_text: String,
	/// Exact region, or [`ALL_REGIONS`] / empty for any.
	pub region: String,
}

impl FilterState {
	pub fn new(search_text: &str, region: &str) -> Self {
		Self {
			search_text: search_text.to_string(),
			region: region.to_string(),
		}
	}

	fn any_region(&self) -> bool {
		let region = self.region.trim();
		region.is_empty() || region == ALL_REGIONS
	}

	/// True when neither the search text nor the region restricts anything.
	pub fn is_unfiltered(&self) -> bool {
		self.any_region() && self.search_text.trim().is_empty()
	}

	/// Whether a brand passes both the region and the search test.
	pub fn matches(&self, record: &BrandRecord) -> bool {
		if !self.any_region() && record.region != self.region.trim() {
			return false;
		}
		let needle = self.search_text.trim().to_lowercase();
		if needle.is_empty() {
			return true;
		}
		[record.name.as_str(), record.description(), record.tagline()]
			.iter()
			.any(|field| field.to_lowercase().contains(&needle))
	}
}

/// Opacity table used to turn visibility into drawing alpha.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpacityConfig {
	/// Matched brands and their ancestors.
	pub active: f64,
	/// Structural nodes with nothing matching underneath.
	pub dimmed: f64,
	/// Brands that fail the filter.
	pub filtered_out: f64,
	pub link_active: f64,
	pub link_inactive: f64,
}

impl Default for OpacityConfig {
	fn default() -> Self {
		Self {
			active: 1.0,
			dimmed: 0.35,
			filtered_out: 0.1,
			link_active: 0.6,
			link_inactive: 0.08,
		}
	}
}

/// Per-node visibility under one [`FilterState`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Visibility {
	matched: BTreeSet<NodeId>,
	active: BTreeSet<NodeId>,
	visible: BTreeSet<NodeId>,
}

impl Visibility {
	/// Leaves passing the filter.
	pub fn matched(&self) -> &BTreeSet<NodeId> {
		&self.matched
	}

	/// Matched leaves, every ancestor of one, and the root.
	pub fn active(&self) -> &BTreeSet<NodeId> {
		&self.active
	}

	/// Active nodes plus every category and parent-entity node.
	pub fn visible(&self) -> &BTreeSet<NodeId> {
		&self.visible
	}

	pub fn has_matches(&self) -> bool {
		!self.matched.is_empty()
	}

	pub fn is_active(&self, id: NodeId) -> bool {
		self.active.contains(&id)
	}

	pub fn is_visible(&self, id: NodeId) -> bool {
		self.visible.contains(&id)
	}

	/// A link is active only when both endpoints are.
	pub fn is_link_active(&self, link: &Link) -> bool {
		self.is_active(link.source) && self.is_active(link.target)
	}

	pub fn node_opacity(&self, id: NodeId, config: &OpacityConfig) -> f64 {
		if self.is_active(id) {
			config.active
		} else if self.is_visible(id) {
			config.dimmed
		} else {
			config.filtered_out
		}
	}

	pub fn link_opacity(&self, link: &Link, config: &OpacityConfig) -> f64 {
		if self.is_link_active(link) {
			config.link_active
		} else {
			config.link_inactive
		}
	}

	pub fn matched_names<'a>(&self, tree: &'a Hierarchy) -> BTreeSet<&'a str> {
		names(tree, &self.matched)
	}

	pub fn visible_names<'a>(&self, tree: &'a Hierarchy) -> BTreeSet<&'a str> {
		names(tree, &self.visible)
	}
}

fn names<'a>(tree: &'a Hierarchy, ids: &BTreeSet<NodeId>) -> BTreeSet<&'a str> {
	ids.iter().map(|&id| tree.node(id).name.as_str()).collect()
}

/// Compute visibility for every node of `tree` under `filter`.
pub fn evaluate(tree: &Hierarchy, filter: &FilterState) -> Visibility {
	let matched: BTreeSet<NodeId> = tree
		.leaves()
		.into_iter()
		.filter(|&id| tree.record(id).is_some_and(|r| filter.matches(r)))
		.collect();

	let mut active = matched.clone();
	active.insert(tree.root());
	for &leaf in &matched {
		for ancestor in tree.ancestors(leaf) {
			if !active.insert(ancestor) {
				// The rest of the chain is already in.
				break;
			}
		}
	}

	let mut visible = active.clone();
	visible.extend(
		tree.nodes()
			.iter()
			.filter(|n| n.kind.is_structural())
			.map(|n| n.id),
	);

	Visibility {
		matched,
		active,
		visible,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tree::builder::{build_hierarchy, ParentEntityConfig, TreeConfig};

	fn brands() -> Vec<BrandRecord> {
		vec![
			BrandRecord::new("Aqua", "Water", "EU").with_tagline("Pure alpine spring"),
			BrandRecord::new("Brook", "Water", "US"),
			BrandRecord::new("Crunch", "Snacks", "EU").with_description("Salted crisps"),
			BrandRecord::new("Dip", "Snacks", "US"),
		]
	}

	fn tree() -> Hierarchy {
		build_hierarchy(&brands(), &TreeConfig::default()).hierarchy
	}

	#[test]
	fn region_filter_keeps_matching_branches() {
		let tree = tree();
		let vis = evaluate(&tree, &FilterState::new("", "EU"));

		assert_eq!(
			vis.visible_names(&tree),
			BTreeSet::from(["Portfolio", "Water", "Snacks", "Aqua", "Crunch"])
		);
		assert_eq!(vis.matched_names(&tree), BTreeSet::from(["Aqua", "Crunch"]));
	}

	#[test]
	fn search_is_case_insensitive_across_fields() {
		let tree = tree();
		let by_tagline = evaluate(&tree, &FilterState::new("ALPINE", ALL_REGIONS));
		assert_eq!(by_tagline.matched_names(&tree), BTreeSet::from(["Aqua"]));

		let by_description = evaluate(&tree, &FilterState::new("crisps", ""));
		assert_eq!(by_description.matched_names(&tree), BTreeSet::from(["Crunch"]));

		let both = evaluate(&tree, &FilterState::new("d", "US"));
		assert_eq!(both.matched_names(&tree), BTreeSet::from(["Dip"]));
	}

	#[test]
	fn search_ignores_surrounding_whitespace() {
		let tree = tree();
		let padded = evaluate(&tree, &FilterState::new("  spring ", ALL_REGIONS));
		assert_eq!(padded.matched_names(&tree), BTreeSet::from(["Aqua"]));
		// Inner whitespace is part of the needle.
		let inner = evaluate(&tree, &FilterState::new("alpine  spring", ALL_REGIONS));
		assert!(!inner.has_matches());
	}

	#[test]
	fn no_match_keeps_structure_dimmed() {
		let tree = tree();
		let vis = evaluate(&tree, &FilterState::new("zzz", ALL_REGIONS));
		let config = OpacityConfig::default();

		assert!(!vis.has_matches());
		assert_eq!(vis.active().len(), 1);
		assert_eq!(
			vis.visible_names(&tree),
			BTreeSet::from(["Portfolio", "Water", "Snacks"])
		);

		let water = tree.find("Water").next().unwrap();
		let aqua = tree.find("Aqua").next().unwrap();
		assert_eq!(vis.node_opacity(tree.root(), &config), config.active);
		assert_eq!(vis.node_opacity(water, &config), config.dimmed);
		assert_eq!(vis.node_opacity(aqua, &config), config.filtered_out);
	}

	#[test]
	fn links_need_both_ends_active() {
		let tree = tree();
		let vis = evaluate(&tree, &FilterState::new("aqua", ALL_REGIONS));
		let water = tree.find("Water").next().unwrap();
		let snacks = tree.find("Snacks").next().unwrap();
		let aqua = tree.find("Aqua").next().unwrap();
		let brook = tree.find("Brook").next().unwrap();

		let root_water = Link { source: tree.root(), target: water };
		let root_snacks = Link { source: tree.root(), target: snacks };
		assert!(vis.is_link_active(&Link { source: water, target: aqua }));
		assert!(vis.is_link_active(&root_water));
		assert!(!vis.is_link_active(&Link { source: water, target: brook }));
		assert!(!vis.is_link_active(&root_snacks));

		let config = OpacityConfig::default();
		assert_eq!(vis.link_opacity(&root_snacks, &config), config.link_inactive);
	}

	#[test]
	fn unfiltered_state_activates_everything() {
		let tree = tree();
		let filter = FilterState::new("  ", ALL_REGIONS);
		assert!(filter.is_unfiltered());
		let vis = evaluate(&tree, &filter);
		assert_eq!(vis.active().len(), tree.len());
	}

	#[test]
	fn nested_matches_activate_the_parent_chain() {
		let config = TreeConfig {
			parent_entity: Some(ParentEntityConfig {
				name: "ParentX".to_string(),
				sub_categories: vec!["Coffee".to_string()],
				..ParentEntityConfig::default()
			}),
			..TreeConfig::default()
		};
		let mut records = brands();
		records.push(BrandRecord::new("Brew", "Coffee", "BR").with_parent("ParentX"));
		let tree = build_hierarchy(&records, &config).hierarchy;

		let vis = evaluate(&tree, &FilterState::new("", "BR"));
		let brew = tree.find("Brew").next().unwrap();
		assert!(tree.ancestors(brew).all(|a| vis.is_active(a)));

		let water = tree.find("Water").next().unwrap();
		assert!(vis.is_visible(water) && !vis.is_active(water));
	}
}
