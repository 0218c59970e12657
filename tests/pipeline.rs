//! End-to-end checks of the records → hierarchy → layout → visibility pipeline.

#![allow(unused_crate_dependencies)]

use std::collections::BTreeSet;

use brand_explorer::config::ExplorerConfig;
use brand_explorer::data::parse_brand_records;
use brand_explorer::tree::{
	build_hierarchy, layout, project, BrandRecord, Catalog, Diagnostic, FilterState, Hierarchy,
	LayoutConfig, NodeAnnotation, NodeId, NodeKind, OwnershipAnnotation, ParentEntityConfig,
	TreeConfig, UnknownSubCategoryPolicy, Visibility,
};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn parent_config(policy: UnknownSubCategoryPolicy) -> TreeConfig {
	TreeConfig {
		parent_entity: Some(ParentEntityConfig {
			name: "ParentX".to_string(),
			sub_categories: vec!["Coffee".to_string(), "Water".to_string()],
			unknown_sub_category: policy,
		}),
		..TreeConfig::default()
	}
}

fn id_of(tree: &Hierarchy, name: &str) -> NodeId {
	tree.find(name).next().unwrap()
}

fn names(tree: &Hierarchy, ids: &BTreeSet<NodeId>) -> BTreeSet<String> {
	ids.iter().map(|&id| tree.node(id).name.clone()).collect()
}

fn path_to_root(tree: &Hierarchy, name: &str) -> Vec<String> {
	let id = id_of(tree, name);
	std::iter::once(id)
		.chain(tree.ancestors(id))
		.map(|a| tree.node(a).name.clone())
		.collect()
}

#[test]
fn single_record_sits_at_zero_degrees() {
	let records = [BrandRecord::new("A", "Water", "EU")];
	let catalog = Catalog::build(&records, &TreeConfig::default(), &LayoutConfig::default());
	let tree = &catalog.hierarchy;

	assert_eq!(path_to_root(tree, "A"), ["A", "Water", "Portfolio"]);
	let a = catalog.layout.node(id_of(tree, "A"));
	assert_eq!(a.angle_degrees, 0.0);
	assert_eq!(a.radius, 320.0);
	assert!((a.rotated_angle(30.0) - 30.0).abs() < EPS);

	let rotated = a.point(30.0);
	let expected = project(30.0, 320.0);
	assert!(rotated.distance(expected) < EPS);
}

#[test]
fn region_filter_keeps_both_categories_of_matches() {
	let records = [
		BrandRecord::new("Aqua", "Water", "EU"),
		BrandRecord::new("Brook", "Water", "US"),
		BrandRecord::new("Crunch", "Snacks", "EU"),
		BrandRecord::new("Dune", "Snacks", "US"),
	];
	let catalog = Catalog::build(&records, &TreeConfig::default(), &LayoutConfig::default());
	let visibility = catalog.evaluate(&FilterState::new("", "EU"));
	let tree = &catalog.hierarchy;

	assert_eq!(
		names(tree, visibility.matched()),
		BTreeSet::from(["Aqua".to_string(), "Crunch".to_string()])
	);
	assert_eq!(
		visibility.visible_names(tree),
		BTreeSet::from(["Portfolio", "Water", "Snacks", "Aqua", "Crunch"])
	);
	for link in catalog.layout.links() {
		let target = tree.node(link.target).name.as_str();
		assert_eq!(
			visibility.is_link_active(link),
			matches!(target, "Water" | "Snacks" | "Aqua" | "Crunch"),
			"link to {}",
			target
		);
	}
}

#[test]
fn parent_entity_nests_its_sub_categories() {
	let records = [
		BrandRecord::new("ParentX", "Holding", "Global"),
		BrandRecord::new("Latte", "Coffee", "EU").with_parent("ParentX"),
		BrandRecord::new("Crunch", "Snacks", "EU"),
	];
	let output = build_hierarchy(&records, &parent_config(UnknownSubCategoryPolicy::Reject));
	let tree = &output.hierarchy;

	assert!(output.diagnostics.is_empty());
	assert_eq!(path_to_root(tree, "Latte"), ["Latte", "Coffee", "ParentX", "Portfolio"]);
	let parent = tree.node(id_of(tree, "ParentX"));
	assert_eq!(parent.kind, NodeKind::ParentEntity);
	assert_eq!(parent.depth, 1);
	assert_eq!(tree.record(parent.id).map(|r| r.region.as_str()), Some("Global"));
}

#[test]
fn search_without_matches_leaves_only_structure() {
	let records = [
		BrandRecord::new("ParentX", "Holding", "Global"),
		BrandRecord::new("Latte", "Coffee", "EU").with_parent("ParentX"),
		BrandRecord::new("Crunch", "Snacks", "EU"),
		BrandRecord::new("Aqua", "Water", "US"),
	];
	let catalog = Catalog::build(
		&records,
		&parent_config(UnknownSubCategoryPolicy::Reject),
		&LayoutConfig::default(),
	);
	let visibility = catalog.evaluate(&FilterState::new("zzz", "all"));

	assert!(!visibility.has_matches());
	assert_eq!(
		visibility.visible_names(&catalog.hierarchy),
		BTreeSet::from(["Portfolio", "ParentX", "Coffee", "Snacks", "Water"])
	);
	assert_eq!(visibility.active().len(), 1);
}

#[test]
fn fixture_loads_with_expected_shape() {
	let config = ExplorerConfig::from_json(include_str!("../data/explorer-config.json")).unwrap();
	let parsed = parse_brand_records("brand-data", include_str!("../data/brands.json")).unwrap();
	assert_eq!(parsed.records.len(), 21);

	let catalog = parsed.into_catalog(&config.tree, &config.layout);
	let tree = &catalog.hierarchy;

	assert_eq!(tree.leaves().len(), 18);
	assert_eq!(catalog.regions, ["APAC", "EU", "Global", "LATAM", "NA"]);
	assert_eq!(
		catalog.diagnostics,
		[
			Diagnostic::MissingCategory {
				name: "Harbor Light".to_string(),
				fallback: "Uncategorized".to_string(),
			},
			Diagnostic::DuplicateName {
				name: "Tidbit".to_string(),
				index: 19,
			},
			Diagnostic::UnknownSubCategory {
				name: "Moss & Fern".to_string(),
				parent: "Evergreen Holdings".to_string(),
				category: "Tea".to_string(),
			},
		]
	);

	let top: Vec<&str> = tree
		.node(tree.root())
		.children
		.iter()
		.map(|&c| tree.node(c).name.as_str())
		.collect();
	assert_eq!(
		top,
		[
			"Beverages",
			"Confectionery",
			"Evergreen Holdings",
			"Frozen",
			"Nutrition",
			"Pet Care",
			"Snacks",
			"Uncategorized",
		]
	);

	// Radii table applies per depth.
	let clearbrook = catalog.layout.node(id_of(tree, "Clearbrook"));
	assert_eq!(clearbrook.radius, 340.0);
	let snacks = catalog.layout.node(id_of(tree, "Snacks"));
	assert_eq!(snacks.radius, 140.0);

	let kettle = id_of(tree, "Kettle & Crane");
	let polar = id_of(tree, "Polar Spring");
	let crunchwell = id_of(tree, "Crunchwell");
	assert_eq!(OwnershipAnnotation.annotate(tree, kettle).as_deref(), Some("51%"));
	assert_eq!(OwnershipAnnotation.annotate(tree, polar).as_deref(), Some("12.5%"));
	assert_eq!(OwnershipAnnotation.annotate(tree, crunchwell), None);

	let eu = catalog.evaluate(&FilterState::new("", "EU"));
	assert_eq!(eu.matched().len(), 7);
	let spring = catalog.evaluate(&FilterState::new("  SPRING ", "all"));
	assert_eq!(
		names(tree, spring.matched()),
		BTreeSet::from(["Polar Spring".to_string()])
	);
}

fn arb_record() -> impl Strategy<Value = BrandRecord> {
	(
		prop::sample::select(vec!["Aqua", "Brook", "Crunch", "Dune", "Ember", "ParentX", ""]),
		0u8..3,
		prop::sample::select(vec!["Water", "Coffee", "Snacks", "Tea", ""]),
		prop::sample::select(vec!["EU", "US", "APAC"]),
		any::<bool>(),
	)
		.prop_map(|(base, suffix, category, region, nested)| {
			let name = match base {
				"" | "ParentX" => base.to_string(),
				_ => format!("{}{}", base, suffix),
			};
			let record = BrandRecord::new(&name, category, region);
			if nested {
				record.with_parent("ParentX")
			} else {
				record
			}
		})
}

fn arb_records() -> impl Strategy<Value = Vec<BrandRecord>> {
	prop::collection::vec(arb_record(), 0..24)
}

fn arb_policy() -> impl Strategy<Value = UnknownSubCategoryPolicy> {
	prop_oneof![
		Just(UnknownSubCategoryPolicy::Reject),
		Just(UnknownSubCategoryPolicy::PromoteToTopLevel),
	]
}

/// Root, matched leaves and every ancestor of a matched leaf.
fn expected_active(tree: &Hierarchy, visibility: &Visibility) -> BTreeSet<NodeId> {
	let mut expected = BTreeSet::from([tree.root()]);
	for &leaf in visibility.matched() {
		expected.insert(leaf);
		expected.extend(tree.ancestors(leaf));
	}
	expected
}

proptest! {
	#[test]
	fn every_record_is_attached_or_reported(records in arb_records(), policy in arb_policy()) {
		let output = build_hierarchy(&records, &parent_config(policy));
		let tree = &output.hierarchy;
		let parent_attached = tree
			.nodes()
			.iter()
			.filter(|n| n.kind == NodeKind::ParentEntity && n.record.is_some())
			.count();

		prop_assert_eq!(
			tree.leaves().len() + parent_attached + output.rejected(),
			records.len()
		);
		for leaf in tree.leaves() {
			prop_assert!(tree.record(leaf).is_some());
		}
	}

	#[test]
	fn building_is_deterministic(records in arb_records(), policy in arb_policy()) {
		let config = parent_config(policy);
		let first = Catalog::build(&records, &config, &LayoutConfig::default());
		let second = Catalog::build(&records, &config, &LayoutConfig::default());
		prop_assert_eq!(&first.hierarchy, &second.hierarchy);
		prop_assert_eq!(&first.layout, &second.layout);
		prop_assert_eq!(&first.diagnostics, &second.diagnostics);
	}

	#[test]
	fn leaves_are_evenly_spaced_and_parents_centred(records in arb_records()) {
		let tree = build_hierarchy(&records, &parent_config(UnknownSubCategoryPolicy::Reject)).hierarchy;
		let positions = layout(&tree, &LayoutConfig::default());
		let leaves = tree.leaves();
		let step = if leaves.is_empty() { 0.0 } else { 360.0 / leaves.len() as f64 };

		for (i, &leaf) in leaves.iter().enumerate() {
			prop_assert!((positions.node(leaf).angle_degrees - i as f64 * step).abs() < EPS);
		}
		for node in tree.nodes().iter().filter(|n| !n.children.is_empty()) {
			let mean = node
				.children
				.iter()
				.map(|&c| positions.node(c).angle_degrees)
				.sum::<f64>()
				/ node.children.len() as f64;
			prop_assert!((positions.node(node.id).angle_degrees - mean).abs() < 1e-6);
			for &child in &node.children {
				prop_assert!(positions.node(child).radius > positions.node(node.id).radius);
			}
		}
	}

	#[test]
	fn narrowing_the_filter_never_adds_matches(
		records in arb_records(),
		region in prop::sample::select(vec!["all", "EU", "US"]),
		needle in prop::sample::select(vec!["a", "ru", "1", "zz"]),
	) {
		let catalog = Catalog::build(&records, &TreeConfig::default(), &LayoutConfig::default());
		let everything = catalog.evaluate(&FilterState::new("", "all"));
		let by_region = catalog.evaluate(&FilterState::new("", region));
		let narrowed = catalog.evaluate(&FilterState::new(needle, region));

		prop_assert!(by_region.matched().is_subset(everything.matched()));
		prop_assert!(narrowed.matched().is_subset(by_region.matched()));
		prop_assert!(narrowed.active().is_subset(by_region.active()));
		prop_assert!(narrowed.visible().is_subset(by_region.visible()));
	}

	#[test]
	fn active_set_is_matches_plus_ancestors(
		records in arb_records(),
		needle in prop::sample::select(vec!["", "a", "e1", "zz"]),
	) {
		let catalog = Catalog::build(
			&records,
			&parent_config(UnknownSubCategoryPolicy::PromoteToTopLevel),
			&LayoutConfig::default(),
		);
		let tree = &catalog.hierarchy;
		let visibility = catalog.evaluate(&FilterState::new(needle, "all"));

		prop_assert_eq!(visibility.active(), &expected_active(tree, &visibility));
		for node in tree.nodes() {
			if node.kind.is_structural() {
				prop_assert!(visibility.is_visible(node.id));
			}
		}
		for link in catalog.layout.links() {
			prop_assert_eq!(
				visibility.is_link_active(link),
				visibility.is_active(link.source) && visibility.is_active(link.target)
			);
		}
	}
}
