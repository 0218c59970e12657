//! Builds the brand hierarchy from a flat record list.
//!
//! Records fall into three groups: the distinguished parent entity itself,
//! brands owned by it (nested parent entity -> sub-category -> brand), and
//! everything else (root -> category -> brand). Data problems never abort the
//! build; each one is logged and reported as a [`Diagnostic`].

use std::collections::{BTreeMap, HashSet};

use log::{debug, warn};
use serde::Deserialize;

use super::types::{BrandRecord, Hierarchy, NodeId, NodeKind};

/// What to do with a brand owned by the parent entity whose category is not
/// one of the parent's configured sub-categories.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnknownSubCategoryPolicy {
	/// Log, report and leave the brand out of the tree.
	#[default]
	Reject,
	/// File the brand under the ordinary top-level category instead.
	PromoteToTopLevel,
}

/// The parent entity that owns its own sub-category structure.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParentEntityConfig {
	/// Exact record name of the entity.
	pub name: String,
	/// Known sub-category buckets.
	pub sub_categories: Vec<String>,
	pub unknown_sub_category: UnknownSubCategoryPolicy,
}

/// Tree builder settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TreeConfig {
	/// Label of the root node.
	pub root_name: String,
	/// Bucket for records without a category.
	pub fallback_category: String,
	/// Directory holding category icon assets.
	pub icon_base: String,
	/// Category name -> icon asset key. Unlisted categories use `default`.
	pub category_icons: BTreeMap<String, String>,
	pub parent_entity: Option<ParentEntityConfig>,
}

impl Default for TreeConfig {
	fn default() -> Self {
		Self {
			root_name: "Portfolio".to_string(),
			fallback_category: "Uncategorized".to_string(),
			icon_base: "assets/icons".to_string(),
			category_icons: default_category_icons(),
			parent_entity: None,
		}
	}
}

impl TreeConfig {
	/// Icon URL for a category, derived from the asset-key table.
	pub fn icon_url(&self, category: &str) -> String {
		let key = self
			.category_icons
			.get(category)
			.map(String::as_str)
			.unwrap_or("default");
		format!("{}/{}.svg", self.icon_base.trim_end_matches('/'), key)
	}
}

/// Default category icon keys.
pub fn default_category_icons() -> BTreeMap<String, String> {
	[
		("Beverages", "beverage"),
		("Coffee", "coffee"),
		("Confectionery", "confectionery"),
		("Dairy", "dairy"),
		("Frozen", "frozen"),
		("Nutrition", "nutrition"),
		("Pet Care", "pet"),
		("Snacks", "snack"),
		("Water", "water"),
	]
	.into_iter()
	.map(|(k, v)| (k.to_string(), v.to_string()))
	.collect()
}

/// A recoverable data problem found while loading or building.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Diagnostic {
	#[error("record #{index} could not be read: {reason}")]
	MalformedRecord { index: usize, reason: String },
	#[error("record #{index} has no name and was skipped")]
	MissingName { index: usize },
	#[error("duplicate brand {name:?} in record #{index} was skipped")]
	DuplicateName { name: String, index: usize },
	#[error("brand {name:?} has no category, filed under {fallback:?}")]
	MissingCategory { name: String, fallback: String },
	#[error("brand {name:?} of {parent:?} has unknown sub-category {category:?} and was skipped")]
	UnknownSubCategory {
		name: String,
		parent: String,
		category: String,
	},
	#[error("brand {name:?} of {parent:?} has unknown sub-category {category:?}, filed at top level")]
	PromotedSubCategory {
		name: String,
		parent: String,
		category: String,
	},
	#[error("parent entity {name:?} has no record and owns no brands")]
	ParentEntityMissing { name: String },
}

impl Diagnostic {
	/// Whether the record this diagnostic concerns was left out of the tree.
	pub fn is_rejection(&self) -> bool {
		matches!(
			self,
			Diagnostic::MalformedRecord { .. }
				| Diagnostic::MissingName { .. }
				| Diagnostic::DuplicateName { .. }
				| Diagnostic::UnknownSubCategory { .. }
		)
	}
}

/// Result of [`build_hierarchy`].
#[derive(Clone, Debug)]
pub struct BuildOutput {
	pub hierarchy: Hierarchy,
	pub diagnostics: Vec<Diagnostic>,
}

impl BuildOutput {
	/// Number of input records left out of the tree.
	pub fn rejected(&self) -> usize {
		self.diagnostics.iter().filter(|d| d.is_rejection()).count()
	}
}

/// Get-or-create category buckets hanging off one owner node.
struct Buckets {
	owner: NodeId,
	by_name: BTreeMap<String, NodeId>,
}

impl Buckets {
	fn new(owner: NodeId) -> Self {
		Self {
			owner,
			by_name: BTreeMap::new(),
		}
	}

	fn get_or_create(&mut self, tree: &mut Hierarchy, config: &TreeConfig, name: &str) -> NodeId {
		if let Some(&id) = self.by_name.get(name) {
			return id;
		}
		let id = tree.add_node(name, NodeKind::Category);
		tree.node_mut(id).icon_url = Some(config.icon_url(name));
		tree.attach(self.owner, id);
		self.by_name.insert(name.to_string(), id);
		id
	}
}

fn add_brand(tree: &mut Hierarchy, bucket: NodeId, record: BrandRecord) -> NodeId {
	let id = tree.add_node(&record.name, NodeKind::Brand);
	let logo = record.logo_url.clone();
	let index = tree.push_record(record);
	let node = tree.node_mut(id);
	node.logo_url = logo;
	node.record = Some(index);
	tree.attach(bucket, id);
	id
}

/// Build the brand hierarchy.
///
/// Every record ends up either attached exactly once (as a brand leaf or as the
/// parent-entity node) or reported by exactly one rejecting [`Diagnostic`].
pub fn build_hierarchy(records: &[BrandRecord], config: &TreeConfig) -> BuildOutput {
	let mut diagnostics = Vec::new();
	let mut seen: HashSet<String> = HashSet::new();
	let parent_cfg = config
		.parent_entity
		.as_ref()
		.map(|p| (p.name.trim(), p))
		.filter(|(name, _)| !name.is_empty());

	let mut parent_record: Option<BrandRecord> = None;
	let mut nested = Vec::new();
	let mut plain = Vec::new();

	for (index, record) in records.iter().enumerate() {
		let name = record.name.trim();
		if name.is_empty() {
			warn!("brand-explorer: record #{} has no name, skipping", index);
			diagnostics.push(Diagnostic::MissingName { index });
			continue;
		}
		if !seen.insert(name.to_string()) {
			warn!("brand-explorer: duplicate brand {:?}, skipping", name);
			diagnostics.push(Diagnostic::DuplicateName {
				name: name.to_string(),
				index,
			});
			continue;
		}

		let mut record = record.clone();
		record.name = name.to_string();
		record.category = record.category.trim().to_string();
		record.region = record.region.trim().to_string();
		if record.category.is_empty() {
			warn!("brand-explorer: brand {:?} has no category", name);
			diagnostics.push(Diagnostic::MissingCategory {
				name: record.name.clone(),
				fallback: config.fallback_category.clone(),
			});
			record.category = config.fallback_category.clone();
		}

		match parent_cfg {
			Some((parent, _)) if parent == record.name => parent_record = Some(record),
			Some((parent, _)) if record.parent_brand.as_deref().map(str::trim) == Some(parent) => {
				nested.push(record)
			}
			_ => plain.push(record),
		}
	}

	let mut tree = Hierarchy::new(&config.root_name);
	let mut categories = Buckets::new(tree.root());

	if let Some((parent, p)) = parent_cfg {
		if parent_record.is_none() && nested.is_empty() {
			warn!("brand-explorer: parent entity {:?} matches no records", parent);
			diagnostics.push(Diagnostic::ParentEntityMissing {
				name: parent.to_string(),
			});
		}
		let parent_id = tree.add_node(parent, NodeKind::ParentEntity);
		let mut sub_categories = Buckets::new(parent_id);

		for record in nested {
			let known = record.category == config.fallback_category
				|| p.sub_categories.iter().any(|c| *c == record.category);
			if known {
				let bucket = sub_categories.get_or_create(&mut tree, config, &record.category);
				add_brand(&mut tree, bucket, record);
				continue;
			}
			match p.unknown_sub_category {
				UnknownSubCategoryPolicy::Reject => {
					warn!(
						"brand-explorer: {:?} has no sub-category {:?}, skipping {:?}",
						parent, record.category, record.name
					);
					diagnostics.push(Diagnostic::UnknownSubCategory {
						name: record.name,
						parent: parent.to_string(),
						category: record.category,
					});
				}
				UnknownSubCategoryPolicy::PromoteToTopLevel => {
					warn!(
						"brand-explorer: {:?} has no sub-category {:?}, promoting {:?}",
						parent, record.category, record.name
					);
					diagnostics.push(Diagnostic::PromotedSubCategory {
						name: record.name.clone(),
						parent: parent.to_string(),
						category: record.category.clone(),
					});
					plain.push(record);
				}
			}
		}

		if tree.node(parent_id).children.is_empty() {
			// Nothing nested: the entity is an ordinary brand.
			plain.extend(parent_record);
		} else {
			if let Some(record) = parent_record {
				let logo = record.logo_url.clone();
				let index = tree.push_record(record);
				let node = tree.node_mut(parent_id);
				node.logo_url = logo;
				node.record = Some(index);
			}
			let root = tree.root();
			tree.attach(root, parent_id);
		}
	}

	for record in plain {
		let bucket = categories.get_or_create(&mut tree, config, &record.category);
		add_brand(&mut tree, bucket, record);
	}

	let hierarchy = tree.finish();
	debug!(
		"brand-explorer: built hierarchy with {} nodes, {} leaves, {} diagnostics",
		hierarchy.len(),
		hierarchy.leaves().len(),
		diagnostics.len()
	);
	BuildOutput {
		hierarchy,
		diagnostics,
	}
}
