//! Brand records and the arena-backed hierarchy built from them.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single brand entry from the input fixture.
///
/// Every field is defaulted so a record with missing or mistyped optional data
/// still loads; blank required fields are handled by the tree builder.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrandRecord {
	/// Unique key. Blank names are rejected by the builder.
	#[serde(deserialize_with = "lenient_string")]
	pub name: String,
	/// Top-level category, or sub-category when nested under the parent entity.
	#[serde(deserialize_with = "lenient_string")]
	pub category: String,
	/// Region used by the region filter (exact match).
	#[serde(deserialize_with = "lenient_string")]
	pub region: String,
	#[serde(deserialize_with = "lenient_opt_string")]
	pub tagline: Option<String>,
	#[serde(deserialize_with = "lenient_opt_string")]
	pub description: Option<String>,
	#[serde(deserialize_with = "lenient_opt_string")]
	pub logo_url: Option<String>,
	#[serde(deserialize_with = "lenient_opt_string")]
	pub website: Option<String>,
	/// Name of the owning parent entity, if any.
	#[serde(deserialize_with = "lenient_opt_string")]
	pub parent_brand: Option<String>,
	/// Ownership share (percent) held by the parent entity. Accepts `51`, `51.5` or `"51%"`.
	#[serde(deserialize_with = "lenient_percent")]
	pub ownership: Option<f64>,
}

fn scalar_text(value: Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.trim().to_string()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
	Ok(scalar_text(Value::deserialize(d)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
	Ok(scalar_text(Value::deserialize(d)?).filter(|s| !s.is_empty()))
}

fn lenient_percent<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
	Ok(match Value::deserialize(d)? {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
		_ => None,
	})
}

impl BrandRecord {
	/// Convenience constructor for the three required fields.
	pub fn new(name: &str, category: &str, region: &str) -> Self {
		Self {
			name: name.to_string(),
			category: category.to_string(),
			region: region.to_string(),
			..Self::default()
		}
	}

	pub fn with_parent(mut self, parent: &str) -> Self {
		self.parent_brand = Some(parent.to_string());
		self
	}

	pub fn with_tagline(mut self, tagline: &str) -> Self {
		self.tagline = Some(tagline.to_string());
		self
	}

	pub fn with_description(mut self, description: &str) -> Self {
		self.description = Some(description.to_string());
		self
	}

	pub fn tagline(&self) -> &str {
		self.tagline.as_deref().unwrap_or_default()
	}

	pub fn description(&self) -> &str {
		self.description.as_deref().unwrap_or_default()
	}
}

/// Index of a node inside a [`Hierarchy`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// What a hierarchy node represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Root,
	/// The distinguished parent entity owning its own sub-categories.
	ParentEntity,
	/// A top-level category, or a sub-category of the parent entity.
	Category,
	Brand,
}

impl NodeKind {
	/// Structural nodes are always drawn, dimmed rather than hidden by filters.
	pub fn is_structural(self) -> bool {
		matches!(self, NodeKind::Root | NodeKind::ParentEntity | NodeKind::Category)
	}
}

/// A node in the brand hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyNode {
	pub id: NodeId,
	pub name: String,
	pub kind: NodeKind,
	pub depth: usize,
	pub parent: Option<NodeId>,
	/// Sorted by name once the build completes.
	pub children: Vec<NodeId>,
	/// Category icon asset.
	pub icon_url: Option<String>,
	/// Brand or parent-entity logo.
	pub logo_url: Option<String>,
	/// Index into [`Hierarchy::records`] for brand and parent-entity nodes.
	pub record: Option<usize>,
}

impl HierarchyNode {
	pub fn is_leaf(&self) -> bool {
		self.kind == NodeKind::Brand && self.children.is_empty()
	}
}

/// Rooted brand tree stored as an arena. Node 0 is always the root.
#[derive(Clone, Debug, PartialEq)]
pub struct Hierarchy {
	nodes: Vec<HierarchyNode>,
	records: Vec<BrandRecord>,
}

impl Hierarchy {
	/// Create a tree holding only a root node.
	pub fn new(root_name: &str) -> Self {
		Self {
			nodes: vec![HierarchyNode {
				id: NodeId(0),
				name: root_name.to_string(),
				kind: NodeKind::Root,
				depth: 0,
				parent: None,
				children: Vec::new(),
				icon_url: None,
				logo_url: None,
				record: None,
			}],
			records: Vec::new(),
		}
	}

	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	pub fn node(&self, id: NodeId) -> &HierarchyNode {
		&self.nodes[id.0]
	}

	pub fn nodes(&self) -> &[HierarchyNode] {
		&self.nodes
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True when nothing hangs off the root.
	pub fn is_root_only(&self) -> bool {
		self.nodes[0].children.is_empty()
	}

	/// Accepted records, in input order.
	pub fn records(&self) -> &[BrandRecord] {
		&self.records
	}

	/// The record a brand or parent-entity node was built from.
	pub fn record(&self, id: NodeId) -> Option<&BrandRecord> {
		self.node(id).record.map(|i| &self.records[i])
	}

	pub fn push_record(&mut self, record: BrandRecord) -> usize {
		self.records.push(record);
		self.records.len() - 1
	}

	/// Allocate a detached node. It joins the tree once passed to [`Hierarchy::attach`].
	pub fn add_node(&mut self, name: &str, kind: NodeKind) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(HierarchyNode {
			id,
			name: name.to_string(),
			kind,
			depth: 0,
			parent: None,
			children: Vec::new(),
			icon_url: None,
			logo_url: None,
			record: None,
		});
		id
	}

	pub fn node_mut(&mut self, id: NodeId) -> &mut HierarchyNode {
		&mut self.nodes[id.0]
	}

	/// Make `child` the last child of `parent`.
	pub fn attach(&mut self, parent: NodeId, child: NodeId) {
		self.nodes[child.0].parent = Some(parent);
		self.nodes[parent.0].children.push(child);
	}

	/// Drop detached nodes, sort children by name and recompute depths.
	///
	/// Node ids are reassigned in depth-first order, so the result depends only
	/// on the attached structure and names.
	pub fn finish(self) -> Self {
		let mut sorted = Hierarchy {
			nodes: Vec::with_capacity(self.nodes.len()),
			records: self.records,
		};
		let mut stack = vec![(NodeId(0), None::<NodeId>, 0usize)];
		while let Some((old, parent, depth)) = stack.pop() {
			let src = &self.nodes[old.0];
			let id = NodeId(sorted.nodes.len());
			sorted.nodes.push(HierarchyNode {
				id,
				parent,
				depth,
				children: Vec::new(),
				..src.clone()
			});
			if let Some(p) = parent {
				sorted.nodes[p.0].children.push(id);
			}

			let mut children = src.children.clone();
			children.sort_by(|a, b| self.nodes[a.0].name.cmp(&self.nodes[b.0].name));
			// Reverse so the stack pops children in name order.
			for child in children.into_iter().rev() {
				stack.push((child, Some(id), depth + 1));
			}
		}
		sorted
	}

	/// Leaves in depth-first, sorted-child order.
	pub fn leaves(&self) -> Vec<NodeId> {
		self.depth_first()
			.into_iter()
			.filter(|&id| self.node(id).is_leaf())
			.collect()
	}

	/// Every node reachable from the root, parents before children.
	pub fn depth_first(&self) -> Vec<NodeId> {
		let mut order = Vec::with_capacity(self.nodes.len());
		let mut stack = vec![self.root()];
		while let Some(id) = stack.pop() {
			order.push(id);
			stack.extend(self.node(id).children.iter().rev().copied());
		}
		order
	}

	/// Ancestors of `id`, nearest first, ending at the root.
	pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		std::iter::successors(self.node(id).parent, |&p| self.node(p).parent)
	}

	/// Ids of every node whose name equals `name`.
	pub fn find<'a>(&'a self, name: &'a str) -> impl Iterator<Item = NodeId> + 'a {
		self.nodes
			.iter()
			.filter(move |n| n.name == name)
			.map(|n| n.id)
	}

	/// The top-level node (category or parent entity) a node hangs under.
	pub fn branch_of(&self, id: NodeId) -> Option<NodeId> {
		if self.node(id).depth == 1 {
			return Some(id);
		}
		self.ancestors(id).find(|&a| self.node(a).depth == 1)
	}
}
