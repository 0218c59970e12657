//! Optional per-node text drawn next to a node's label.

use super::types::{Hierarchy, NodeId, NodeKind};

/// Produces an extra label for a node, or nothing.
pub trait NodeAnnotation {
	fn annotate(&self, tree: &Hierarchy, id: NodeId) -> Option<String>;
}

impl<F> NodeAnnotation for F
where
	F: Fn(&Hierarchy, NodeId) -> Option<String>,
{
	fn annotate(&self, tree: &Hierarchy, id: NodeId) -> Option<String> {
		self(tree, id)
	}
}

/// Ownership share of brands held through the parent entity, e.g. `"51%"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OwnershipAnnotation;

impl NodeAnnotation for OwnershipAnnotation {
	fn annotate(&self, tree: &Hierarchy, id: NodeId) -> Option<String> {
		if tree.node(id).kind != NodeKind::Brand {
			return None;
		}
		let owned = tree
			.ancestors(id)
			.any(|a| tree.node(a).kind == NodeKind::ParentEntity);
		if !owned {
			return None;
		}
		let share = tree.record(id)?.ownership?;
		if share.fract() == 0.0 {
			Some(format!("{share:.0}%"))
		} else {
			Some(format!("{share:.1}%"))
		}
	}
}
