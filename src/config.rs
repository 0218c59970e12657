//! Explorer configuration read from the host page.

use serde::Deserialize;

use crate::components::radial_tree::{Variant, ViewConfig};
use crate::tree::{LayoutConfig, OpacityConfig, TreeConfig};

/// Every tunable the page can set in `<script id="explorer-config">`.
///
/// All fields are optional in the JSON; anything left out keeps its default.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplorerConfig {
	pub tree: TreeConfig,
	pub layout: LayoutConfig,
	pub opacity: OpacityConfig,
	pub view: ViewConfig,
	/// Drawing shown on load.
	pub variant: Variant,
	/// Theme name, `"dark"` or `"light"`.
	pub theme: String,
	/// Show ownership percentages beside brands held by the parent entity.
	pub annotate_ownership: bool,
	/// Page heading.
	pub title: Option<String>,
}

impl ExplorerConfig {
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	pub fn title(&self) -> &str {
		self.title.as_deref().unwrap_or("Brand Portfolio")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tree::UnknownSubCategoryPolicy;

	#[test]
	fn partial_config_keeps_defaults() {
		let config = ExplorerConfig::from_json(
			r#"{
				"variant": "sunburst",
				"layout": { "radii": [0, 150, 300] },
				"tree": {
					"parent_entity": {
						"name": "ParentX",
						"sub_categories": ["Coffee"],
						"unknown_sub_category": "promote_to_top_level"
					}
				}
			}"#,
		)
		.unwrap();

		assert_eq!(config.variant, Variant::Sunburst);
		assert_eq!(config.layout.radii, [0.0, 150.0, 300.0]);
		assert_eq!(config.layout.max_radius, LayoutConfig::default().max_radius);
		assert_eq!(config.opacity, OpacityConfig::default());
		let parent = config.tree.parent_entity.unwrap();
		assert_eq!(parent.name, "ParentX");
		assert_eq!(
			parent.unknown_sub_category,
			UnknownSubCategoryPolicy::PromoteToTopLevel
		);
		assert_eq!(config.tree.root_name, TreeConfig::default().root_name);
	}

	#[test]
	fn empty_object_is_the_default_config() {
		let config = ExplorerConfig::from_json("{}").unwrap();
		assert_eq!(config, ExplorerConfig::default());
		assert_eq!(config.title(), "Brand Portfolio");
	}
}
