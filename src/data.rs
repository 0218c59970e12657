//! Brand fixture parsing.
//!
//! A record that is not a JSON object is reported and skipped; the rest of
//! the list still loads.

use log::warn;
use serde_json::Value;

use crate::error::LoadError;
use crate::tree::{BrandRecord, Catalog, Diagnostic, LayoutConfig, TreeConfig};

/// Records read from a fixture plus per-record load problems.
#[derive(Clone, Debug, Default)]
pub struct ParsedRecords {
	pub records: Vec<BrandRecord>,
	pub diagnostics: Vec<Diagnostic>,
}

impl ParsedRecords {
	/// Build the catalog, keeping load problems ahead of build diagnostics.
	pub fn into_catalog(self, tree: &TreeConfig, geometry: &LayoutConfig) -> Catalog {
		let mut catalog = Catalog::build(&self.records, tree, geometry);
		let mut diagnostics = self.diagnostics;
		diagnostics.append(&mut catalog.diagnostics);
		catalog.diagnostics = diagnostics;
		catalog
	}
}

/// Parse a JSON array of brand records.
pub fn parse_brand_records(id: &str, json: &str) -> Result<ParsedRecords, LoadError> {
	let value: Value = serde_json::from_str(json).map_err(|source| LoadError::Json {
		id: id.to_string(),
		source,
	})?;
	let Value::Array(items) = value else {
		return Err(LoadError::NotAnArray);
	};

	let mut parsed = ParsedRecords::default();
	for (index, item) in items.into_iter().enumerate() {
		if !item.is_object() {
			warn!("brand-explorer: record #{} is not an object, skipping", index);
			parsed.diagnostics.push(Diagnostic::MalformedRecord {
				index,
				reason: "not a JSON object".to_string(),
			});
			continue;
		}
		match serde_json::from_value::<BrandRecord>(item) {
			Ok(record) => parsed.records.push(record),
			Err(e) => {
				warn!("brand-explorer: record #{} could not be read: {}", index, e);
				parsed.diagnostics.push(Diagnostic::MalformedRecord {
					index,
					reason: e.to_string(),
				});
			}
		}
	}
	Ok(parsed)
}
