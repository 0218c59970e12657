//! brand-explorer: interactive radial explorer for a brand portfolio.
//!
//! This crate builds a Root → Category → Brand hierarchy (with one parent
//! entity owning its own sub-categories) from JSON embedded in the host page,
//! lays it out as a radial tree or sunburst, and renders it on a canvas with
//! search and region filtering, pan, zoom and rotation.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod components;
pub mod config;
pub mod data;
pub mod error;
pub mod tree;

pub use components::radial_tree::{RadialTreeCanvas, Theme, Variant};
pub use config::ExplorerConfig;
pub use error::LoadError;
pub use tree::{Catalog, FilterState, NodeId, Visibility, ALL_REGIONS};

/// Element holding the brand records.
pub const DATA_ELEMENT_ID: &str = "brand-data";
/// Optional element holding an [`ExplorerConfig`].
pub const CONFIG_ELEMENT_ID: &str = "explorer-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("brand-explorer: logging initialized");
}

/// Text content of the `<script>` element with the given id.
fn script_text(id: &str) -> Result<String, LoadError> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or(LoadError::NoDocument)?;
	let element = document
		.get_element_by_id(id)
		.ok_or_else(|| LoadError::MissingElement(id.to_string()))?;
	let script: HtmlScriptElement = element
		.dyn_into()
		.map_err(|_| LoadError::NotAScript(id.to_string()))?;
	script
		.text()
		.map_err(|_| LoadError::NotAScript(id.to_string()))
}

/// Load the explorer configuration, falling back to defaults when the page
/// has none or it does not parse.
fn load_config() -> ExplorerConfig {
	let text = match script_text(CONFIG_ELEMENT_ID) {
		Ok(text) => text,
		Err(LoadError::MissingElement(_)) => return ExplorerConfig::default(),
		Err(e) => {
			warn!("brand-explorer: {}", e);
			return ExplorerConfig::default();
		}
	};
	ExplorerConfig::from_json(&text).unwrap_or_else(|e| {
		warn!("brand-explorer: invalid #{}: {}", CONFIG_ELEMENT_ID, e);
		ExplorerConfig::default()
	})
}

/// Load brand records from the page and build the catalog.
///
/// A missing or unreadable document yields an empty catalog, which renders
/// the empty state.
fn load_catalog(config: &ExplorerConfig) -> Catalog {
	let parsed = script_text(DATA_ELEMENT_ID)
		.and_then(|json| data::parse_brand_records(DATA_ELEMENT_ID, &json));
	match parsed {
		Ok(parsed) => {
			info!(
				"brand-explorer: loaded {} records ({} unreadable)",
				parsed.records.len(),
				parsed.diagnostics.len()
			);
			parsed.into_catalog(&config.tree, &config.layout)
		}
		Err(e) => {
			warn!("brand-explorer: failed to load brand data: {}", e);
			Catalog::build(&[], &config.tree, &config.layout)
		}
	}
}

/// Side panel describing the selected node.
#[component]
fn DetailPanel(
	catalog: Arc<Catalog>,
	node: NodeId,
	on_close: WriteSignal<Option<NodeId>>,
) -> impl IntoView {
	let record = catalog.hierarchy.record(node).cloned();
	let node = catalog.hierarchy.node(node);
	let icon = node.icon_url.clone();
	let parent = node.parent.map(|p| catalog.hierarchy.node(p).name.clone());

	view! {
		<aside class="detail-panel">
			<button class="close" on:click=move |_| on_close.set(None)>"×"</button>
			{icon.map(|src| view! { <img class="icon" src=src alt="" /> })}
			<h2>{node.name.clone()}</h2>
			{parent.map(|p| view! { <p class="breadcrumb">{p}</p> })}
			{record.map(|r| {
				let logo = r.logo_url.clone();
				let website = r.website.clone();
				let ownership = r.ownership.map(|o| format!("Ownership: {}%", o));
				view! {
					{logo.map(|src| view! { <img class="logo" src=src alt="" /> })}
					<p class="tagline">{r.tagline().to_string()}</p>
					<p class="description">{r.description().to_string()}</p>
					<p class="region">{r.region.clone()}</p>
					{ownership.map(|o| view! { <p class="ownership">{o}</p> })}
					{website.map(|url| {
						let href = url.clone();
						view! { <a href=href target="_blank" rel="noopener">{url}</a> }
					})}
				}
			})}
		</aside>
	}
}

/// Main application component.
/// Loads configuration and brand data from the DOM, and renders the filter
/// controls beside the radial visualization.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let catalog = Arc::new(load_catalog(&config));
	let rejected = catalog
		.diagnostics
		.iter()
		.filter(|d| d.is_rejection())
		.count();
	let regions = catalog.regions.clone();
	let title = config.title().to_string();
	let theme = Theme::by_name(&config.theme);
	let theme_name = theme.name;

	let (search, set_search) = signal(String::new());
	let (region, set_region) = signal(ALL_REGIONS.to_string());
	let (variant, set_variant) = signal(config.variant);
	let (selected, set_selected) = signal(None::<NodeId>);

	let filter = Memo::new(move |_| FilterState::new(&search.get(), &region.get()));
	let catalog_vis = catalog.clone();
	let visibility = Memo::new(move |_| catalog_vis.evaluate(&filter.get()));

	let catalog_empty = catalog.clone();
	let no_results = move || {
		let empty = !catalog_empty.hierarchy.is_root_only() && !visibility.get().has_matches();
		empty.then(|| view! { <p class="no-results">"No brands match the current filters."</p> })
	};

	let catalog_detail = catalog.clone();
	let detail = move || {
		selected.get().map(|id| {
			view! { <DetailPanel catalog=catalog_detail.clone() node=id on_close=set_selected /> }
		})
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=theme_name />
		<Title text=title.clone() />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-tree">
			<RadialTreeCanvas
				catalog=catalog.clone()
				visibility=visibility
				variant=variant
				selected=set_selected
				geometry=config.layout.clone()
				view_config=config.view.clone()
				opacity=config.opacity.clone()
				theme=theme
				annotate_ownership=config.annotate_ownership
				fullscreen=true
			/>
			<div class="tree-overlay">
				<h1>{title}</h1>
				<p class="subtitle">
					"Scroll to zoom. Shift+scroll to rotate. Drag to pan. Double-click to reset."
				</p>
				<div class="controls">
					<input
						type="search"
						placeholder="Search brands"
						prop:value=move || search.get()
						on:input=move |ev| set_search.set(event_target_value(&ev))
					/>
					<select on:change=move |ev| set_region.set(event_target_value(&ev))>
						<option value=ALL_REGIONS>"All regions"</option>
						{regions
							.into_iter()
							.map(|r| {
								let value = r.clone();
								view! { <option value=value>{r}</option> }
							})
							.collect_view()}
					</select>
					<button on:click=move |_| set_variant.update(|v| *v = v.toggled())>
						{move || format!("Show {}", variant.get().toggled().label())}
					</button>
				</div>
				{no_results}
				{(rejected > 0).then(|| view! {
					<p class="diagnostics">{format!("{} records skipped, see console", rejected)}</p>
				})}
			</div>
			{detail}
		</div>
	}
}
