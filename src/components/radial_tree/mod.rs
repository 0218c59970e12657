//! Radial brand tree visualization component.
//!
//! Renders a [`Catalog`](crate::tree::Catalog) on an HTML canvas with:
//! - A radial node-link tree or a sunburst of nested ring sectors
//! - Pan, zoom, rotation and click-to-select interactions
//! - Smooth ancestor-chain highlight transitions on hover
//! - Filter-driven opacity without re-running the layout
//!
//! # Example
//!
//! ```ignore
//! use brand_explorer::components::radial_tree::{RadialTreeCanvas, Variant};
//!
//! let catalog = Arc::new(Catalog::build(&records, &TreeConfig::default(), &LayoutConfig::default()));
//! let visibility = Signal::derive(move || Visibility::default());
//!
//! view! { <RadialTreeCanvas catalog=catalog visibility=visibility variant=Variant::Radial fullscreen=true /> }
//! ```

mod component;
mod render;
pub mod scale;
mod state;
pub mod theme;

pub use component::RadialTreeCanvas;
pub use state::{Variant, ViewConfig, ViewTransform};
pub use theme::Theme;
