//! Visual theming for the radial tree.
//!
//! Provides colours, per-branch palettes and the background / link / node
//! styles. The palette is the variant's colour table: each top-level branch
//! takes the next palette entry and its descendants inherit it.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colour table for top-level branches.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub colors: Vec<Color>,
}

impl NodePalette {
	/// Saturated but soft hues that stay distinct on dark backgrounds.
	pub fn orchard() -> Self {
		Self {
			colors: vec![
				Color::rgb(86, 156, 214),  // Cornflower
				Color::rgb(229, 140, 84),  // Apricot
				Color::rgb(106, 176, 120), // Fern
				Color::rgb(200, 110, 150), // Orchid
				Color::rgb(214, 186, 92),  // Mustard
				Color::rgb(96, 180, 180),  // Lagoon
				Color::rgb(160, 130, 210), // Lilac
				Color::rgb(210, 100, 96),  // Brick
			],
		}
	}

	/// Deeper tones for light backgrounds.
	pub fn ink() -> Self {
		Self {
			colors: vec![
				Color::rgb(31, 96, 160),  // Navy
				Color::rgb(190, 90, 30),  // Burnt orange
				Color::rgb(46, 125, 50),  // Forest
				Color::rgb(150, 40, 100), // Plum
				Color::rgb(150, 120, 20), // Ochre
				Color::rgb(0, 121, 120),  // Teal
				Color::rgb(94, 53, 177),  // Violet
				Color::rgb(170, 40, 40),  // Crimson
			],
		}
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Centre color of the radial gradient
	pub color_secondary: Color,
	pub use_gradient: bool,
}

/// Link visual style.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	pub color: Color,
	/// Draw radial Bézier links instead of straight segments.
	pub curved: bool,
	/// Dash inactive links.
	pub dash_inactive: bool,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub root_color: Color,
	pub parent_color: Color,
	/// How much lighter brand dots are than their category.
	pub brand_lighten: f64,
	pub use_gradient: bool,
	/// Border/stroke width in screen pixels (0 = no border)
	pub border_width: f64,
	pub border_color: Color,
	/// Sunburst sector separator color.
	pub sector_stroke: Color,
}

/// Text style for labels and tooltips.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	pub color: Color,
	pub muted: Color,
	pub tooltip_background: Color,
	/// Ownership and other annotations.
	pub annotation: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub link: LinkStyle,
	pub node: NodeStyle,
	pub label: LabelStyle,
	pub palette: NodePalette,
}

impl Theme {
	/// Dark theme (default)
	pub fn default_theme() -> Self {
		Self {
			name: "dark",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(32, 38, 46),
				use_gradient: true,
			},
			link: LinkStyle {
				color: Color::rgba(140, 160, 180, 1.0),
				curved: true,
				dash_inactive: true,
			},
			node: NodeStyle {
				root_color: Color::rgb(230, 232, 236),
				parent_color: Color::rgb(240, 190, 70),
				brand_lighten: 0.25,
				use_gradient: true,
				border_width: 1.0,
				border_color: Color::rgba(255, 255, 255, 0.35),
				sector_stroke: Color::rgb(22, 27, 34),
			},
			label: LabelStyle {
				color: Color::rgba(255, 255, 255, 0.9),
				muted: Color::rgba(200, 210, 220, 0.6),
				tooltip_background: Color::rgba(12, 16, 22, 0.92),
				annotation: Color::rgb(240, 190, 70),
			},
			palette: NodePalette::orchard(),
		}
	}

	/// Light theme
	pub fn light() -> Self {
		Self {
			name: "light",
			background: BackgroundStyle {
				color: Color::rgb(246, 247, 249),
				color_secondary: Color::rgb(255, 255, 255),
				use_gradient: true,
			},
			link: LinkStyle {
				color: Color::rgba(90, 100, 115, 1.0),
				curved: true,
				dash_inactive: true,
			},
			node: NodeStyle {
				root_color: Color::rgb(40, 44, 52),
				parent_color: Color::rgb(200, 140, 20),
				brand_lighten: 0.2,
				use_gradient: false,
				border_width: 1.0,
				border_color: Color::rgba(0, 0, 0, 0.25),
				sector_stroke: Color::rgb(255, 255, 255),
			},
			label: LabelStyle {
				color: Color::rgba(20, 24, 30, 0.9),
				muted: Color::rgba(80, 90, 100, 0.7),
				tooltip_background: Color::rgba(255, 255, 255, 0.95),
				annotation: Color::rgb(170, 110, 0),
			},
			palette: NodePalette::ink(),
		}
	}

	/// Look a theme up by name, falling back to the default.
	pub fn by_name(name: &str) -> Self {
		match name {
			"light" => Self::light(),
			_ => Self::default_theme(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
