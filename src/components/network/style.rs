use log::warn;

use super::tween::Lerp;

/// d3 category10, assigned to nodes in order.
const PALETTE: [Rgb; 10] = [
	Rgb(0x1f, 0x77, 0xb4),
	Rgb(0xff, 0x7f, 0x0e),
	Rgb(0x2c, 0xa0, 0x2c),
	Rgb(0xd6, 0x27, 0x28),
	Rgb(0x94, 0x67, 0xbd),
	Rgb(0x8c, 0x56, 0x4b),
	Rgb(0xe3, 0x77, 0xc2),
	Rgb(0x7f, 0x7f, 0x7f),
	Rgb(0xbc, 0xbd, 0x22),
	Rgb(0x17, 0xbe, 0xcf),
];

pub const DIMMED_FILL: Rgb = Rgb(220, 220, 220);
pub const DIMMED_MARKER: Rgb = Rgb(238, 238, 238);
pub const DIMMED_OPACITY: f64 = 0.1;
const FALLBACK_EDGE: Rgb = Rgb(0x99, 0x99, 0x99);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
	/// Parses `#rgb` or `#rrggbb`.
	pub fn parse_hex(text: &str) -> Option<Self> {
		let hex = text.trim().strip_prefix('#')?;
		if !hex.is_ascii() {
			return None;
		}
		let channel = |s: &str| u8::from_str_radix(s, 16).ok();
		match hex.len() {
			6 => Some(Rgb(
				channel(&hex[0..2])?,
				channel(&hex[2..4])?,
				channel(&hex[4..6])?,
			)),
			3 => {
				let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
				Some(Rgb(short(0)?, short(1)?, short(2)?))
			}
			_ => None,
		}
	}

	pub fn for_edge(text: &str) -> Self {
		Self::parse_hex(text).unwrap_or_else(|| {
			warn!("Unparseable edge color {text:?}, using fallback");
			FALLBACK_EDGE
		})
	}

	pub fn for_node(index: usize) -> Self {
		PALETTE[index % PALETTE.len()]
	}

	pub fn css(&self, alpha: f64) -> String {
		format!("rgba({}, {}, {}, {})", self.0, self.1, self.2, alpha)
	}
}

impl Lerp for Rgb {
	fn lerp(self, other: Self, t: f64) -> Self {
		let mix = |a: u8, b: u8| (a as f64).lerp(b as f64, t).round().clamp(0.0, 255.0) as u8;
		Rgb(
			mix(self.0, other.0),
			mix(self.1, other.1),
			mix(self.2, other.2),
		)
	}
}

/// Fill or stroke color plus opacity of one rendered element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
	pub color: Rgb,
	pub opacity: f64,
}

impl Style {
	pub fn full(color: Rgb) -> Self {
		Self {
			color,
			opacity: 1.0,
		}
	}

	pub fn dimmed() -> Self {
		Self {
			color: DIMMED_FILL,
			opacity: DIMMED_OPACITY,
		}
	}
}

impl Lerp for Style {
	fn lerp(self, other: Self, t: f64) -> Self {
		Self {
			color: self.color.lerp(other.color, t),
			opacity: self.opacity.lerp(other.opacity, t),
		}
	}
}

/// Whether an element is foregrounded or pushed back by the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	Highlight,
	Dimmed,
}

impl Emphasis {
	pub fn style(self, base: Rgb) -> Style {
		match self {
			Emphasis::Highlight => Style::full(base),
			Emphasis::Dimmed => Style::dimmed(),
		}
	}

	pub fn marker_fill(self, base: Rgb) -> Rgb {
		match self {
			Emphasis::Highlight => base,
			Emphasis::Dimmed => DIMMED_MARKER,
		}
	}
}
