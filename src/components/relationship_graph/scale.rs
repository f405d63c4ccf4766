//! Value-to-style mappings used when drawing.

use super::config::DEFAULT_COLORS;

/// Fill color for a group index, cycling through `palette`.
pub fn group_color(palette: &[String], group: u32) -> &str {
	if palette.is_empty() {
		return DEFAULT_COLORS[group as usize % DEFAULT_COLORS.len()];
	}
	&palette[group as usize % palette.len()]
}

pub fn stroke_width(value: u32) -> f64 {
	f64::from(value).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn colors_wrap_around_the_palette() {
		let palette: Vec<String> = ["#a", "#b", "#c"].iter().map(|c| (*c).into()).collect();
		assert_eq!(group_color(&palette, 0), "#a");
		assert_eq!(group_color(&palette, 1), "#b");
		assert_eq!(group_color(&palette, 4), "#b");
	}

	#[test]
	fn empty_palette_uses_defaults() {
		assert_eq!(group_color(&[], 1), DEFAULT_COLORS[1]);
	}

	#[test]
	fn stroke_grows_with_value() {
		assert_eq!(stroke_width(1), 1.0);
		assert_eq!(stroke_width(4), 2.0);
		assert!(stroke_width(3) > stroke_width(2));
	}
}
