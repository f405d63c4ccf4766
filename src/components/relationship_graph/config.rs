use serde::Deserialize;

use super::error::{Result, VisError};

pub const DEFAULT_TITLE: &str = "Vizualazation of complex relationships as graph";

pub const DEFAULT_COLORS: &[&str] = &[
	"#dd3333", "#80ce5d", "#f78131", "#369dc1", "#c572d3", "#36c1b3", "#b57052", "#ed69af",
];

/// Options the host passes to the visualization.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct VisConfig {
	pub title: String,
	pub color_range: Vec<String>,
}

impl Default for VisConfig {
	fn default() -> Self {
		Self {
			title: DEFAULT_TITLE.into(),
			color_range: DEFAULT_COLORS.iter().map(|c| (*c).into()).collect(),
		}
	}
}

impl VisConfig {
	/// Parses a host config object. Missing keys keep their defaults and an
	/// empty palette falls back to the default one.
	pub fn from_json(value: &serde_json::Value) -> Result<Self> {
		let mut config: Self =
			serde_json::from_value(value.clone()).map_err(|e| VisError::Config(e.to_string()))?;
		if config.color_range.is_empty() {
			config.color_range = Self::default().color_range;
		}
		Ok(config)
	}
}

/// Accepted field cardinality of a query, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeLimits {
	pub min_pivots: usize,
	pub max_pivots: usize,
	pub min_dimensions: usize,
	pub max_dimensions: usize,
	pub min_measures: usize,
	pub max_measures: usize,
}

impl Default for ShapeLimits {
	fn default() -> Self {
		Self {
			min_pivots: 0,
			max_pivots: 0,
			min_dimensions: 3,
			max_dimensions: 3,
			min_measures: 0,
			max_measures: 0,
		}
	}
}

/// Record columns holding the three row fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldNames {
	pub id: String,
	pub relatives: String,
	pub groups: String,
}

impl Default for FieldNames {
	fn default() -> Self {
		Self {
			id: "graph.id".into(),
			relatives: "graph.relatives".into(),
			groups: "graph.groups".into(),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
	pub alpha: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity removed each tick.
	pub velocity_decay: f64,
	pub link_distance: f64,
	/// Negative values repel.
	pub charge_strength: f64,
	pub charge_distance_min: f64,
	pub center_strength: f64,
	/// Alpha target while a node is being dragged.
	pub drag_alpha_target: f64,
	pub seed: u64,
}

impl Default for ForceParams {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			alpha: 1.0,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			link_distance: 30.0,
			charge_strength: -30.0,
			charge_distance_min: 1.0,
			center_strength: 1.0,
			drag_alpha_target: 0.3,
			seed: 0,
		}
	}
}

impl ForceParams {
	pub fn with_seed(seed: u64) -> Self {
		Self {
			seed,
			..Self::default()
		}
	}
}
