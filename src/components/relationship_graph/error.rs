#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisError {
	#[error("{label} requires {min} to {max} {kind}, but the query has {actual}")]
	InvalidShape {
		label: &'static str,
		kind: &'static str,
		min: usize,
		max: usize,
		actual: usize,
	},
	#[error("record {index} is missing the field `{field}`")]
	MissingField { index: usize, field: String },
	#[error("record {index} field `{field}` is not a scalar value")]
	NonScalarField { index: usize, field: String },
	#[error("invalid visualization config: {0}")]
	Config(String),
}

pub type Result<T> = std::result::Result<T, VisError>;
