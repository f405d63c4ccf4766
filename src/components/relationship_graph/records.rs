//! Adapter between host query results and transformer rows.

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use super::config::{FieldNames, ShapeLimits};
use super::error::{Result, VisError};
use super::transform::transform;
use super::types::{GraphData, Row};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Field {
	pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryFields {
	pub dimension_like: Vec<Field>,
	pub measure_like: Vec<Field>,
	pub pivots: Vec<Field>,
}

/// The query metadata accompanying the records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryResponse {
	pub fields: QueryFields,
}

impl QueryResponse {
	/// A response with one dimension per name and nothing else.
	pub fn with_dimensions<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			fields: QueryFields {
				dimension_like: names.into_iter().map(|n| Field { name: n.into() }).collect(),
				..QueryFields::default()
			},
		}
	}
}

fn check_range(
	label: &'static str,
	kind: &'static str,
	actual: usize,
	min: usize,
	max: usize,
) -> Result<()> {
	if actual < min || actual > max {
		return Err(VisError::InvalidShape {
			label,
			kind,
			min,
			max,
			actual,
		});
	}
	Ok(())
}

pub fn validate_query(response: &QueryResponse, limits: &ShapeLimits) -> Result<()> {
	const LABEL: &str = "Relationship graph";
	let fields = &response.fields;
	check_range(
		LABEL,
		"pivots",
		fields.pivots.len(),
		limits.min_pivots,
		limits.max_pivots,
	)?;
	check_range(
		LABEL,
		"dimensions",
		fields.dimension_like.len(),
		limits.min_dimensions,
		limits.max_dimensions,
	)?;
	check_range(
		LABEL,
		"measures",
		fields.measure_like.len(),
		limits.min_measures,
		limits.max_measures,
	)
}

fn cell_text(record: &Value, index: usize, field: &str) -> Result<String> {
	let missing = || VisError::MissingField {
		index,
		field: field.into(),
	};
	let value = record.get(field).ok_or_else(missing)?;
	let value = value.get("value").ok_or_else(missing)?;
	match value {
		Value::String(s) => Ok(s.clone()),
		Value::Null => Ok(String::new()),
		Value::Number(n) => Ok(n.to_string()),
		Value::Bool(b) => Ok(b.to_string()),
		Value::Array(_) | Value::Object(_) => Err(VisError::NonScalarField {
			index,
			field: field.into(),
		}),
	}
}

/// Reads `record[field].value` for the three row fields of every record.
pub fn rows_from_records(records: &[Value], fields: &FieldNames) -> Result<Vec<Row>> {
	records
		.iter()
		.enumerate()
		.map(|(i, record)| {
			Ok(Row {
				id: cell_text(record, i, &fields.id)?,
				relatives: cell_text(record, i, &fields.relatives)?,
				groups: cell_text(record, i, &fields.groups)?,
			})
		})
		.collect()
}

/// Validates the query shape and builds the graph. Nothing is built when
/// either step fails.
pub fn prepare(
	records: &[Value],
	response: &QueryResponse,
	limits: &ShapeLimits,
	fields: &FieldNames,
) -> Result<GraphData> {
	validate_query(response, limits)?;
	let rows = rows_from_records(records, fields)?;
	debug!("read {} rows from {} records", rows.len(), records.len());
	Ok(transform(&rows))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn response() -> QueryResponse {
		QueryResponse::with_dimensions(["graph.id", "graph.relatives", "graph.groups"])
	}

	fn record(id: Value, relatives: &str, groups: &str) -> Value {
		json!({
			"graph.id": { "value": id },
			"graph.relatives": { "value": relatives },
			"graph.groups": { "value": groups },
		})
	}

	#[test]
	fn three_dimensions_pass() {
		assert!(validate_query(&response(), &ShapeLimits::default()).is_ok());
	}

	#[test]
	fn wrong_dimension_count_is_rejected() {
		let two = QueryResponse::with_dimensions(["graph.id", "graph.groups"]);
		let err = validate_query(&two, &ShapeLimits::default()).unwrap_err();
		assert_eq!(
			err,
			VisError::InvalidShape {
				label: "Relationship graph",
				kind: "dimensions",
				min: 3,
				max: 3,
				actual: 2,
			}
		);
	}

	#[test]
	fn measures_are_rejected() {
		let mut r = response();
		r.fields.measure_like.push(Field {
			name: "graph.count".into(),
		});
		let err = validate_query(&r, &ShapeLimits::default()).unwrap_err();
		assert!(err.to_string().contains("measures"));
	}

	#[test]
	fn response_deserializes_with_missing_sections() {
		let r: QueryResponse = serde_json::from_value(json!({
			"fields": { "dimension_like": [{ "name": "a" }] }
		}))
		.unwrap();
		assert_eq!(r.fields.dimension_like.len(), 1);
		assert!(r.fields.pivots.is_empty());
	}

	#[test]
	fn scalar_values_are_stringified() {
		let rows = rows_from_records(
			&[record(json!(42), "B:friend", "X"), record(Value::Null, "", "X")],
			&FieldNames::default(),
		)
		.unwrap();
		assert_eq!(rows[0], Row::new("42", "B:friend", "X"));
		assert_eq!(rows[1].id, "");
	}

	#[test]
	fn missing_field_names_the_record() {
		let records = [
			record(json!("A"), "", "X"),
			json!({ "graph.id": { "value": "B" }, "graph.groups": { "value": "X" } }),
		];
		let err = rows_from_records(&records, &FieldNames::default()).unwrap_err();
		assert_eq!(
			err,
			VisError::MissingField {
				index: 1,
				field: "graph.relatives".into(),
			}
		);
	}

	#[test]
	fn nested_values_are_rejected() {
		let records = [record(json!(["A"]), "", "X")];
		let err = rows_from_records(&records, &FieldNames::default()).unwrap_err();
		assert!(matches!(err, VisError::NonScalarField { index: 0, .. }));
	}

	#[test]
	fn prepare_stops_before_transform_on_bad_shape() {
		let records = [record(json!("A"), "", "X")];
		let bad = QueryResponse::default();
		assert!(prepare(&records, &bad, &ShapeLimits::default(), &FieldNames::default()).is_err());

		let graph = prepare(
			&records,
			&response(),
			&ShapeLimits::default(),
			&FieldNames::default(),
		)
		.unwrap();
		assert_eq!(graph.nodes.len(), 2);
	}
}
