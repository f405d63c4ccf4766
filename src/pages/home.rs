use leptos::prelude::*;
use serde_json::{Value, json};

use crate::components::relationship_graph::{
	DEFAULT_COLORS, FieldNames, QueryResponse, RelationshipGraphCanvas,
};

const GROUPS: &[&str] = &["Engineering", "Sales", "Family", "Chess Club", "Board"];
const RELATIONS: &[&str] = &["friend", "manager", "sibling", "mentor"];

/// Generate sample query records: people with groups and relatives among
/// the people before them.
fn generate_sample_records(n: usize, fields: &FieldNames) -> Vec<Value> {
	(0..n)
		.map(|i| {
			let first = GROUPS[i % GROUPS.len()];
			let groups = if rand_simple(i) > 0.6 {
				format!("{first}|{}", GROUPS[(i * 3 + 1) % GROUPS.len()])
			} else {
				first.to_string()
			};
			let relatives = (0..2)
				.filter(|k| i > 0 && (k == &0 || rand_simple(i + 7 * k) > 0.5))
				.map(|k| {
					let target = (rand_simple(i + k * 13) * i as f64) as usize;
					let relation = RELATIONS[(i + k) % RELATIONS.len()];
					format!("Person {target}:{relation}")
				})
				.collect::<Vec<_>>()
				.join("|");

			let mut record = serde_json::Map::new();
			record.insert(fields.id.clone(), json!({ "value": format!("Person {i}") }));
			record.insert(fields.relatives.clone(), json!({ "value": relatives }));
			record.insert(fields.groups.clone(), json!({ "value": groups }));
			Value::Object(record)
		})
		.collect()
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let fields = FieldNames::default();
	let records = Signal::derive(move || generate_sample_records(40, &fields));
	let query = Signal::derive(|| {
		let fields = FieldNames::default();
		QueryResponse::with_dimensions([fields.id, fields.relatives, fields.groups])
	});
	let config = Signal::derive(|| {
		json!({
			"title": "Sample relationships",
			"color_range": DEFAULT_COLORS,
		})
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<RelationshipGraphCanvas records=records query=query config=config fullscreen=true />
				<div class="graph-overlay">
					<p class="subtitle">"Drag nodes to reposition them."</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
