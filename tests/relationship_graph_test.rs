//! End-to-end: host records -> graph -> layout -> drag.

use relationship_graph_canvas::relationship_graph::{
	DragController, FieldNames, ForceParams, QueryResponse, ShapeLimits, Simulation, TickStatus,
	VisError, Viewport, prepare,
};
use serde_json::{Value, json};

fn record(id: &str, relatives: &str, groups: &str) -> Value {
	json!({
		"graph.id": { "value": id },
		"graph.relatives": { "value": relatives },
		"graph.groups": { "value": groups },
	})
}

fn query() -> QueryResponse {
	QueryResponse::with_dimensions(["graph.id", "graph.relatives", "graph.groups"])
}

fn records() -> Vec<Value> {
	vec![
		record("Ada", "Ben:spouse|Cy:parent|Zed:friend", "Lovelace"),
		record("Ben", "Ada:spouse|Cy:parent", "Lovelace|Chess"),
		record("Cy", "Dot:friend|Bad", "Chess"),
		record("Dot", "", "Chess|Choir"),
	]
}

#[test]
fn records_render_within_bounds_and_converge() {
	let graph = prepare(
		&records(),
		&query(),
		&ShapeLimits::default(),
		&FieldNames::default(),
	)
	.unwrap();
	let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids, ["Ada", "Lovelace", "Ben", "Chess", "Cy", "Dot", "Choir"]);

	let viewport = Viewport::new(320.0, 240.0);
	let mut sim = Simulation::from_graph(&graph, viewport, ForceParams::with_seed(99));
	// "Zed" has no row and is not a group label.
	assert_eq!(sim.report().dropped_edges, 1);

	let mut status = TickStatus::Running;
	for _ in 0..1000 {
		status = sim.step();
		for n in sim.nodes() {
			assert!(n.x.abs() <= 320.0 && n.y.abs() <= 120.0);
		}
		if status != TickStatus::Running {
			break;
		}
	}
	assert_eq!(status, TickStatus::Converged);
}

#[test]
fn drag_round_trip_through_the_public_api() {
	let graph = prepare(
		&records(),
		&query(),
		&ShapeLimits::default(),
		&FieldNames::default(),
	)
	.unwrap();
	let mut sim = Simulation::from_graph(
		&graph,
		Viewport::new(320.0, 240.0),
		ForceParams::with_seed(1),
	);
	while sim.step() == TickStatus::Running {}

	let mut drag = DragController::default();
	let cy = sim.index_of("Cy").unwrap();
	drag.drag_start(&mut sim, cy);
	drag.drag(&mut sim, cy, -100.0, 50.0);
	for _ in 0..20 {
		assert_eq!(sim.step(), TickStatus::Running);
	}
	let node = sim.node(cy).unwrap();
	assert_eq!((node.x, node.y), (-100.0, 50.0));

	drag.drag_end(&mut sim, cy);
	assert!(!sim.node(cy).unwrap().is_pinned());
	let mut ticks = 0;
	while sim.step() == TickStatus::Running {
		ticks += 1;
		assert!(ticks < 1000);
	}
}

#[test]
fn bad_query_shape_builds_nothing() {
	let err = prepare(
		&records(),
		&QueryResponse::with_dimensions(["graph.id"]),
		&ShapeLimits::default(),
		&FieldNames::default(),
	)
	.unwrap_err();
	assert!(matches!(err, VisError::InvalidShape { actual: 1, .. }));
	assert!(err.to_string().contains("dimensions"));
}
