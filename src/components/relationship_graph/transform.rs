use std::collections::HashSet;

use log::debug;

use super::types::{GraphData, GraphEdge, GraphNode, Row};

pub const GROUP_DELIMITER: char = '|';
pub const RELATIVE_DELIMITER: char = '|';
pub const RELATION_SEPARATOR: char = ':';

/// Weight of every entity -> group membership edge.
pub const GROUP_EDGE_VALUE: u32 = 1;

/// Group index of an entity whose groups field is blank.
pub const NO_GROUP: u32 = 0;

struct Builder {
	graph: GraphData,
	node_ids: HashSet<String>,
	skipped: usize,
}

impl Builder {
	fn push_node(&mut self, id: &str, group: u32) {
		if self.node_ids.insert(id.to_owned()) {
			self.graph.nodes.push(GraphNode {
				id: id.to_owned(),
				group,
			});
		}
	}

	fn push_edge(&mut self, source: &str, target: &str, value: u32) {
		self.graph.edges.push(GraphEdge {
			source: source.to_owned(),
			target: target.to_owned(),
			value,
		});
	}

	fn add_row(&mut self, row: &Row) {
		let id = row.id.as_str();
		if id.is_empty() {
			debug!("skipping row without an id");
			self.skipped += 1;
			return;
		}

		let primary = if row.groups.is_empty() {
			NO_GROUP
		} else {
			self.graph.groups.register(&row.groups)
		};
		self.push_node(id, primary);

		for label in row.groups.split(GROUP_DELIMITER) {
			if label.is_empty() {
				continue;
			}
			if !self.node_ids.contains(label) {
				let group = self.graph.groups.register(label);
				self.push_node(label, group);
			}
			self.push_edge(id, label, GROUP_EDGE_VALUE);
		}

		for token in row.relatives.split(RELATIVE_DELIMITER) {
			let mut parts = token.split(RELATION_SEPARATOR);
			let (Some(relative), Some(relation)) = (parts.next(), parts.next()) else {
				if !token.is_empty() {
					debug!("skipping relative `{token}` of `{id}`: no relation type");
					self.skipped += 1;
				}
				continue;
			};
			if relative.is_empty() || relation.is_empty() {
				debug!("skipping relative `{token}` of `{id}`: empty part");
				self.skipped += 1;
				continue;
			}
			let value = self.graph.relations.register(relation);
			self.push_edge(id, relative, value);
		}
	}
}

/// Builds the node/edge graph from rows, in row order.
///
/// Registries start empty on every call, so the same rows always produce the
/// same graph. Rows sharing an id contribute edges but only the first one
/// produces a node. Malformed tokens are skipped.
pub fn transform(rows: &[Row]) -> GraphData {
	let mut builder = Builder {
		graph: GraphData::default(),
		node_ids: HashSet::new(),
		skipped: 0,
	};
	for row in rows {
		builder.add_row(row);
	}
	let Builder { graph, skipped, .. } = builder;
	debug!(
		"graph built: {} nodes, {} edges, {} groups, {} relation types, {} tokens skipped",
		graph.nodes.len(),
		graph.edges.len(),
		graph.groups.len(),
		graph.relations.len(),
		skipped
	);
	graph
}
