use indexmap::IndexMap;

/// One tabular record: an entity, its relatives and its group memberships.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
	pub id: String,
	/// `|`-delimited `entityId:relationType` pairs.
	pub relatives: String,
	/// `|`-delimited group labels. The unsplit string is the primary group.
	pub groups: String,
}

impl Row {
	pub fn new(
		id: impl Into<String>,
		relatives: impl Into<String>,
		groups: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			relatives: relatives.into(),
			groups: groups.into(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
	pub id: String,
	pub group: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
	pub value: u32,
}

/// First-seen, 1-based string index. Append-only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
	entries: IndexMap<String, u32>,
}

impl Registry {
	/// Returns the index for `key`, assigning the next one if unseen.
	pub fn register(&mut self, key: &str) -> u32 {
		if let Some(&idx) = self.entries.get(key) {
			return idx;
		}
		let idx = self.entries.len() as u32 + 1;
		self.entries.insert(key.to_owned(), idx);
		idx
	}

	pub fn get(&self, key: &str) -> Option<u32> {
		self.entries.get(key).copied()
	}

	pub fn contains(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Keys in assignment order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	/// Group strings (combos and individual labels) to group index.
	pub groups: Registry,
	/// Relation-type strings to edge value.
	pub relations: Registry,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Horizontal clamp bound. Nodes may travel a full width either side.
	pub fn max_x(&self) -> f64 {
		self.width.max(0.0)
	}

	pub fn max_y(&self) -> f64 {
		(self.height / 2.0).max(0.0)
	}
}
