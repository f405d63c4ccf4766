use std::cell::Cell;
use std::rc::Rc;

use super::config::{ForceParams, VisConfig};
use super::interaction::DragController;
use super::simulation::{NodeIndex, Simulation, TickStatus};
use super::types::{GraphData, Viewport};

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 8.0;

/// Everything the canvas needs between frames.
pub struct RelationshipGraphState {
	pub simulation: Simulation,
	pub config: VisConfig,
	pub drag: DragController,
	pub dragging: Option<NodeIndex>,
	pub hover: Option<NodeIndex>,
	pub width: f64,
	pub height: f64,
	dirty: Rc<Cell<bool>>,
}

impl RelationshipGraphState {
	pub fn new(graph: &GraphData, config: VisConfig, width: f64, height: f64, seed: u64) -> Self {
		let mut simulation = Simulation::from_graph(
			graph,
			Viewport::new(width, height),
			ForceParams::with_seed(seed),
		);
		let dirty = Rc::new(Cell::new(true));
		let on_tick = dirty.clone();
		simulation.on_tick(move |_, _| on_tick.set(true));

		Self {
			simulation,
			config,
			drag: DragController::default(),
			dragging: None,
			hover: None,
			width,
			height,
			dirty,
		}
	}

	/// Layout space has its origin at the center of the canvas.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(sx - self.width / 2.0, sy - self.height / 2.0)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeIndex> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.simulation.find(gx, gy, HIT_RADIUS)
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.node_at_position(sx, sy) else {
			return;
		};
		self.drag.drag_start(&mut self.simulation, idx);
		self.dragging = Some(idx);
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		match self.dragging {
			Some(idx) => {
				let (gx, gy) = self.screen_to_graph(sx, sy);
				self.drag.drag(&mut self.simulation, idx, gx, gy);
			}
			None => {
				let hovered = self.node_at_position(sx, sy);
				if hovered != self.hover {
					self.hover = hovered;
					self.dirty.set(true);
				}
			}
		}
	}

	pub fn pointer_up(&mut self) {
		if let Some(idx) = self.dragging.take() {
			self.drag.drag_end(&mut self.simulation, idx);
		}
	}

	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		if self.hover.take().is_some() {
			self.dirty.set(true);
		}
	}

	pub fn tick(&mut self) -> TickStatus {
		self.simulation.step()
	}

	/// True once after any tick or hover change.
	pub fn take_dirty(&self) -> bool {
		self.dirty.replace(false)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.simulation.resize(Viewport::new(width, height));
		self.dirty.set(true);
	}

	/// Stops the simulation; used before the state is replaced or dropped.
	pub fn teardown(&mut self) {
		self.pointer_leave();
		self.simulation.stop();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::relationship_graph::transform::transform;
	use crate::components::relationship_graph::types::Row;

	fn state() -> RelationshipGraphState {
		let graph = transform(&[Row::new("A", "B:friend", "X"), Row::new("B", "", "X")]);
		RelationshipGraphState::new(&graph, VisConfig::default(), 200.0, 100.0, 11)
	}

	fn screen_pos(s: &RelationshipGraphState, idx: usize) -> (f64, f64) {
		let n = &s.simulation.nodes()[idx];
		(n.x + s.width / 2.0, n.y + s.height / 2.0)
	}

	#[test]
	fn screen_origin_maps_to_top_left_of_layout() {
		let s = state();
		assert_eq!(s.screen_to_graph(0.0, 0.0), (-100.0, -50.0));
		assert_eq!(s.screen_to_graph(100.0, 50.0), (0.0, 0.0));
	}

	#[test]
	fn pointer_drag_pins_in_layout_space() {
		let mut s = state();
		let (sx, sy) = screen_pos(&s, 2);
		s.pointer_down(sx, sy);
		assert_eq!(s.dragging, Some(NodeIndex(2)));

		s.pointer_move(150.0, 75.0);
		s.tick();
		let node = &s.simulation.nodes()[2];
		assert_eq!((node.x, node.y), (50.0, 25.0));

		s.pointer_up();
		assert_eq!(s.dragging, None);
		assert!(!s.simulation.nodes()[2].is_pinned());
	}

	#[test]
	fn pressing_empty_space_does_nothing() {
		let mut s = state();
		s.pointer_down(0.0, 0.0);
		assert_eq!(s.dragging, None);
		assert_eq!(s.drag.active_gestures(), 0);
	}

	#[test]
	fn ticks_and_hover_mark_the_frame_dirty() {
		let mut s = state();
		assert!(s.take_dirty());
		assert!(!s.take_dirty());
		s.tick();
		assert!(s.take_dirty());

		let (sx, sy) = screen_pos(&s, 0);
		s.pointer_move(sx, sy);
		assert_eq!(s.hover, Some(NodeIndex(0)));
		assert!(s.take_dirty());
	}

	#[test]
	fn resize_after_convergence_pulls_nodes_inside() {
		let mut s = state();
		while s.tick() != TickStatus::Converged {}
		s.take_dirty();
		s.resize(20.0, 10.0);
		assert!(s.take_dirty());
		for n in s.simulation.nodes() {
			assert!(n.x.abs() <= 20.0 && n.y.abs() <= 5.0);
		}
	}

	#[test]
	fn teardown_silences_the_tick_callback() {
		let mut s = state();
		s.take_dirty();
		s.teardown();
		s.simulation.restart();
		s.tick();
		assert!(!s.take_dirty());
	}
}
