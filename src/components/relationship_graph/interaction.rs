use log::debug;

use super::simulation::{NodeIndex, Simulation};

/// Pointer drag handling. Only pins nodes and moves the alpha target; the
/// simulation stays the sole writer of positions and velocities.
#[derive(Clone, Debug, Default)]
pub struct DragController {
	active: usize,
}

impl DragController {
	pub fn active_gestures(&self) -> usize {
		self.active
	}

	/// Reheats the simulation when no other drag is in progress and pins the
	/// node where it currently is.
	pub fn drag_start(&mut self, sim: &mut Simulation, node: NodeIndex) {
		let Some((x, y)) = sim.node(node).map(|n| (n.x, n.y)) else {
			return;
		};
		if self.active == 0 {
			sim.set_alpha_target(sim.params().drag_alpha_target);
			sim.restart();
		}
		self.active += 1;
		sim.pin(node, x, y);
		debug!("drag start on {node:?} at ({x:.1}, {y:.1})");
	}

	/// `x`, `y` are in layout space.
	pub fn drag(&self, sim: &mut Simulation, node: NodeIndex, x: f64, y: f64) {
		sim.pin(node, x, y);
	}

	pub fn drag_end(&mut self, sim: &mut Simulation, node: NodeIndex) {
		if sim.node(node).is_none() {
			return;
		}
		self.active = self.active.saturating_sub(1);
		if self.active == 0 {
			sim.set_alpha_target(0.0);
		}
		sim.unpin(node);
		debug!("drag end on {node:?}");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::relationship_graph::config::ForceParams;
	use crate::components::relationship_graph::simulation::TickStatus;
	use crate::components::relationship_graph::transform::transform;
	use crate::components::relationship_graph::types::{Row, Viewport};

	fn settled() -> Simulation {
		let graph = transform(&[
			Row::new("A", "B:friend|C:friend", "X"),
			Row::new("B", "C:rival", "X"),
			Row::new("C", "", "Y"),
		]);
		let mut sim = Simulation::from_graph(
			&graph,
			Viewport::new(300.0, 200.0),
			ForceParams::with_seed(5),
		);
		while sim.step() != TickStatus::Converged {}
		sim
	}

	#[test]
	fn drag_start_reheats_and_pins_in_place() {
		let mut sim = settled();
		let mut drag = DragController::default();
		let a = NodeIndex(0);
		let (x, y) = (sim.nodes()[0].x, sim.nodes()[0].y);

		drag.drag_start(&mut sim, a);
		assert!(sim.is_running());
		assert_eq!(sim.alpha_target(), 0.3);
		assert_eq!((sim.nodes()[0].fx, sim.nodes()[0].fy), (Some(x), Some(y)));
	}

	#[test]
	fn dragging_moves_the_node_and_its_neighbours() {
		let mut sim = settled();
		let mut drag = DragController::default();
		let a = sim.index_of("A").unwrap();
		let b = sim.index_of("B").unwrap();
		let b_before = (sim.nodes()[b.0].x, sim.nodes()[b.0].y);

		drag.drag_start(&mut sim, a);
		drag.drag(&mut sim, a, 100.0, 60.0);
		for _ in 0..30 {
			sim.step();
			assert_eq!((sim.nodes()[a.0].x, sim.nodes()[a.0].y), (100.0, 60.0));
		}
		let b_after = (sim.nodes()[b.0].x, sim.nodes()[b.0].y);
		assert_ne!(b_before, b_after);
	}

	#[test]
	fn drag_end_releases_the_node() {
		let mut sim = settled();
		let mut drag = DragController::default();
		let a = NodeIndex(0);

		drag.drag_start(&mut sim, a);
		drag.drag(&mut sim, a, 120.0, -80.0);
		sim.step();
		drag.drag_end(&mut sim, a);

		assert_eq!(sim.alpha_target(), 0.0);
		assert!(!sim.nodes()[0].is_pinned());
		sim.step();
		let node = &sim.nodes()[0];
		assert!(node.vx != 0.0 || node.vy != 0.0);
		assert_ne!((node.x, node.y), (120.0, -80.0));
	}

	#[test]
	fn overlapping_drags_cool_only_after_the_last() {
		let mut sim = settled();
		let mut drag = DragController::default();
		let (a, c) = (NodeIndex(0), NodeIndex(3));

		drag.drag_start(&mut sim, a);
		sim.set_alpha_target(0.5);
		drag.drag_start(&mut sim, c);
		assert_eq!(sim.alpha_target(), 0.5);
		assert_eq!(drag.active_gestures(), 2);

		drag.drag_end(&mut sim, a);
		assert_eq!(sim.alpha_target(), 0.5);
		drag.drag_end(&mut sim, c);
		assert_eq!(sim.alpha_target(), 0.0);
	}

	#[test]
	fn unknown_nodes_are_ignored() {
		let mut sim = settled();
		let mut drag = DragController::default();
		drag.drag_start(&mut sim, NodeIndex(42));
		assert_eq!(drag.active_gestures(), 0);
		assert!(!sim.is_running());
		drag.drag_end(&mut sim, NodeIndex(42));
		assert_eq!(drag.active_gestures(), 0);
	}
}
