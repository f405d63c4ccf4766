//! Force-directed layout: link springs, pairwise charge and centering,
//! advanced one tick at a time by the caller's frame loop.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::ForceParams;
use super::types::{GraphData, GraphEdge, GraphNode, Viewport};

const INITIAL_RADIUS: f64 = 10.0;
const JIGGLE: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	pub id: String,
	pub group: u32,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl SimNode {
	/// An unplaced node. NaN coordinates are replaced when the simulation is
	/// built.
	pub fn new(node: &GraphNode) -> Self {
		Self {
			id: node.id.clone(),
			group: node.group,
			x: f64::NAN,
			y: f64::NAN,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	pub fn at(mut self, x: f64, y: f64) -> Self {
		self.x = x;
		self.y = y;
		self
	}

	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// An edge bound to node indices.
#[derive(Clone, Debug, PartialEq)]
pub struct SimLink {
	pub source: NodeIndex,
	pub target: NodeIndex,
	pub value: u32,
	strength: f64,
	bias: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BindReport {
	pub dropped_edges: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
	Running,
	/// Alpha fell below the threshold on this tick.
	Converged,
	Idle,
}

/// Receives positions after every tick.
pub type TickCallback = Box<dyn FnMut(&[SimNode], &[SimLink])>;

pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	viewport: Viewport,
	params: ForceParams,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	ticks: u64,
	rng: StdRng,
	on_tick: Option<TickCallback>,
	report: BindReport,
}

fn jiggle(rng: &mut StdRng) -> f64 {
	(rng.r#gen::<f64>() - 0.5) * JIGGLE
}

impl Simulation {
	pub fn from_graph(graph: &GraphData, viewport: Viewport, params: ForceParams) -> Self {
		let nodes = graph.nodes.iter().map(SimNode::new).collect();
		Self::new(nodes, &graph.edges, viewport, params)
	}

	/// Binds `edges` to `nodes` by id and places nodes without a position on
	/// a phyllotaxis spiral around the origin. Edges naming an unknown node
	/// are dropped.
	pub fn new(
		mut nodes: Vec<SimNode>,
		edges: &[GraphEdge],
		viewport: Viewport,
		params: ForceParams,
	) -> Self {
		let mut rng = StdRng::seed_from_u64(params.seed);
		let golden = PI * (3.0 - 5f64.sqrt());
		for (i, node) in nodes.iter_mut().enumerate() {
			if node.x.is_nan() || node.y.is_nan() {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden;
				node.x = radius * angle.cos() + jiggle(&mut rng);
				node.y = radius * angle.sin() + jiggle(&mut rng);
			}
			if node.vx.is_nan() || node.vy.is_nan() {
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}

		let (links, report) = bind_links(&nodes, edges);
		if report.dropped_edges > 0 {
			warn!(
				"dropped {} edges with an endpoint outside the node set",
				report.dropped_edges
			);
		}
		info!(
			"simulation created: {} nodes, {} links",
			nodes.len(),
			links.len()
		);

		Self {
			nodes,
			links,
			viewport,
			params,
			alpha: params.alpha,
			alpha_target: 0.0,
			running: true,
			ticks: 0,
			rng,
			on_tick: None,
			report,
		}
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[SimLink] {
		&self.links
	}

	pub fn node(&self, idx: NodeIndex) -> Option<&SimNode> {
		self.nodes.get(idx.0)
	}

	pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
		self.nodes.iter().position(|n| n.id == id).map(NodeIndex)
	}

	pub fn report(&self) -> BindReport {
		self.report
	}

	pub fn params(&self) -> &ForceParams {
		&self.params
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn on_tick(&mut self, callback: impl FnMut(&[SimNode], &[SimLink]) + 'static) {
		self.on_tick = Some(Box::new(callback));
	}

	/// Resumes ticking. Alpha is left as is.
	pub fn restart(&mut self) {
		if !self.running {
			debug!("simulation restarted at alpha {:.4}", self.alpha);
		}
		self.running = true;
	}

	/// Stops ticking and drops the tick callback.
	pub fn stop(&mut self) {
		self.running = false;
		if self.on_tick.take().is_some() {
			debug!("simulation stopped after {} ticks", self.ticks);
		}
	}

	/// Moves the bounds and pulls positions and pins inside them.
	pub fn resize(&mut self, viewport: Viewport) {
		self.viewport = viewport;
		let (mx, my) = (viewport.max_x(), viewport.max_y());
		for node in &mut self.nodes {
			node.x = node.x.clamp(-mx, mx);
			node.y = node.y.clamp(-my, my);
			node.fx = node.fx.map(|fx| fx.clamp(-mx, mx));
			node.fy = node.fy.map(|fy| fy.clamp(-my, my));
		}
	}

	/// Holds `idx` at `(x, y)`, clamped to the layout bounds.
	pub fn pin(&mut self, idx: NodeIndex, x: f64, y: f64) -> bool {
		let (x, y) = self.clamp(x, y);
		let Some(node) = self.nodes.get_mut(idx.0) else {
			return false;
		};
		node.fx = Some(x);
		node.fy = Some(y);
		true
	}

	pub fn unpin(&mut self, idx: NodeIndex) -> bool {
		let Some(node) = self.nodes.get_mut(idx.0) else {
			return false;
		};
		node.fx = None;
		node.fy = None;
		true
	}

	/// The topmost node within `radius` of `(x, y)`.
	pub fn find(&self, x: f64, y: f64, radius: f64) -> Option<NodeIndex> {
		let r2 = radius * radius;
		self.nodes
			.iter()
			.rposition(|n| {
				let (dx, dy) = (n.x - x, n.y - y);
				dx * dx + dy * dy < r2
			})
			.map(NodeIndex)
	}

	fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
		let (mx, my) = (self.viewport.max_x(), self.viewport.max_y());
		(x.clamp(-mx, mx), y.clamp(-my, my))
	}

	/// Advances one frame if running and notifies the tick callback.
	pub fn step(&mut self) -> TickStatus {
		if !self.running {
			return TickStatus::Idle;
		}
		self.tick();
		if let Some(callback) = self.on_tick.as_mut() {
			callback(&self.nodes, &self.links);
		}
		if self.alpha < self.params.alpha_min {
			self.running = false;
			info!("simulation converged after {} ticks", self.ticks);
			return TickStatus::Converged;
		}
		TickStatus::Running
	}

	/// One integration step, regardless of the running state. Does not
	/// notify the tick callback.
	pub fn tick(&mut self) {
		let mut dv = vec![(0.0, 0.0); self.nodes.len()];
		link_force(
			&self.nodes,
			&self.links,
			&self.params,
			self.alpha,
			&mut self.rng,
			&mut dv,
		);
		charge_force(
			&self.nodes,
			&self.params,
			self.alpha,
			&mut self.rng,
			&mut dv,
		);
		let (sx, sy) = center_shift(&self.nodes, self.params.center_strength);

		let keep = 1.0 - self.params.velocity_decay;
		let (mx, my) = (self.viewport.max_x(), self.viewport.max_y());
		let mut reset = 0;
		for (node, (dvx, dvy)) in self.nodes.iter_mut().zip(dv) {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx = (node.vx + dvx) * keep;
					node.x += node.vx - sx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy = (node.vy + dvy) * keep;
					node.y += node.vy - sy;
				}
			}
			if !(node.x.is_finite() && node.y.is_finite()) {
				node.x = 0.0;
				node.y = 0.0;
				node.vx = 0.0;
				node.vy = 0.0;
				reset += 1;
			}
			node.x = node.x.clamp(-mx, mx);
			node.y = node.y.clamp(-my, my);
		}
		if reset > 0 {
			warn!("reset {reset} nodes with non-finite positions to the origin");
		}

		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;
		self.ticks += 1;
	}
}

fn bind_links(nodes: &[SimNode], edges: &[GraphEdge]) -> (Vec<SimLink>, BindReport) {
	let by_id: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();
	let mut report = BindReport::default();
	let mut bound = Vec::with_capacity(edges.len());
	for edge in edges {
		match (
			by_id.get(edge.source.as_str()),
			by_id.get(edge.target.as_str()),
		) {
			(Some(&s), Some(&t)) => bound.push((s, t, edge.value)),
			_ => {
				debug!("dropping edge {} -> {}", edge.source, edge.target);
				report.dropped_edges += 1;
			}
		}
	}

	let mut degree = vec![0usize; nodes.len()];
	for &(s, t, _) in &bound {
		degree[s] += 1;
		degree[t] += 1;
	}
	let links = bound
		.into_iter()
		.map(|(s, t, value)| {
			let (ds, dt) = (degree[s] as f64, degree[t] as f64);
			SimLink {
				source: NodeIndex(s),
				target: NodeIndex(t),
				value,
				strength: 1.0 / ds.min(dt),
				bias: ds / (ds + dt),
			}
		})
		.collect();
	(links, report)
}

fn link_force(
	nodes: &[SimNode],
	links: &[SimLink],
	params: &ForceParams,
	alpha: f64,
	rng: &mut StdRng,
	dv: &mut [(f64, f64)],
) {
	for link in links {
		let (si, ti) = (link.source.0, link.target.0);
		if si == ti {
			continue;
		}
		let (s, t) = (&nodes[si], &nodes[ti]);
		let mut x = t.x + t.vx - s.x - s.vx;
		let mut y = t.y + t.vy - s.y - s.vy;
		if x == 0.0 {
			x = jiggle(rng);
		}
		if y == 0.0 {
			y = jiggle(rng);
		}
		let l = (x * x + y * y).sqrt();
		let k = (l - params.link_distance) / l * alpha * link.strength;
		x *= k;
		y *= k;
		dv[ti].0 -= x * link.bias;
		dv[ti].1 -= y * link.bias;
		dv[si].0 += x * (1.0 - link.bias);
		dv[si].1 += y * (1.0 - link.bias);
	}
}

fn charge_force(
	nodes: &[SimNode],
	params: &ForceParams,
	alpha: f64,
	rng: &mut StdRng,
	dv: &mut [(f64, f64)],
) {
	let min2 = params.charge_distance_min * params.charge_distance_min;
	let strength = params.charge_strength * alpha;
	for i in 0..nodes.len() {
		for j in (i + 1)..nodes.len() {
			let mut x = nodes[j].x - nodes[i].x;
			let mut y = nodes[j].y - nodes[i].y;
			if x == 0.0 && y == 0.0 {
				x = jiggle(rng);
				y = jiggle(rng);
			}
			let mut l = x * x + y * y;
			if l < min2 {
				l = (min2 * l).sqrt();
			}
			let (fx, fy) = (x * strength / l, y * strength / l);
			dv[i].0 += fx;
			dv[i].1 += fy;
			dv[j].0 -= fx;
			dv[j].1 -= fy;
		}
	}
}

fn center_shift(nodes: &[SimNode], strength: f64) -> (f64, f64) {
	if nodes.is_empty() {
		return (0.0, 0.0);
	}
	let n = nodes.len() as f64;
	let (sx, sy) = nodes
		.iter()
		.fold((0.0, 0.0), |(ax, ay), node| (ax + node.x, ay + node.y));
	(sx / n * strength, sy / n * strength)
}
