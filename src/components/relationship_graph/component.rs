use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::config::{FieldNames, ShapeLimits, VisConfig};
use super::records::{QueryResponse, prepare};
use super::render;
use super::state::RelationshipGraphState;

const FALLBACK_WIDTH: f64 = 800.0;
const FALLBACK_HEIGHT: f64 = 600.0;

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(FALLBACK_WIDTH),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(FALLBACK_HEIGHT),
	)
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Draws the relationship graph of `records` and lets the user drag nodes.
///
/// `config` is the host's option object (`title`, `color_range`). Runs again
/// whenever the records, query metadata or config change. Query shape,
/// record and config errors replace the canvas with the error message.
#[component]
pub fn RelationshipGraphCanvas(
	#[prop(into)] records: Signal<Vec<Value>>,
	#[prop(into)] query: Signal<QueryResponse>,
	#[prop(into)] config: Signal<Value>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let (error, set_error) = signal(None::<String>);
	let state: Rc<RefCell<Option<RelationshipGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let (records, query, config) = (records.get(), query.get(), config.get());

		if let Some(ref mut previous) = *state_init.borrow_mut() {
			previous.teardown();
		}
		let prepared = VisConfig::from_json(&config).and_then(|config| {
			let graph = prepare(
				&records,
				&query,
				&ShapeLimits::default(),
				&FieldNames::default(),
			)?;
			Ok((config, graph))
		});
		let (config, graph) = match prepared {
			Ok(prepared) => prepared,
			Err(e) => {
				error!("relationship graph not rendered: {e}");
				*state_init.borrow_mut() = None;
				set_error.set(Some(e.to_string()));
				return;
			}
		};
		set_error.set(None);

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(FALLBACK_WIDTH)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(FALLBACK_HEIGHT)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let seed = js_sys::Date::now() as u64;
		*state_init.borrow_mut() = Some(RelationshipGraphState::new(&graph, config, w, h, seed));

		// The frame loop outlives updates and picks up the replaced state.
		if animate_init.borrow().is_some() {
			return;
		}
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("canvas has no 2d context");
			return;
		};

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				if s.take_dirty() {
					render::render(s, &ctx);
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
		info!("relationship graph canvas started ({w}x{h})");
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	view! {
		<div
			class="relationship-graph"
			style:font-family="\"Open Sans\", \"Helvetica\", sans-serif"
		>
			<Show when=move || error.get().is_some()>
				<p class="relationship-graph-error">{move || error.get().unwrap_or_default()}</p>
			</Show>
			<canvas
				node_ref=canvas_ref
				class="relationship-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				style:display=move || { if error.get().is_some() { "none" } else { "block" } }
				style:cursor="grab"
			/>
		</div>
	}
}
