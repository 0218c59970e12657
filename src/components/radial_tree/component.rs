//! Leptos component wrapping the radial tree canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for panning, zooming, rotating and selecting. An animation loop
//! runs via `requestAnimationFrame`, easing the hover highlight and redrawing
//! each frame. Filter changes arrive through the `visibility` signal and never
//! rebuild the layout.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::scale::ScaleConfig;
use super::state::{CLICK_SLOP, RadialTreeState, Variant, ViewConfig};
use super::theme::Theme;
use crate::tree::{
	Catalog, LayoutConfig, NodeAnnotation, NodeId, OpacityConfig, OwnershipAnnotation, Visibility,
};

/// Bundles view state with visual configuration (scaling, theme, opacities).
struct TreeContext {
	state: RadialTreeState,
	scale: ScaleConfig,
	theme: Theme,
	opacity: OpacityConfig,
	view: ViewConfig,
}

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the brand hierarchy as an interactive radial tree or sunburst.
///
/// The catalog is laid out once; `visibility` and `variant` are reactive.
/// Clicking a node writes it to `selected` (clicking the background clears
/// it). The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and follow window resizes.
#[component]
pub fn RadialTreeCanvas(
	catalog: Arc<Catalog>,
	#[prop(into)] visibility: Signal<Visibility>,
	#[prop(into)] variant: Signal<Variant>,
	#[prop(optional)] selected: Option<WriteSignal<Option<NodeId>>>,
	#[prop(default = LayoutConfig::default())] geometry: LayoutConfig,
	#[prop(default = ViewConfig::default())] view_config: ViewConfig,
	#[prop(default = OpacityConfig::default())] opacity: OpacityConfig,
	#[prop(default = Theme::default())] theme: Theme,
	#[prop(default = false)] annotate_ownership: bool,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<TreeContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("brand-explorer: no window, canvas not started");
			return;
		};

		let (w, h) = if fullscreen {
			viewport_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("brand-explorer: canvas 2d context unavailable");
			return;
		};

		let ownership = OwnershipAnnotation;
		let annotation = annotate_ownership.then_some(&ownership as &dyn NodeAnnotation);
		let mut state = RadialTreeState::new(
			catalog.clone(),
			visibility.get_untracked(),
			geometry.clone(),
			&view_config,
			&theme,
			annotation,
			w,
			h,
		);
		state.variant = variant.get_untracked();
		debug!(
			"brand-explorer: canvas {}x{} at zoom {:.2}",
			w, h, state.transform.k
		);

		*context_init.borrow_mut() = Some(TreeContext {
			state,
			scale: ScaleConfig::default(),
			theme: theme.clone(),
			opacity: opacity.clone(),
			view: view_config.clone(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(0.016);
				render::render(&c.state, &ctx, &c.scale, &c.theme, &c.opacity);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Filter changes only swap the visibility sets.
	let context_vis = context.clone();
	Effect::new(move |_| {
		let next = visibility.get();
		if let Some(ref mut c) = *context_vis.borrow_mut() {
			c.state.set_visibility(next);
		}
	});

	let context_variant = context.clone();
	Effect::new(move |_| {
		let next = variant.get();
		if let Some(ref mut c) = *context_variant.borrow_mut() {
			c.state.variant = next;
			c.state.set_hover(None);
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.pan.active = true;
			c.state.pan.moved = false;
			c.state.pan.start_x = x;
			c.state.pan.start_y = y;
			c.state.pan.transform_start_x = c.state.transform.x;
			c.state.pan.transform_start_y = c.state.transform.y;
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.pan.active {
				let (dx, dy) = (x - c.state.pan.start_x, y - c.state.pan.start_y);
				if dx.hypot(dy) > CLICK_SLOP {
					c.state.pan.moved = true;
				}
				if c.state.pan.moved {
					c.state.transform.x = c.state.pan.transform_start_x + dx;
					c.state.transform.y = c.state.pan.transform_start_y + dy;
				}
			} else {
				let hovered = c.state.node_at_position(x, y, &c.scale);
				c.state.set_hover(hovered);
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		// Resolve the click before touching signals so the borrow is released.
		let clicked = match *context_mu.borrow_mut() {
			Some(ref mut c) => {
				let click = c.state.pan.active && !c.state.pan.moved;
				c.state.pan.active = false;
				c.state.pan.moved = false;
				click.then(|| c.state.node_at_position(x, y, &c.scale))
			}
			None => None,
		};
		if let (Some(node), Some(selected)) = (clicked, selected) {
			selected.set(node);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.pan.active = false;
			c.state.pan.moved = false;
			c.state.set_hover(None);
		}
	};

	let context_dc = context.clone();
	let on_dblclick = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_dc.borrow_mut() {
			c.state.reset_view();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			// Shift+wheel rotates; some browsers report it as horizontal scroll.
			if ev.shift_key() {
				let delta = if ev.delta_y() != 0.0 {
					ev.delta_y()
				} else {
					ev.delta_x()
				};
				c.state.transform.rotate_by(delta.signum() * c.view.rotation_step);
			} else {
				let factor = if ev.delta_y() > 0.0 {
					1.0 / c.view.wheel_zoom_factor
				} else {
					c.view.wheel_zoom_factor
				};
				c.state.transform.zoom_at(x, y, factor, &c.view);
			}
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="radial-tree-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
