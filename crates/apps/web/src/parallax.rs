use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use streaming::binding::MediaView;
use streaming::driver::PriorityContext;
use streaming::parallax::{ParallaxBackground, ParallaxLayer};
use streaming::tier::Tier;
use streaming::waiters::Preload;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlElement, IntersectionObserver};

use crate::dom::{self, FADE_CLASS, IntersectCallback};
use crate::log::console_error;
use crate::media::DEFAULT_PLACEHOLDER;

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParallaxOptions {
    pub layers: Vec<ParallaxLayer>,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

struct Stack {
    background: RefCell<ParallaxBackground>,
    layers: Vec<ParallaxLayer>,
    elements: Vec<HtmlElement>,
}

impl Stack {
    fn apply_offsets(&self, scroll_y: f64) -> Result<(), JsValue> {
        let offsets = self.background.borrow().offsets(scroll_y);
        for (el, offset) in self.elements.iter().zip(offsets) {
            el.style()
                .set_property("transform", &format!("translate3d(0, {offset:.2}px, 0)"))?;
        }
        Ok(())
    }

    fn reveal(&self, index: usize) -> Result<(), JsValue> {
        let (Some(el), Some(layer)) = (self.elements.get(index), self.layers.get(index)) else {
            return Ok(());
        };
        el.style()
            .set_property("background-image", &format!("url(\"{}\")", layer.source))?;
        el.class_list().add_1(FADE_CLASS)?;
        dom::clear_placeholder(el)
    }
}

/// Mounted parallax stack; keeps its scroll listener and observer alive.
pub struct MountedParallax {
    on_scroll: Closure<dyn FnMut()>,
    observer: Option<(IntersectionObserver, IntersectCallback)>,
}

impl Drop for MountedParallax {
    fn drop(&mut self) {
        if let Some((observer, _)) = &self.observer {
            observer.disconnect();
        }
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback("scroll", self.on_scroll.as_ref().unchecked_ref());
        }
    }
}

pub fn mount(
    ctx: &PriorityContext,
    container: HtmlElement,
    options: ParallaxOptions,
) -> Result<MountedParallax, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = dom::document()?;

    let mut elements = Vec::with_capacity(options.layers.len());
    for (i, layer) in options.layers.iter().enumerate() {
        let el = document.create_element("div")?.dyn_into::<HtmlElement>()?;
        el.class_list().add_1("parallax-layer")?;
        el.set_attribute("data-layer", &i.to_string())?;
        el.style().set_property("will-change", "transform")?;
        dom::show_placeholder(&el, &options.placeholder)?;
        container.append_child(&el)?;
        elements.push(el);
        tracing::trace!(layer = i, speed = layer.speed, "parallax layer");
    }

    let (background, preloads) = ParallaxBackground::mount(ctx, &options.layers);
    let stack = Rc::new(Stack {
        background: RefCell::new(background),
        layers: options.layers,
        elements,
    });

    for (i, preload) in preloads {
        reveal_when_ready(stack.clone(), i, preload);
    }

    // Layers already loaded by an earlier mount never get a fresh preload.
    for i in 0..stack.layers.len() {
        if stack.background.borrow().view(i) == Some(MediaView::Media) {
            stack.reveal(i)?;
        }
    }

    let config = ctx.config();
    let margin = stack
        .layers
        .iter()
        .filter_map(|l| l.tier)
        .filter(|t| matches!(t, Tier::Medium | Tier::Low))
        .map(|t| config.lazy_margin_px(t))
        .max()
        .unwrap_or(0);
    let observer = if stack.background.borrow().wants_observer() {
        let on_enter = {
            let stack = stack.clone();
            move || {
                let requested = stack.background.borrow_mut().on_intersect();
                for (i, preload) in requested {
                    reveal_when_ready(stack.clone(), i, preload);
                }
            }
        };
        Some(dom::observe_once(&container, &format!("{margin}px"), on_enter)?)
    } else {
        None
    };

    let on_scroll = {
        let stack = stack.clone();
        let window = window.clone();
        Closure::<dyn FnMut()>::new(move || {
            let scroll_y = window.scroll_y().unwrap_or(0.0);
            if let Err(err) = stack.apply_offsets(scroll_y) {
                console_error(&format!("parallax update failed: {err:?}"));
            }
        })
    };
    window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    stack.apply_offsets(window.scroll_y()?)?;

    Ok(MountedParallax { on_scroll, observer })
}

fn reveal_when_ready(stack: Rc<Stack>, index: usize, preload: Preload) {
    spawn_local(async move {
        preload.await;
        if stack.background.borrow().view(index) != Some(MediaView::Media) {
            return;
        }
        if let Err(err) = stack.reveal(index) {
            console_error(&format!("parallax layer {index} reveal failed: {err:?}"));
        }
    });
}
