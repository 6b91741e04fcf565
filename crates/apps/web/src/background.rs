use std::cell::{Cell, RefCell};
use std::rc::Rc;

use foundation::bounds::Span;
use foundation::time::Time;
use sections::config::{BlendConfig, SectionStyle};
use sections::controller::{BlendController, FrameOutput};
use sections::score::SectionSample;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use crate::log::console_error;

/// Nav links carry the id of the section they point at in this attribute.
pub const NAV_ATTRIBUTE: &str = "data-nav-section";
pub const ACTIVE_CLASS: &str = "is-active";

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Animation-frame loop driving the page background and nav highlight.
///
/// The loop is the only code that writes the body background colour.
pub struct BackgroundLoop {
    callback: Rc<RefCell<Option<FrameCallback>>>,
    pending: Rc<Cell<Option<i32>>>,
}

impl BackgroundLoop {
    pub fn start(config: BlendConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;

        let styles = config.sections.clone();
        let mut controller = BlendController::new(config);
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let frame = {
            let callback = callback.clone();
            let pending = pending.clone();
            let window = window.clone();
            Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
                pending.set(None);
                let height = window
                    .inner_height()
                    .ok()
                    .and_then(|h| h.as_f64())
                    .unwrap_or(0.0);
                let out = controller.on_frame(Time(timestamp), Span::new(0.0, height), || {
                    measure_sections(&document, &styles)
                });
                if let Err(err) = apply(&document, &body, &out) {
                    console_error(&format!("background frame failed: {err:?}"));
                }
                if let Some(cb) = callback.borrow().as_ref() {
                    match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        Ok(handle) => pending.set(Some(handle)),
                        Err(err) => console_error(&format!("requestAnimationFrame: {err:?}")),
                    }
                }
            })
        };
        let handle = window.request_animation_frame(frame.as_ref().unchecked_ref())?;
        pending.set(Some(handle));
        *callback.borrow_mut() = Some(frame);

        Ok(Self { callback, pending })
    }
}

impl Drop for BackgroundLoop {
    fn drop(&mut self) {
        if let (Some(handle), Some(window)) = (self.pending.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
        // Breaks the closure's reference to itself.
        self.callback.borrow_mut().take();
    }
}

/// Client-space spans of the configured sections that exist on the page.
fn measure_sections(document: &Document, styles: &[SectionStyle]) -> Vec<SectionSample> {
    styles
        .iter()
        .filter_map(|style| {
            let el = document.get_element_by_id(&style.id)?;
            let rect = el.get_bounding_client_rect();
            Some(SectionSample::new(
                style.id.clone(),
                Span::new(rect.top(), rect.height()),
                style.color,
            ))
        })
        .collect()
}

fn apply(document: &Document, body: &HtmlElement, out: &FrameOutput) -> Result<(), JsValue> {
    if out.background_changed {
        body.style()
            .set_property("background-color", &out.background.to_css())?;
    }
    if out.active_changed {
        let links = document.query_selector_all(&format!("[{NAV_ATTRIBUTE}]"))?;
        for i in 0..links.length() {
            let Some(link) = links.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let is_active = link.get_attribute(NAV_ATTRIBUTE).as_deref()
                == out.active_section.as_deref();
            link.class_list()
                .toggle_with_force(ACTIVE_CLASS, is_active)?;
        }
    }
    Ok(())
}
