use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

pub const PLACEHOLDER_CLASS: &str = "priority-media--placeholder";
pub const LOADED_CLASS: &str = "priority-media--loaded";
pub const FADE_CLASS: &str = "priority-media__fade";

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn element_by_id(id: &str) -> Result<HtmlElement, JsValue> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not an HTML element")))
}

pub fn show_placeholder(host: &HtmlElement, color: &str) -> Result<(), JsValue> {
    host.class_list().add_1(PLACEHOLDER_CLASS)?;
    host.style().set_property("background-color", color)
}

pub fn clear_placeholder(host: &HtmlElement) -> Result<(), JsValue> {
    host.class_list().remove_1(PLACEHOLDER_CLASS)?;
    host.class_list().add_1(LOADED_CLASS)?;
    host.style().remove_property("background-color")?;
    Ok(())
}

pub type IntersectCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Observer that calls `on_enter` the first time `target` comes within
/// `root_margin` of the viewport, then disconnects itself.
///
/// The returned closure must outlive the observer.
pub fn observe_once(
    target: &HtmlElement,
    root_margin: &str,
    mut on_enter: impl FnMut() + 'static,
) -> Result<(IntersectionObserver, IntersectCallback), JsValue> {
    let callback: IntersectCallback = Closure::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            let entered = entries.iter().any(|entry| {
                entry
                    .dyn_into::<IntersectionObserverEntry>()
                    .map(|e| e.is_intersecting())
                    .unwrap_or(false)
            });
            if entered {
                observer.disconnect();
                on_enter();
            }
        },
    );
    let init = IntersectionObserverInit::new();
    init.set_root_margin(root_margin);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    observer.observe(target);
    Ok((observer, callback))
}
