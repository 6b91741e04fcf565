use std::cell::RefCell;
use std::rc::Rc;

use streaming::adapter::{Completion, Deferrer, LoaderAdapter};
use streaming::descriptor::{LoadJob, ResourceKind};
use streaming::residency::Settlement;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlImageElement, HtmlVideoElement};

/// Runs deferred scheduler work as a microtask.
#[derive(Debug, Default)]
pub struct MicrotaskDeferrer;

impl Deferrer for MicrotaskDeferrer {
    fn defer(&self, task: Box<dyn FnOnce()>) {
        spawn_local(async move { task() });
    }
}

/// Completion shared by the success and error listeners of one element.
/// Whichever fires first settles; the other finds the slot empty.
type Slot = Rc<RefCell<Option<Completion>>>;

fn settle_slot(slot: &Slot, settlement: Settlement) {
    let done = slot.borrow_mut().take();
    if let Some(done) = done {
        done.settle(settlement);
    }
}

/// Loads media through native browser elements.
#[derive(Debug, Default)]
pub struct BrowserLoader;

impl LoaderAdapter for BrowserLoader {
    fn start(&self, job: LoadJob, done: Completion) {
        let slot: Slot = Rc::new(RefCell::new(Some(done)));
        let started = match job.kind {
            ResourceKind::Image | ResourceKind::BackgroundImage => load_image(&job, &slot),
            ResourceKind::Video => load_video(&job, &slot),
        };
        if let Err(err) = started {
            settle_slot(&slot, Settlement::failed(format!("{err:?}")));
        }
    }
}

fn failure_reason(job: &LoadJob) -> String {
    format!("{} failed to load: {}", job.kind.as_str(), job.source)
}

fn load_image(job: &LoadJob, slot: &Slot) -> Result<(), JsValue> {
    let img = HtmlImageElement::new()?;

    let on_load = {
        let slot = slot.clone();
        let img = img.clone();
        Closure::once_into_js(move || {
            img.set_onerror(None);
            settle_slot(&slot, Settlement::Loaded);
        })
    };
    let on_error = {
        let slot = slot.clone();
        let img = img.clone();
        let reason = failure_reason(job);
        Closure::once_into_js(move || {
            img.set_onload(None);
            settle_slot(&slot, Settlement::failed(reason));
        })
    };

    img.set_onload(Some(on_load.unchecked_ref()));
    img.set_onerror(Some(on_error.unchecked_ref()));
    img.set_src(&job.source);
    Ok(())
}

fn load_video(job: &LoadJob, slot: &Slot) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let video = document
        .create_element("video")?
        .dyn_into::<HtmlVideoElement>()?;
    video.set_preload("auto");
    video.set_muted(true);

    let on_loaded = {
        let slot = slot.clone();
        Closure::once_into_js(move || settle_slot(&slot, Settlement::Loaded))
    };
    let on_error = {
        let slot = slot.clone();
        let reason = failure_reason(job);
        Closure::once_into_js(move || settle_slot(&slot, Settlement::failed(reason)))
    };

    video.add_event_listener_with_callback("loadeddata", on_loaded.unchecked_ref())?;
    video.add_event_listener_with_callback("error", on_error.unchecked_ref())?;
    video.set_src(&job.source);
    Ok(())
}
