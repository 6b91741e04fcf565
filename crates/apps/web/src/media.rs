use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use streaming::binding::{MediaBinding, MediaSpec, MediaView};
use streaming::descriptor::ResourceKind;
use streaming::driver::PriorityContext;
use streaming::tier::Tier;
use streaming::waiters::Preload;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlElement, HtmlImageElement, HtmlVideoElement, IntersectionObserver};

use crate::dom::{self, FADE_CLASS, IntersectCallback};
use crate::log::console_error;

pub const DEFAULT_PLACEHOLDER: &str = "#1a1a1a";

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

/// Mount options for a priority image or video, as passed from JS.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaOptions {
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    pub tier: Tier,
    #[serde(default)]
    pub alt: String,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl MediaOptions {
    pub fn spec(&self, kind: ResourceKind) -> MediaSpec {
        let spec = MediaSpec::new(self.source.clone(), kind, self.tier);
        match &self.id {
            Some(id) => spec.with_id(id.as_str()),
            None => spec,
        }
    }
}

/// Keeps the intersection observer of a lazy priority image/video alive.
pub struct MountedMedia {
    observer: Option<(IntersectionObserver, IntersectCallback)>,
}

impl Drop for MountedMedia {
    fn drop(&mut self) {
        if let Some((observer, _)) = &self.observer {
            observer.disconnect();
        }
    }
}

pub fn mount(
    ctx: &PriorityContext,
    host: HtmlElement,
    kind: ResourceKind,
    options: MediaOptions,
) -> Result<MountedMedia, JsValue> {
    dom::show_placeholder(&host, &options.placeholder)?;

    let (binding, preload) = MediaBinding::mount(ctx, &options.spec(kind));
    let plan = binding.plan();
    let binding = Rc::new(RefCell::new(binding));
    let options = Rc::new(options);

    match preload {
        Some(preload) => {
            reveal_when_ready(preload, binding.clone(), host.clone(), kind, options.clone());
        }
        // Loaded through an earlier consumer of the same id.
        None if binding.borrow().view() == MediaView::Media => reveal(&host, kind, &options)?,
        None => {}
    }

    let wants_observer = binding.borrow().wants_observer();
    let observer = match plan.root_margin_css() {
        Some(margin) if wants_observer => {
            let target = host.clone();
            let binding = binding.clone();
            let on_enter = move || {
                let preload = binding.borrow_mut().on_intersect();
                if let Some(preload) = preload {
                    reveal_when_ready(
                        preload,
                        binding.clone(),
                        host.clone(),
                        kind,
                        options.clone(),
                    );
                }
            };
            Some(dom::observe_once(&target, &margin, on_enter)?)
        }
        _ => None,
    };

    Ok(MountedMedia { observer })
}

fn reveal_when_ready(
    preload: Preload,
    binding: Rc<RefCell<MediaBinding>>,
    host: HtmlElement,
    kind: ResourceKind,
    options: Rc<MediaOptions>,
) {
    spawn_local(async move {
        preload.await;
        if binding.borrow().view() != MediaView::Media {
            return;
        }
        if let Err(err) = reveal(&host, kind, &options) {
            console_error(&format!("reveal {} failed: {err:?}", options.source));
        }
    });
}

/// Swaps the placeholder for the real media.
fn reveal(host: &HtmlElement, kind: ResourceKind, options: &MediaOptions) -> Result<(), JsValue> {
    let document = dom::document()?;
    match kind {
        ResourceKind::Image => {
            let img = document.create_element("img")?.dyn_into::<HtmlImageElement>()?;
            img.set_src(&options.source);
            img.set_alt(&options.alt);
            img.class_list().add_1(FADE_CLASS)?;
            host.set_inner_html("");
            host.append_child(&img)?;
        }
        ResourceKind::Video => {
            let video = document.create_element("video")?.dyn_into::<HtmlVideoElement>()?;
            video.set_muted(true);
            video.set_autoplay(true);
            video.set_loop(true);
            video.set_attribute("playsinline", "")?;
            video.set_src(&options.source);
            video.class_list().add_1(FADE_CLASS)?;
            host.set_inner_html("");
            host.append_child(&video)?;
        }
        ResourceKind::BackgroundImage => {
            host.style()
                .set_property("background-image", &format!("url(\"{}\")", options.source))?;
            host.class_list().add_1(FADE_CLASS)?;
        }
    }
    dom::clear_placeholder(host)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_PLACEHOLDER, MediaOptions};
    use streaming::descriptor::ResourceKind;
    use streaming::tier::Tier;

    #[test]
    fn options_default_id_and_placeholder() {
        let o: MediaOptions =
            serde_json::from_str(r#"{"source": "/covers/lp1.jpg", "tier": "medium"}"#).unwrap();
        assert_eq!(o.placeholder, DEFAULT_PLACEHOLDER);
        assert_eq!(o.tier, Tier::Medium);
        let spec = o.spec(ResourceKind::Image);
        assert_eq!(spec.resolved_id().as_str(), "/covers/lp1.jpg");
    }

    #[test]
    fn explicit_id_wins() {
        let o: MediaOptions = serde_json::from_str(
            r##"{"id": "hero-video", "source": "/hero.mp4", "tier": "critical", "placeholder": "#000"}"##,
        )
        .unwrap();
        let spec = o.spec(ResourceKind::Video);
        assert_eq!(spec.resolved_id().as_str(), "hero-video");
        assert_eq!(spec.kind, ResourceKind::Video);
    }
}
