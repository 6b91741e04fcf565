use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use streaming::descriptor::ResourceKind;
use streaming::driver::PriorityContext;
use streaming::scheduler::Registration;
use streaming::tier::Tier;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

pub mod background;
pub mod config;
pub mod dom;
pub mod loader;
pub mod log;
pub mod media;
pub mod parallax;

use background::BackgroundLoop;
use config::SiteConfig;
use loader::{BrowserLoader, MicrotaskDeferrer};
use media::{MediaOptions, MountedMedia};
use parallax::{MountedParallax, ParallaxOptions};

// Guard to prevent double-initialization of global state (relevant during hot reload).
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_SET: OnceLock<()> = OnceLock::new();

/// Everything the page keeps alive between calls from JS.
struct PageState {
    config: SiteConfig,
    ctx: Option<PriorityContext>,
    media: Vec<MountedMedia>,
    parallax: Vec<MountedParallax>,
    background: Option<BackgroundLoop>,
}

impl PageState {
    fn new() -> Self {
        Self {
            config: SiteConfig::default(),
            ctx: None,
            media: Vec::new(),
            parallax: Vec::new(),
            background: None,
        }
    }

    /// The page's single priority context, created on first use.
    fn context(&mut self) -> PriorityContext {
        let config = &self.config;
        self.ctx
            .get_or_insert_with(|| {
                PriorityContext::new(
                    config.loader.clone(),
                    Rc::new(BrowserLoader),
                    Rc::new(MicrotaskDeferrer),
                )
            })
            .clone()
    }
}

thread_local! {
    static STATE: RefCell<PageState> = RefCell::new(PageState::new());
}

fn with_state<F, R>(f: F) -> Result<R, JsValue>
where
    F: FnOnce(&mut PageState) -> Result<R, JsValue>,
{
    STATE
        .try_with(|state| f(&mut state.borrow_mut()))
        .map_err(|_| JsValue::from_str("page state unavailable"))?
}

fn context() -> Result<PriorityContext, JsValue> {
    with_state(|s| Ok(s.context()))
}

fn init_panic_hook() {
    PANIC_HOOK_SET.get_or_init(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = info.to_string();
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

fn parse_kind(kind: &str) -> Result<ResourceKind, JsValue> {
    ResourceKind::parse(kind).ok_or_else(|| JsValue::from_str(&format!("unknown media kind: {kind}")))
}

fn parse_tier(tier: &str) -> Result<Tier, JsValue> {
    Tier::parse(tier).ok_or_else(|| JsValue::from_str(&format!("unknown tier: {tier}")))
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Avoid double-initialization (can happen during hot-reload edge cases).
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    init_panic_hook();
    log::init(tracing::Level::INFO);
    Ok(())
}

/// Applies a `SiteConfig` JSON document.
///
/// Loader settings only take effect before the first resource is registered;
/// the priority context is page-lifetime and is not rebuilt underneath
/// existing consumers.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = SiteConfig::from_json(json).map_err(|err| {
        log::console_error(&format!("configure: {err}"));
        js_err(err)
    })?;
    with_state(|s| {
        let existing = s
            .ctx
            .as_ref()
            .map(|ctx| (ctx.config() != config.loader, ctx.stats().registered > 0));
        match existing {
            Some((true, true)) => {
                return Err(JsValue::from_str(
                    "loader config cannot change after resources are registered",
                ));
            }
            Some((true, false)) => s.ctx = None,
            _ => {}
        }
        s.config = config;
        Ok(())
    })
}

/// Registers a resource without a DOM consumer. Returns `false` for a
/// duplicate id.
#[wasm_bindgen]
pub fn register_resource(id: &str, source: &str, kind: &str, tier: &str) -> Result<bool, JsValue> {
    let kind = parse_kind(kind)?;
    let tier = parse_tier(tier)?;
    let registration = context()?.register(id, source, kind, tier);
    Ok(registration == Registration::New)
}

/// Promise resolving once the resource has settled. Never rejects for
/// unknown ids.
#[wasm_bindgen]
pub fn preload_resource(id: &str) -> Result<js_sys::Promise, JsValue> {
    let preload = context()?.preload(id);
    Ok(future_to_promise(async move {
        preload.await;
        Ok(JsValue::UNDEFINED)
    }))
}

#[wasm_bindgen]
pub fn is_resource_loaded(id: &str) -> bool {
    context().map(|ctx| ctx.is_loaded(id)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn is_resource_loading(id: &str) -> bool {
    context().map(|ctx| ctx.is_loading(id)).unwrap_or(false)
}

/// Scheduler snapshot as JSON.
#[wasm_bindgen]
pub fn resource_stats() -> Result<String, JsValue> {
    let stats = context()?.stats();
    serde_json::to_string(&stats).map_err(js_err)
}

fn mount_media(element_id: &str, options_json: &str, kind: ResourceKind) -> Result<(), JsValue> {
    let options: MediaOptions = serde_json::from_str(options_json).map_err(js_err)?;
    let host = dom::element_by_id(element_id)?;
    let ctx = context()?;
    let mounted = media::mount(&ctx, host, kind, options)?;
    with_state(|s| {
        s.media.push(mounted);
        Ok(())
    })
}

/// Turns `#element_id` into a priority image. `options_json` is
/// `{"source", "tier", "id"?, "alt"?, "placeholder"?}`.
#[wasm_bindgen]
pub fn mount_priority_image(element_id: &str, options_json: &str) -> Result<(), JsValue> {
    mount_media(element_id, options_json, ResourceKind::Image)
}

#[wasm_bindgen]
pub fn mount_priority_video(element_id: &str, options_json: &str) -> Result<(), JsValue> {
    mount_media(element_id, options_json, ResourceKind::Video)
}

/// Fills `#container_id` with parallax layers. `options_json` is
/// `{"layers": [{"source", "speed", "tier"?}], "placeholder"?}`.
#[wasm_bindgen]
pub fn mount_parallax(container_id: &str, options_json: &str) -> Result<(), JsValue> {
    let options: ParallaxOptions = serde_json::from_str(options_json).map_err(js_err)?;
    let container = dom::element_by_id(container_id)?;
    let ctx = context()?;
    let mounted = parallax::mount(&ctx, container, options)?;
    with_state(|s| {
        s.parallax.push(mounted);
        Ok(())
    })
}

/// Starts (or restarts with the current config) the background blend loop.
#[wasm_bindgen]
pub fn start_background_controller() -> Result<(), JsValue> {
    let config = with_state(|s| Ok(s.config.blend.clone()))?;
    // Drop the old loop before starting so only one writer exists.
    with_state(|s| {
        s.background = None;
        Ok(())
    })?;
    let running = BackgroundLoop::start(config)?;
    with_state(|s| {
        s.background = Some(running);
        Ok(())
    })
}

/// Tears down every consumer and the background loop (e.g. on navigation).
#[wasm_bindgen]
pub fn unmount_all() -> Result<(), JsValue> {
    let (media, parallax, background) = with_state(|s| {
        Ok((
            std::mem::take(&mut s.media),
            std::mem::take(&mut s.parallax),
            s.background.take(),
        ))
    })?;
    drop((media, parallax, background));
    Ok(())
}
