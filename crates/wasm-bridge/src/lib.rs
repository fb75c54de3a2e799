//! Browser bindings for the plot tooltip engine
//!
//! Exposes `attachTooltip(root, data, options)` to JavaScript. The returned
//! function detaches the tooltip and may be called any number of times.

use std::sync::Once;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

pub mod animation_frame;
pub mod dom;
pub mod host;
pub mod instance_manager;
pub mod js_options;
pub mod listeners;
pub mod overlay;

use dom::DomNode;
use host::BrowserHost;
use instance_manager::InstanceManager;
use js_options::{dataset_from_js, options_from_js};

static INIT_LOGGING: Once = Once::new();

/// Install the console logger once; later calls do nothing
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        // Another logger may already be installed by the embedding page
        let _ = console_log::init_with_level(log::Level::Info);
    });
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    init_logging();
}

/// Attach a pointer-proximity tooltip to the chart rendered under `root`
///
/// Returns a teardown function. Configuration problems throw before any
/// listener or element is created.
#[wasm_bindgen(js_name = attachTooltip)]
pub fn attach_tooltip(root: Element, data: JsValue, options: JsValue) -> Result<Function, JsValue> {
    init_logging();

    let records = dataset_from_js(&data)?;
    let options = options_from_js(&options)?;
    let host = BrowserHost::new()?;
    let attachment = plot_tooltip_engine::attach(host, DomNode::new(root), records, options)?;

    let id = InstanceManager::register(attachment);
    log::debug!("Registered tooltip {id}");

    let teardown = Closure::wrap(Box::new(move || {
        InstanceManager::teardown(&id);
    }) as Box<dyn FnMut()>);
    Ok(teardown.into_js_value().unchecked_into())
}

/// Number of live tooltip attachments
#[wasm_bindgen(js_name = activeTooltipCount)]
pub fn active_tooltip_count() -> usize {
    InstanceManager::instance_count()
}

/// Tear down every live attachment; returns how many there were
#[wasm_bindgen(js_name = detachAllTooltips)]
pub fn detach_all_tooltips() -> usize {
    InstanceManager::teardown_all()
}

/// Summaries of the live attachments
#[wasm_bindgen(js_name = tooltipInstances)]
pub fn tooltip_instances() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&InstanceManager::summaries()).map_err(|err| err.into())
}
