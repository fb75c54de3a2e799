//! Conversion of the JavaScript `options` object and dataset

use js_sys::{Array, Function, Object, Reflect};
use plot_tooltip_engine::{AccessorError, DescribeRecord, TooltipError, TooltipOptions, TooltipResult};
use plot_tooltip_shared::TooltipSettings;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use crate::dom::{js_message, DomNode, JsRecord};
use crate::host::BrowserHost;

/// Option keys that hold functions or nodes rather than settings
const CALLBACK_KEYS: [&str; 5] = ["x", "y", "text", "html", "container"];

fn is_absent(value: &JsValue) -> bool {
    value.is_undefined() || value.is_null()
}

/// The dataset as records; anything but an array is rejected
pub fn dataset_from_js(data: &JsValue) -> TooltipResult<Vec<JsRecord>> {
    if !Array::is_array(data) {
        return Err(TooltipError::InvalidDataset {
            message: "data must be an array".to_string(),
        });
    }
    Ok(Array::from(data).iter().map(JsRecord).collect())
}

/// Plain settings from `options`, ignoring callbacks and the container
pub fn settings_from_js(options: &JsValue) -> TooltipResult<TooltipSettings> {
    if is_absent(options) {
        return Ok(TooltipSettings::default());
    }
    if !options.is_object() {
        return Err(TooltipError::InvalidConfig {
            message: "options must be an object".to_string(),
            field: None,
        });
    }

    let plain = Object::new();
    for entry in Object::entries(options.unchecked_ref::<Object>()).iter() {
        let entry = Array::from(&entry);
        let key = entry.get(0);
        let is_callback = key
            .as_string()
            .is_some_and(|key| CALLBACK_KEYS.contains(&key.as_str()));
        if !is_callback {
            Reflect::set(&plain, &key, &entry.get(1))?;
        }
    }

    serde_wasm_bindgen::from_value(plain.into()).map_err(|err| TooltipError::InvalidConfig {
        message: format!("Failed to parse settings: {err}"),
        field: None,
    })
}

fn function_field(options: &JsValue, name: &str) -> TooltipResult<Option<Function>> {
    if is_absent(options) {
        return Ok(None);
    }
    let value = Reflect::get(options, &JsValue::from_str(name))?;
    if is_absent(&value) {
        return Ok(None);
    }
    value
        .dyn_into::<Function>()
        .map(Some)
        .map_err(|_| TooltipError::invalid_config(name, "must be a function"))
}

/// Call `func(record, index)`
fn call_with_record(func: &Function, record: &JsRecord, index: usize) -> Result<JsValue, AccessorError> {
    func.call2(&JsValue::UNDEFINED, &record.0, &JsValue::from(index as u32))
        .map_err(|err| AccessorError::new(js_message(&err)))
}

fn content_string(value: JsValue) -> String {
    match value.as_string() {
        Some(text) => text,
        None if is_absent(&value) => String::new(),
        None => JsRecord(value).describe(),
    }
}

/// Full engine options from the JavaScript `options` object
pub fn options_from_js(options: &JsValue) -> TooltipResult<TooltipOptions<BrowserHost>> {
    let mut parsed = TooltipOptions::new().settings(settings_from_js(options)?);

    if let Some(x) = function_field(options, "x")? {
        parsed = parsed.x(move |record: &JsRecord, index| call_with_record(&x, record, index));
    }
    if let Some(y) = function_field(options, "y")? {
        parsed = parsed.y(move |record: &JsRecord, index| call_with_record(&y, record, index));
    }
    if let Some(text) = function_field(options, "text")? {
        parsed = parsed.text(move |record: &JsRecord, index| {
            call_with_record(&text, record, index).map(content_string)
        });
    }
    if let Some(html) = function_field(options, "html")? {
        parsed = parsed.html(move |record: &JsRecord, index| {
            call_with_record(&html, record, index).map(content_string)
        });
    }

    if !is_absent(options) {
        let container = Reflect::get(options, &JsValue::from_str("container"))?;
        if !is_absent(&container) {
            let element = container
                .dyn_into::<Element>()
                .map_err(|_| TooltipError::invalid_config("container", "must be an element"))?;
            parsed = parsed.container(DomNode::new(element));
        }
    }

    Ok(parsed)
}
