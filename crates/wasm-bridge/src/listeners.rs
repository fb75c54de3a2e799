//! Event listeners owned by a [`Registration`]
//!
//! The closure handed to `addEventListener` lives inside the registration and
//! is dropped right after `removeEventListener`, so a released listener can
//! never call back into freed Rust state.

use plot_tooltip_engine::{Registration, TooltipError, TooltipResult};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

use crate::dom::js_message;

#[derive(Debug, Clone, Copy, Default)]
pub struct ListenOptions {
    pub capture: bool,
    pub passive: bool,
}

/// Add `handler` for `event_type` on `target`
pub fn listen(
    target: &EventTarget,
    event_type: &'static str,
    options: ListenOptions,
    handler: impl FnMut(Event) + 'static,
) -> TooltipResult<Registration> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);

    let js_options = AddEventListenerOptions::new();
    js_options.set_capture(options.capture);
    js_options.set_passive(options.passive);

    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event_type,
            closure.as_ref().unchecked_ref(),
            &js_options,
        )
        .map_err(|err| TooltipError::JsInterop {
            message: format!("addEventListener({event_type}) failed: {}", js_message(&err)),
        })?;

    let target = target.clone();
    Ok(Registration::new(move || {
        if let Err(err) = target.remove_event_listener_with_callback_and_bool(
            event_type,
            closure.as_ref().unchecked_ref(),
            options.capture,
        ) {
            log::debug!("removeEventListener({event_type}) failed: {}", js_message(&err));
        }
        drop(closure);
    }))
}
