//! The browser [`TooltipHost`]

use std::rc::Rc;

use plot_tooltip_engine::{
    Registration, Size, TooltipError, TooltipHost, TooltipResult, ViewportHandler,
};
use wasm_bindgen::JsValue;
use web_sys::{Document, Window};

use crate::animation_frame::AnimationFrameScheduler;
use crate::dom::{DomNode, JsRecord, JsScale};
use crate::listeners::{listen, ListenOptions};
use crate::overlay::DomOverlay;

#[derive(Debug, Clone)]
pub struct BrowserHost {
    window: Window,
    document: Document,
}

impl BrowserHost {
    pub fn new() -> TooltipResult<Self> {
        let window = web_sys::window().ok_or_else(|| TooltipError::JsInterop {
            message: "no global window".to_string(),
        })?;
        let document = window.document().ok_or_else(|| TooltipError::JsInterop {
            message: "window has no document".to_string(),
        })?;
        Ok(Self { window, document })
    }

    fn window_extent(value: Result<JsValue, JsValue>) -> Option<f64> {
        value.ok().and_then(|v| v.as_f64())
    }
}

impl TooltipHost for BrowserHost {
    type Record = JsRecord;
    type Value = JsValue;
    type Node = DomNode;
    type Scale = JsScale;
    type Overlay = DomOverlay;
    type Scheduler = AnimationFrameScheduler;

    fn viewport_size(&self) -> Size {
        let root = self.document.document_element();
        let width = Self::window_extent(self.window.inner_width())
            .or_else(|| root.as_ref().map(|el| el.client_width() as f64))
            .unwrap_or(0.0);
        let height = Self::window_extent(self.window.inner_height())
            .or_else(|| root.as_ref().map(|el| el.client_height() as f64))
            .unwrap_or(0.0);
        Size::new(width, height)
    }

    fn create_overlay(&self, class_name: &str) -> TooltipResult<DomOverlay> {
        DomOverlay::create(&self.document, class_name)
    }

    fn scheduler(&self) -> AnimationFrameScheduler {
        AnimationFrameScheduler::new(self.window.clone())
    }

    fn on_viewport_change(&self, handler: ViewportHandler) -> TooltipResult<Vec<Registration>> {
        let on_resize = Rc::clone(&handler);
        let resize = listen(
            &self.window,
            "resize",
            ListenOptions {
                capture: false,
                passive: true,
            },
            move |_| on_resize(),
        )?;

        // Capture phase so scrolling any ancestor counts, not just the page
        let scroll = listen(
            &self.window,
            "scroll",
            ListenOptions {
                capture: true,
                passive: true,
            },
            move |_| handler(),
        )?;

        Ok(vec![resize, scroll])
    }
}
