//! The tooltip element: a fixed-position `<div>` appended to `document.body`

use plot_tooltip_engine::{OverlayElement, OverlayState, Point, Size, TooltipError, TooltipResult};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::dom::js_message;

fn overlay_error(context: &str, err: &wasm_bindgen::JsValue) -> TooltipError {
    TooltipError::Overlay {
        message: format!("{context}: {}", js_message(err)),
    }
}

#[derive(Debug, Clone)]
pub struct DomOverlay {
    element: HtmlElement,
}

impl DomOverlay {
    /// Create the element hidden and append it to the body
    pub fn create(document: &Document, class_name: &str) -> TooltipResult<Self> {
        let element = document
            .create_element("div")
            .map_err(|err| overlay_error("createElement failed", &err))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| TooltipError::Overlay {
                message: "created element is not an HTMLElement".to_string(),
            })?;
        element.set_class_name(class_name);
        element
            .set_attribute("role", "tooltip")
            .map_err(|err| overlay_error("setAttribute failed", &err))?;

        let overlay = Self { element };
        overlay.set_style("position", "fixed");
        overlay.set_style("left", "0px");
        overlay.set_style("top", "0px");
        overlay.set_style("pointer-events", "none");
        overlay.set_style("z-index", "1000");
        overlay.set_state(OverlayState::Hidden);

        let body = document.body().ok_or_else(|| TooltipError::Overlay {
            message: "document has no body".to_string(),
        })?;
        body.append_child(&overlay.element)
            .map_err(|err| overlay_error("appendChild failed", &err))?;
        Ok(overlay)
    }

    fn set_style(&self, name: &str, value: &str) {
        if let Err(err) = self.element.style().set_property(name, value) {
            log::debug!("Failed to set {name}: {}", js_message(&err));
        }
    }
}

impl OverlayElement for DomOverlay {
    fn set_text(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn set_markup(&self, markup: &str) {
        self.element.set_inner_html(markup);
    }

    fn set_state(&self, state: OverlayState) {
        let (display, visibility) = match state {
            OverlayState::Hidden => ("none", "hidden"),
            OverlayState::Measuring => ("block", "hidden"),
            OverlayState::Visible => ("block", "visible"),
        };
        self.set_style("display", display);
        self.set_style("visibility", visibility);
    }

    fn measure(&self) -> Size {
        let rect = self.element.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    fn set_position(&self, position: Point) {
        self.set_style("left", &format!("{}px", position.x));
        self.set_style("top", &format!("{}px", position.y));
    }

    fn remove(&self) {
        self.element.remove();
    }
}
