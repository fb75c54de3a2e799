//! `web-sys` implementations of the engine's node and scale traits

use js_sys::{Function, Reflect};
use plot_tooltip_engine::{
    Axis, CaptureError, DescribeRecord, Matrix, PointerEventKind, PointerHandler, PointerSample,
    PointerTarget, Rect, Registration, ScaleEntry, ScaleHandle, ScaleOwner, ScaleSource,
    SurfaceNode, TooltipResult, TransformKind,
};
use plot_tooltip_shared::tooltip::MARKER_GROUP_LABELS;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomRect, Element, Event, MouseEvent, PointerEvent, SvgGraphicsElement, TouchEvent};

use crate::listeners::{listen, ListenOptions};

/// Property through which a chart exposes its scales
const SCALE_PROPERTY: &str = "scale";

/// Readable message from a thrown JavaScript value
pub(crate) fn js_message(value: &JsValue) -> String {
    match value.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => value.as_string().unwrap_or_else(|| format!("{value:?}")),
    }
}

pub(crate) fn to_rect(rect: &DomRect) -> Rect {
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

/// `g[aria-label="dot"], g[aria-label="line"], ...`
pub(crate) fn marker_group_selector() -> String {
    MARKER_GROUP_LABELS
        .iter()
        .map(|label| format!("g[aria-label=\"{label}\"]"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pointer position from a pointer, touch or mouse event
pub(crate) fn pointer_sample(event: &Event) -> Option<PointerSample> {
    if let Some(pointer) = event.dyn_ref::<PointerEvent>() {
        return Some(PointerSample::new(
            pointer.client_x() as f64,
            pointer.client_y() as f64,
            Some(pointer.pointer_id()),
        ));
    }

    if let Some(touch_event) = event.dyn_ref::<TouchEvent>() {
        let touch = touch_event
            .touches()
            .get(0)
            .or_else(|| touch_event.changed_touches().get(0))?;
        return Some(PointerSample::new(
            touch.client_x() as f64,
            touch.client_y() as f64,
            None,
        ));
    }

    event
        .dyn_ref::<MouseEvent>()
        .map(|mouse| PointerSample::new(mouse.client_x() as f64, mouse.client_y() as f64, None))
}

/// A DOM element acting as root, surface or event container
#[derive(Debug, Clone, PartialEq)]
pub struct DomNode(Element);

impl DomNode {
    pub fn new(element: Element) -> Self {
        Self(element)
    }

    pub fn element(&self) -> &Element {
        &self.0
    }

    /// The `scale` property when it is a function or an object
    fn scale_value(&self) -> Option<JsValue> {
        let value = Reflect::get(&self.0, &JsValue::from_str(SCALE_PROPERTY)).ok()?;
        (value.is_function() || value.is_object()).then_some(value)
    }
}

impl SurfaceNode for DomNode {
    fn is_surface(&self) -> bool {
        self.0.local_name() == "svg"
    }

    fn has_marker_group(&self) -> bool {
        matches!(self.0.query_selector(&marker_group_selector()), Ok(Some(_)))
    }

    fn exposes_scales(&self) -> bool {
        self.scale_value().is_some()
    }

    fn descendant_surfaces(&self) -> Vec<Self> {
        let Ok(list) = self.0.query_selector_all("svg") else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(DomNode)
            .collect()
    }

    fn bounding_rect(&self) -> Rect {
        to_rect(&self.0.get_bounding_client_rect())
    }

    fn inverse_screen_matrix(&self) -> Option<Matrix> {
        let graphics = self.0.dyn_ref::<SvgGraphicsElement>()?;
        let inverse = graphics.get_screen_ctm()?.inverse().ok()?;
        Some(Matrix {
            a: inverse.a() as f64,
            b: inverse.b() as f64,
            c: inverse.c() as f64,
            d: inverse.d() as f64,
            e: inverse.e() as f64,
            f: inverse.f() as f64,
        })
    }

    fn marker_rects(&self, selector: &str) -> Vec<Rect> {
        let list = match self.0.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("Invalid marker selector {selector:?}: {}", js_message(&err));
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| to_rect(&element.get_bounding_client_rect()))
            .collect()
    }
}

impl PointerTarget for DomNode {
    fn listen(
        &self,
        kind: PointerEventKind,
        handler: PointerHandler,
    ) -> TooltipResult<Registration> {
        let options = ListenOptions {
            capture: false,
            passive: kind == PointerEventKind::TouchStart,
        };
        listen(&self.0, kind.event_type(), options, move |event: Event| {
            if let Some(sample) = pointer_sample(&event) {
                handler(sample);
            }
        })
    }

    fn has_pointer_capture(&self, pointer_id: i32) -> bool {
        self.0.has_pointer_capture(pointer_id)
    }

    fn set_pointer_capture(&self, pointer_id: i32) -> Result<(), CaptureError> {
        self.0
            .set_pointer_capture(pointer_id)
            .map_err(|err| CaptureError(js_message(&err)))
    }

    fn release_pointer_capture(&self, pointer_id: i32) -> Result<(), CaptureError> {
        self.0
            .release_pointer_capture(pointer_id)
            .map_err(|err| CaptureError(js_message(&err)))
    }
}

/// A JavaScript scale, already classified
#[derive(Debug, Clone)]
pub struct JsScale {
    /// `this` for method-style scales
    target: JsValue,
    func: Function,
}

impl ScaleHandle<JsValue> for JsScale {
    fn invoke(&self, kind: TransformKind, value: &JsValue) -> Option<f64> {
        let result = match kind {
            TransformKind::Function => self.func.call1(&JsValue::UNDEFINED, value),
            TransformKind::ApplyMethod | TransformKind::ScaleMethod => {
                self.func.call1(&self.target, value)
            }
        };
        result.ok()?.as_f64()
    }
}

/// Sort a scale entry into one of the supported shapes
fn classify(entry: JsValue) -> ScaleEntry<JsScale> {
    if let Some(func) = entry.dyn_ref::<Function>() {
        return ScaleEntry::Function(JsScale {
            target: JsValue::UNDEFINED,
            func: func.clone(),
        });
    }
    if !entry.is_object() {
        return ScaleEntry::Missing;
    }

    for kind in [TransformKind::ApplyMethod, TransformKind::ScaleMethod] {
        let Some(name) = kind.method_name() else {
            continue;
        };
        let method = Reflect::get(&entry, &JsValue::from_str(name))
            .ok()
            .and_then(|m| m.dyn_into::<Function>().ok());
        if let Some(func) = method {
            let scale = JsScale {
                target: entry.clone(),
                func,
            };
            return match kind {
                TransformKind::ApplyMethod => ScaleEntry::ApplyMethod(scale),
                _ => ScaleEntry::ScaleMethod(scale),
            };
        }
    }
    ScaleEntry::Missing
}

impl ScaleOwner for DomNode {
    type Scale = JsScale;

    fn scale_source(&self) -> ScaleSource<JsScale> {
        let Some(value) = self.scale_value() else {
            return ScaleSource::Absent;
        };

        if let Some(lookup) = value.dyn_ref::<Function>() {
            let lookup = lookup.clone();
            let owner = self.0.clone();
            return ScaleSource::Lookup(Box::new(move |axis: Axis| {
                match lookup.call1(&owner, &JsValue::from_str(axis.name())) {
                    Ok(entry) => classify(entry),
                    Err(err) => {
                        log::debug!("scale({:?}) threw: {}", axis.name(), js_message(&err));
                        ScaleEntry::Missing
                    }
                }
            }));
        }

        let entry = |axis: Axis| {
            Reflect::get(&value, &JsValue::from_str(axis.name()))
                .map(classify)
                .unwrap_or(ScaleEntry::Missing)
        };
        ScaleSource::PerAxis {
            x: entry(Axis::X),
            y: entry(Axis::Y),
        }
    }
}

/// A dataset element
#[derive(Debug, Clone)]
pub struct JsRecord(pub JsValue);

impl DescribeRecord for JsRecord {
    fn describe(&self) -> String {
        if let Some(text) = self.0.as_string() {
            return text;
        }
        js_sys::JSON::stringify(&self.0)
            .ok()
            .and_then(|json| json.as_string())
            .unwrap_or_else(|| format!("{:?}", self.0))
    }
}
