//! In-memory host used by the integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use plot_tooltip_engine::{
    CaptureError, ManualScheduler, Matrix, OverlayElement, OverlayState, Point, PointerEventKind,
    PointerHandler, PointerSample, PointerTarget, Rect, Registration, ScaleEntry, ScaleHandle,
    ScaleOwner, ScaleSource, Size, SurfaceNode, TooltipHost, TooltipResult, TransformKind,
    ViewportHandler,
};
use serde_json::{json, Value};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A `value -> pixel` function
#[derive(Clone)]
pub struct FakeScale(pub Rc<dyn Fn(f64) -> f64>);

impl FakeScale {
    pub fn identity() -> Self {
        FakeScale(Rc::new(|v| v))
    }

    pub fn linear(factor: f64, offset: f64) -> Self {
        FakeScale(Rc::new(move |v| v * factor + offset))
    }
}

impl ScaleHandle<f64> for FakeScale {
    fn invoke(&self, _kind: TransformKind, value: &f64) -> Option<f64> {
        Some((self.0)(*value))
    }
}

/// How a fake node exposes scales
#[derive(Clone)]
pub enum FakeScales {
    Absent,
    /// `node.scale("x")` returning objects with `apply`
    Lookup(FakeScale, FakeScale),
    /// `node.scale = {x, y}` holding plain functions
    Record(FakeScale, FakeScale),
}

type Listener = (u64, PointerEventKind, PointerHandler);

pub struct NodeData {
    pub name: String,
    pub surface: bool,
    pub marker_group: bool,
    pub scales: RefCell<FakeScales>,
    pub children: RefCell<Vec<FakeNode>>,
    pub bounds: Cell<Rect>,
    pub inverse: Cell<Option<Matrix>>,
    pub markers: RefCell<HashMap<String, Vec<Rect>>>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
    pub captured: RefCell<HashSet<i32>>,
    pub capture_fails: Cell<bool>,
    pub capture_attempts: Cell<u32>,
    pub release_attempts: Cell<u32>,
    pub fail_listen: Cell<bool>,
}

#[derive(Clone)]
pub struct FakeNode(pub Rc<NodeData>);

impl FakeNode {
    fn build(name: &str, surface: bool, marker_group: bool) -> Self {
        FakeNode(Rc::new(NodeData {
            name: name.to_string(),
            surface,
            marker_group,
            scales: RefCell::new(FakeScales::Absent),
            children: RefCell::new(Vec::new()),
            bounds: Cell::new(Rect::new(0.0, 0.0, 640.0, 400.0)),
            inverse: Cell::new(None),
            markers: RefCell::new(HashMap::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            captured: RefCell::new(HashSet::new()),
            capture_fails: Cell::new(false),
            capture_attempts: Cell::new(0),
            release_attempts: Cell::new(0),
            fail_listen: Cell::new(false),
        }))
    }

    /// An `<svg>` with a marker group
    pub fn plot(name: &str) -> Self {
        Self::build(name, true, true)
    }

    /// An `<svg>` without markers, such as a legend
    pub fn legend(name: &str) -> Self {
        Self::build(name, true, false)
    }

    /// A non-surface container (`<figure>` / `<div>`)
    pub fn wrapper(name: &str, children: Vec<FakeNode>) -> Self {
        let node = Self::build(name, false, false);
        *node.0.children.borrow_mut() = children;
        node
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn with_scales(self, scales: FakeScales) -> Self {
        *self.0.scales.borrow_mut() = scales;
        self
    }

    pub fn set_markers(&self, selector: &str, rects: Vec<Rect>) {
        self.0
            .markers
            .borrow_mut()
            .insert(selector.to_string(), rects);
    }

    pub fn listener_count(&self) -> usize {
        self.0.listeners.borrow().len()
    }

    pub fn dispatch(&self, kind: PointerEventKind, sample: PointerSample) {
        let handlers: Vec<PointerHandler> = self
            .0
            .listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(sample);
        }
    }

    pub fn enter(&self, x: f64, y: f64) {
        self.dispatch(PointerEventKind::Enter, PointerSample::new(x, y, Some(1)));
    }

    pub fn move_to(&self, x: f64, y: f64) {
        self.dispatch(PointerEventKind::Move, PointerSample::new(x, y, Some(1)));
    }

    pub fn leave(&self, x: f64, y: f64) {
        self.dispatch(PointerEventKind::Leave, PointerSample::new(x, y, Some(1)));
    }

    pub fn touch(&self, x: f64, y: f64) {
        self.dispatch(PointerEventKind::TouchStart, PointerSample::new(x, y, None));
    }

    pub fn has_capture(&self, id: i32) -> bool {
        self.0.captured.borrow().contains(&id)
    }
}

impl PartialEq for FakeNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for FakeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FakeNode({})", self.0.name)
    }
}

impl SurfaceNode for FakeNode {
    fn is_surface(&self) -> bool {
        self.0.surface
    }

    fn has_marker_group(&self) -> bool {
        self.0.marker_group
    }

    fn exposes_scales(&self) -> bool {
        !matches!(*self.0.scales.borrow(), FakeScales::Absent)
    }

    fn descendant_surfaces(&self) -> Vec<Self> {
        self.0
            .children
            .borrow()
            .iter()
            .filter(|c| c.0.surface)
            .cloned()
            .collect()
    }

    fn bounding_rect(&self) -> Rect {
        self.0.bounds.get()
    }

    fn inverse_screen_matrix(&self) -> Option<Matrix> {
        self.0.inverse.get()
    }

    fn marker_rects(&self, selector: &str) -> Vec<Rect> {
        self.0
            .markers
            .borrow()
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }
}

impl PointerTarget for FakeNode {
    fn listen(
        &self,
        kind: PointerEventKind,
        handler: PointerHandler,
    ) -> TooltipResult<Registration> {
        if self.0.fail_listen.get() && !self.0.listeners.borrow().is_empty() {
            return Err(plot_tooltip_engine::TooltipError::JsInterop {
                message: "listener rejected".to_string(),
            });
        }
        let id = self.0.next_listener.get() + 1;
        self.0.next_listener.set(id);
        self.0.listeners.borrow_mut().push((id, kind, handler));

        let data = Rc::downgrade(&self.0);
        Ok(Registration::new(move || {
            if let Some(data) = data.upgrade() {
                data.listeners.borrow_mut().retain(|(lid, _, _)| *lid != id);
            }
        }))
    }

    fn has_pointer_capture(&self, pointer_id: i32) -> bool {
        self.has_capture(pointer_id)
    }

    fn set_pointer_capture(&self, pointer_id: i32) -> Result<(), CaptureError> {
        self.0.capture_attempts.set(self.0.capture_attempts.get() + 1);
        if self.0.capture_fails.get() {
            return Err(CaptureError("NotFoundError".to_string()));
        }
        self.0.captured.borrow_mut().insert(pointer_id);
        Ok(())
    }

    fn release_pointer_capture(&self, pointer_id: i32) -> Result<(), CaptureError> {
        self.0.release_attempts.set(self.0.release_attempts.get() + 1);
        self.0.captured.borrow_mut().remove(&pointer_id);
        Ok(())
    }
}

impl ScaleOwner for FakeNode {
    type Scale = FakeScale;

    fn scale_source(&self) -> ScaleSource<FakeScale> {
        match self.0.scales.borrow().clone() {
            FakeScales::Absent => ScaleSource::Absent,
            FakeScales::Lookup(x, y) => ScaleSource::Lookup(Box::new(move |axis: plot_tooltip_engine::Axis| match axis {
                plot_tooltip_engine::Axis::X => ScaleEntry::ApplyMethod(x.clone()),
                plot_tooltip_engine::Axis::Y => ScaleEntry::ApplyMethod(y.clone()),
            })),
            FakeScales::Record(x, y) => ScaleSource::PerAxis {
                x: ScaleEntry::Function(x),
                y: ScaleEntry::Function(y),
            },
        }
    }
}

#[derive(Default)]
pub struct OverlayData {
    pub class_name: String,
    pub text: RefCell<Option<String>>,
    pub markup: RefCell<Option<String>>,
    pub state: Cell<Option<OverlayState>>,
    pub position: Cell<Option<Point>>,
    pub size: Cell<Size>,
    pub measured_with: RefCell<Vec<(String, Option<OverlayState>)>>,
    pub removed: Cell<u32>,
}

#[derive(Clone)]
pub struct FakeOverlay(pub Rc<OverlayData>);

impl FakeOverlay {
    pub fn content(&self) -> String {
        self.0
            .markup
            .borrow()
            .clone()
            .or_else(|| self.0.text.borrow().clone())
            .unwrap_or_default()
    }

    pub fn is_shown(&self) -> bool {
        self.0.state.get() == Some(OverlayState::Visible)
    }
}

impl OverlayElement for FakeOverlay {
    fn set_text(&self, text: &str) {
        *self.0.markup.borrow_mut() = None;
        *self.0.text.borrow_mut() = Some(text.to_string());
    }

    fn set_markup(&self, markup: &str) {
        *self.0.text.borrow_mut() = None;
        *self.0.markup.borrow_mut() = Some(markup.to_string());
    }

    fn set_state(&self, state: OverlayState) {
        self.0.state.set(Some(state));
    }

    fn measure(&self) -> Size {
        let content = self.content();
        self.0
            .measured_with
            .borrow_mut()
            .push((content, self.0.state.get()));
        self.0.size.get()
    }

    fn set_position(&self, position: Point) {
        self.0.position.set(Some(position));
    }

    fn remove(&self) {
        self.0.removed.set(self.0.removed.get() + 1);
    }
}

type WindowListener = (u64, &'static str, ViewportHandler);

#[derive(Clone)]
pub struct FakeHost {
    pub viewport: Rc<Cell<Size>>,
    pub scheduler: ManualScheduler,
    pub overlays: Rc<RefCell<Vec<FakeOverlay>>>,
    pub overlay_size: Size,
    window_listeners: Rc<RefCell<Vec<WindowListener>>>,
    next_listener: Rc<Cell<u64>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            viewport: Rc::new(Cell::new(Size::new(1024.0, 768.0))),
            scheduler: ManualScheduler::new(),
            overlays: Rc::new(RefCell::new(Vec::new())),
            overlay_size: Size::new(80.0, 24.0),
            window_listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener: Rc::new(Cell::new(0)),
        }
    }
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay(&self) -> FakeOverlay {
        self.overlays
            .borrow()
            .last()
            .cloned()
            .expect("no overlay was created")
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.borrow().len()
    }

    pub fn window_listener_count(&self) -> usize {
        self.window_listeners.borrow().len()
    }

    pub fn fire_window(&self, event: &str) {
        let handlers: Vec<ViewportHandler> = self
            .window_listeners
            .borrow()
            .iter()
            .filter(|(_, e, _)| *e == event)
            .map(|(_, _, h)| h.clone())
            .collect();
        for handler in handlers {
            handler();
        }
    }

    pub fn run_frame(&self) -> usize {
        self.scheduler.run_frame()
    }
}

impl TooltipHost for FakeHost {
    type Record = Value;
    type Value = f64;
    type Node = FakeNode;
    type Scale = FakeScale;
    type Overlay = FakeOverlay;
    type Scheduler = ManualScheduler;

    fn viewport_size(&self) -> Size {
        self.viewport.get()
    }

    fn create_overlay(&self, class_name: &str) -> TooltipResult<FakeOverlay> {
        let overlay = FakeOverlay(Rc::new(OverlayData {
            class_name: class_name.to_string(),
            ..Default::default()
        }));
        overlay.0.size.set(self.overlay_size);
        self.overlays.borrow_mut().push(overlay.clone());
        Ok(overlay)
    }

    fn scheduler(&self) -> ManualScheduler {
        self.scheduler.clone()
    }

    fn on_viewport_change(&self, handler: ViewportHandler) -> TooltipResult<Vec<Registration>> {
        let mut registrations = Vec::new();
        for event in ["resize", "scroll"] {
            let id = self.next_listener.get() + 1;
            self.next_listener.set(id);
            self.window_listeners
                .borrow_mut()
                .push((id, event, handler.clone()));

            let listeners = Rc::downgrade(&self.window_listeners);
            registrations.push(Registration::new(move || {
                if let Some(listeners) = listeners.upgrade() {
                    listeners.borrow_mut().retain(|(lid, _, _)| *lid != id);
                }
            }));
        }
        Ok(registrations)
    }
}

/// `{x: i, y: i, label: "point i"}` for `i in 0..n`
pub fn diagonal_records(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({"x": i as f64, "y": i as f64, "label": format!("point {i}")}))
        .collect()
}

/// Markers spaced 100px apart along the diagonal, 8px square
pub fn diagonal_markers(n: usize) -> Vec<Rect> {
    (0..n)
        .map(|i| {
            let c = 100.0 * (i as f64 + 1.0);
            Rect::new(c - 4.0, c - 4.0, 8.0, 8.0)
        })
        .collect()
}
