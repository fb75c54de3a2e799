//! Interaction controller: attachment, event handling and teardown
//!
//! Event handlers and frame tasks hold weak references to the controller, so
//! dropping the [`Attachment`] frees everything even if a host keeps a
//! listener alive longer than expected.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use plot_tooltip_shared::{
    CoordinateMode, PointerEventKind, PointerSample, TooltipError, TooltipResult, TooltipSettings,
};
use serde::{Deserialize, Serialize};

use crate::host::{PointerTarget, Registration, SurfaceNode, TooltipHost};
use crate::options::TooltipOptions;
use crate::point_index::{reconcile_counts, sample_markers, CountMismatch, PointIndex};
use crate::presenter::{ContentRenderer, TooltipPresenter};
use crate::scales::CoordinateAdapter;
use crate::scheduler::FrameThrottle;
use crate::search::to_surface_local;
use crate::surface::resolve_surface;

/// Coordinate strategy chosen at attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TooltipMode {
    Scales,
    Elements,
}

/// Non-fatal conditions found while attaching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachWarning {
    CountMismatch(CountMismatch),
}

/// Interaction counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionStats {
    /// Frame evaluations that ran a search
    pub evaluations: u64,
    /// Evaluations that found a datum
    pub matches: u64,
    /// Moves dropped because a frame was already pending
    pub coalesced_moves: u64,
    /// DOM mode index rebuilds after attachment
    pub index_rebuilds: u64,
}

#[derive(Debug, Default)]
struct InteractionState {
    inside: bool,
    latest: Option<PointerSample>,
    captured: Option<i32>,
    active: Option<usize>,
}

struct Controller<H: TooltipHost> {
    host: H,
    container: H::Node,
    surface: H::Node,
    records: Vec<H::Record>,
    mode: TooltipMode,
    /// Selector that matched at attachment (DOM mode)
    marker_selector: String,
    settings: TooltipSettings,
    index: RefCell<PointIndex>,
    renderer: ContentRenderer<H::Record>,
    presenter: RefCell<TooltipPresenter<H::Overlay>>,
    throttle: FrameThrottle<H::Scheduler>,
    state: RefCell<InteractionState>,
    registrations: RefCell<Vec<Registration>>,
    warnings: Vec<AttachWarning>,
    stats: Cell<InteractionStats>,
    torn_down: Cell<bool>,
}

/// A live tooltip attachment
///
/// Dropping it tears it down.
#[must_use = "dropping an Attachment tears the tooltip down immediately"]
pub struct Attachment<H: TooltipHost> {
    controller: Rc<Controller<H>>,
}

/// Attach a tooltip to the chart under `root`
///
/// All configuration errors are reported before any listener is installed or
/// overlay created.
pub fn attach<H: TooltipHost>(
    host: H,
    root: H::Node,
    records: Vec<H::Record>,
    options: TooltipOptions<H>,
) -> TooltipResult<Attachment<H>> {
    let settings = options.settings.clone();
    settings.validate()?;

    let accessors = options.accessor_pair()?;
    if settings.mode == CoordinateMode::Scales && accessors.is_none() {
        return Err(TooltipError::missing_accessor("x"));
    }
    let scales_eligible = settings.mode != CoordinateMode::Elements && accessors.is_some();

    let surface = resolve_surface(&root, scales_eligible)?;

    let adapter = if scales_eligible {
        CoordinateAdapter::resolve(&root, &surface)
    } else {
        None
    };
    if settings.mode == CoordinateMode::Scales && adapter.is_none() {
        return Err(TooltipError::ScalesUnavailable);
    }

    let mut records = records;
    let mut warnings = Vec::new();
    let (mode, index, marker_selector) = match (adapter, accessors) {
        (Some(adapter), Some((x, y))) => {
            log::debug!("Using scale mode, scales found on {:?}", adapter.origin);
            let index = PointIndex::from_scales(&records, &x, &y, &adapter);
            (TooltipMode::Scales, index, String::new())
        }
        _ => {
            let (mut rects, selector) = sample_markers(&surface, settings.marker_selector())?;
            if let Some(mismatch) = reconcile_counts(&mut records, &mut rects) {
                log::warn!(
                    "Found {} markers for {} records, using the first {}",
                    mismatch.markers,
                    mismatch.records,
                    mismatch.shared_len()
                );
                warnings.push(AttachWarning::CountMismatch(mismatch));
            }
            log::debug!("Using element mode with selector {selector:?}");
            let index = PointIndex::from_marker_rects(&rects, records.len());
            (TooltipMode::Elements, index, selector)
        }
    };

    let overlay = host.create_overlay(&settings.class_name)?;
    let presenter = TooltipPresenter::new(overlay, &settings);
    let container = options.container.unwrap_or(root);

    let controller = Rc::new(Controller {
        throttle: FrameThrottle::new(host.scheduler()),
        host,
        container,
        surface,
        records,
        mode,
        marker_selector,
        index: RefCell::new(index),
        renderer: ContentRenderer::new(options.text, options.html, settings.allow_html),
        presenter: RefCell::new(presenter),
        settings,
        state: RefCell::new(InteractionState::default()),
        registrations: RefCell::new(Vec::new()),
        warnings,
        stats: Cell::new(InteractionStats::default()),
        torn_down: Cell::new(false),
    });

    if let Err(err) = controller.subscribe() {
        controller.teardown();
        return Err(err);
    }

    log::info!(
        "Tooltip attached in {:?} mode over {} records",
        controller.mode,
        controller.records.len()
    );
    Ok(Attachment { controller })
}

impl<H: TooltipHost> Controller<H> {
    fn subscribe(self: &Rc<Self>) -> TooltipResult<()> {
        for kind in PointerEventKind::ALL {
            let weak = Rc::downgrade(self);
            let registration = self.container.listen(
                kind,
                Rc::new(move |sample: PointerSample| {
                    if let Some(controller) = weak.upgrade() {
                        controller.handle_pointer(kind, sample);
                    }
                }),
            )?;
            self.registrations.borrow_mut().push(registration);
        }

        if self.mode == TooltipMode::Elements {
            let weak = Rc::downgrade(self);
            let registrations = self.host.on_viewport_change(Rc::new(move || {
                if let Some(controller) = weak.upgrade() {
                    controller.refresh_index();
                }
            }))?;
            self.registrations.borrow_mut().extend(registrations);
        }
        Ok(())
    }

    fn handle_pointer(self: &Rc<Self>, kind: PointerEventKind, sample: PointerSample) {
        if self.torn_down.get() {
            return;
        }
        match kind {
            PointerEventKind::Enter => {
                self.enter(sample);
            }
            PointerEventKind::TouchStart => {
                self.enter(sample);
                self.schedule_evaluation();
            }
            PointerEventKind::Move => {
                {
                    let mut state = self.state.borrow_mut();
                    state.inside = true;
                    state.latest = Some(sample);
                }
                if !self.schedule_evaluation() {
                    self.bump(|stats| stats.coalesced_moves += 1);
                }
            }
            PointerEventKind::Leave => self.leave(sample),
        }
    }

    fn enter(&self, sample: PointerSample) {
        {
            let mut state = self.state.borrow_mut();
            state.inside = true;
            state.latest = Some(sample);
        }
        self.refresh_index();
    }

    fn leave(&self, sample: PointerSample) {
        {
            let mut state = self.state.borrow_mut();
            state.inside = false;
            state.active = None;
        }
        self.presenter.borrow_mut().hide();
        self.release_capture(sample.pointer_id);
    }

    fn schedule_evaluation(self: &Rc<Self>) -> bool {
        let weak: Weak<Self> = Rc::downgrade(self);
        self.throttle.schedule(Box::new(move || {
            if let Some(controller) = weak.upgrade() {
                controller.run_frame();
            }
        }))
    }

    fn run_frame(&self) {
        self.throttle.begin_frame();
        if self.torn_down.get() {
            return;
        }

        let (inside, latest) = {
            let state = self.state.borrow();
            (state.inside, state.latest)
        };
        let Some(sample) = latest.filter(|_| inside) else {
            return;
        };

        let hit = self.search(sample);
        self.bump(|stats| stats.evaluations += 1);

        match hit {
            Some(index) => self.show_match(index, sample),
            None => self.clear_match(sample),
        }
    }

    fn search(&self, sample: PointerSample) -> Option<usize> {
        let pointer = match self.mode {
            TooltipMode::Scales => to_surface_local(
                sample.position(),
                self.surface.inverse_screen_matrix(),
                self.surface.bounding_rect(),
            ),
            TooltipMode::Elements => sample.position(),
        };
        self.index
            .borrow()
            .nearest_within(pointer, self.settings.hit_radius)
    }

    fn show_match(&self, index: usize, sample: PointerSample) {
        let Some(record) = self.records.get(index) else {
            return;
        };
        let content = match self.renderer.render(record, index) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("Tooltip content failed for record {index}: {err}");
                self.clear_match(sample);
                return;
            }
        };
        // The content callback may have detached us
        if self.torn_down.get() {
            return;
        }

        let viewport = self.host.viewport_size();
        self.presenter
            .borrow_mut()
            .show(&content, sample.position(), viewport);
        self.state.borrow_mut().active = Some(index);
        self.bump(|stats| stats.matches += 1);

        if self.settings.capture {
            if let Some(pointer_id) = sample.pointer_id {
                self.acquire_capture(pointer_id);
            }
        }
    }

    fn clear_match(&self, sample: PointerSample) {
        self.state.borrow_mut().active = None;
        self.presenter.borrow_mut().hide();
        self.release_capture(sample.pointer_id);
    }

    fn acquire_capture(&self, pointer_id: i32) {
        if self.state.borrow().captured == Some(pointer_id)
            || self.container.has_pointer_capture(pointer_id)
        {
            return;
        }
        match self.container.set_pointer_capture(pointer_id) {
            Ok(()) => self.state.borrow_mut().captured = Some(pointer_id),
            Err(err) => log::debug!("Ignoring {err}"),
        }
    }

    /// Release our capture if `pointer_id` is the captured one (or unknown)
    fn release_capture(&self, pointer_id: Option<i32>) {
        let captured = {
            let mut state = self.state.borrow_mut();
            match (state.captured, pointer_id) {
                (Some(held), Some(id)) if held != id => return,
                _ => state.captured.take(),
            }
        };
        if let Some(held) = captured {
            if self.container.has_pointer_capture(held) {
                if let Err(err) = self.container.release_pointer_capture(held) {
                    log::debug!("Ignoring {err}");
                }
            }
        }
    }

    /// Re-measure markers; scale mode indices never change
    fn refresh_index(&self) {
        if self.mode != TooltipMode::Elements || self.torn_down.get() {
            return;
        }

        let rects = self.surface.marker_rects(&self.marker_selector);
        let len = self.records.len();
        if rects.is_empty() {
            log::warn!("Marker refresh with {:?} found nothing", self.marker_selector);
        } else if rects.len() != len {
            log::warn!("Marker refresh found {} markers for {len} records", rects.len());
        }

        *self.index.borrow_mut() = PointIndex::from_marker_rects(&rects, len);
        self.bump(|stats| stats.index_rebuilds += 1);
        log::debug!("Rebuilt marker index ({len} points)");
    }

    fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }

        let registrations = std::mem::take(&mut *self.registrations.borrow_mut());
        drop(registrations);

        self.throttle.cancel();
        self.release_capture(None);
        self.state.borrow_mut().active = None;
        self.presenter.borrow_mut().remove();
        log::info!("Tooltip detached");
    }

    fn bump(&self, update: impl FnOnce(&mut InteractionStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

impl<H: TooltipHost> Attachment<H> {
    /// Remove listeners, cancel pending work, release capture and remove the overlay
    ///
    /// Safe to call any number of times.
    pub fn teardown(&self) {
        self.controller.teardown();
    }

    pub fn is_torn_down(&self) -> bool {
        self.controller.torn_down.get()
    }

    pub fn mode(&self) -> TooltipMode {
        self.controller.mode
    }

    /// Length of the point index; always equals [`Attachment::dataset_len`]
    pub fn point_count(&self) -> usize {
        self.controller.index.borrow().len()
    }

    pub fn dataset_len(&self) -> usize {
        self.controller.records.len()
    }

    pub fn warnings(&self) -> &[AttachWarning] {
        &self.controller.warnings
    }

    pub fn is_visible(&self) -> bool {
        self.controller.presenter.borrow().is_visible()
    }

    /// Index of the record currently shown, if any
    pub fn active_index(&self) -> Option<usize> {
        self.controller.state.borrow().active
    }

    pub fn captured_pointer(&self) -> Option<i32> {
        self.controller.state.borrow().captured
    }

    pub fn stats(&self) -> InteractionStats {
        self.controller.stats.get()
    }

    pub fn point_index(&self) -> PointIndex {
        self.controller.index.borrow().clone()
    }

    pub fn container(&self) -> &H::Node {
        &self.controller.container
    }

    pub fn surface(&self) -> &H::Node {
        &self.controller.surface
    }
}

impl<H: TooltipHost> Drop for Attachment<H> {
    fn drop(&mut self) {
        self.controller.teardown();
    }
}
