//! Host abstraction: everything the engine needs from the document
//!
//! The browser host implements these traits over `web-sys`; tests implement
//! them with in-memory fakes.

use std::rc::Rc;

use plot_tooltip_shared::{
    Matrix, Point, PointerEventKind, PointerSample, Rect, Size, TooltipResult,
};
use thiserror::Error;

use crate::options::DescribeRecord;
use crate::scales::{ScaleHandle, ScaleOwner};
use crate::scheduler::FrameScheduler;

pub type PointerHandler = Rc<dyn Fn(PointerSample)>;
pub type ViewportHandler = Rc<dyn Fn()>;

/// An event subscription that is undone exactly once, on `release` or drop
pub struct Registration {
    release: Option<Box<dyn FnOnce()>>,
}

impl Registration {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Pointer capture was rejected or is unsupported
#[derive(Error, Debug, Clone, PartialEq)]
#[error("pointer capture failed: {0}")]
pub struct CaptureError(pub String);

/// A node that may be (or contain) a chart surface
pub trait SurfaceNode: Clone {
    /// Whether this node is itself a drawing surface (an `<svg>`)
    fn is_surface(&self) -> bool;

    /// Whether this node contains a recognized marker group
    fn has_marker_group(&self) -> bool;

    /// Whether this node exposes scale / coordinate-transform accessors
    fn exposes_scales(&self) -> bool;

    /// Descendant surfaces in document order
    fn descendant_surfaces(&self) -> Vec<Self>;

    /// Bounding rectangle in viewport coordinates
    fn bounding_rect(&self) -> Rect;

    /// Inverse of the node's screen transform, if the platform provides one
    fn inverse_screen_matrix(&self) -> Option<Matrix>;

    /// Viewport rectangles of descendants matching `selector`, in document order
    fn marker_rects(&self, selector: &str) -> Vec<Rect>;
}

/// A node that receives pointer events and supports pointer capture
pub trait PointerTarget {
    fn listen(
        &self,
        kind: PointerEventKind,
        handler: PointerHandler,
    ) -> TooltipResult<Registration>;

    fn has_pointer_capture(&self, pointer_id: i32) -> bool;

    fn set_pointer_capture(&self, pointer_id: i32) -> Result<(), CaptureError>;

    fn release_pointer_capture(&self, pointer_id: i32) -> Result<(), CaptureError>;
}

/// Display state of the overlay element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// Not displayed
    Hidden,
    /// Laid out but invisible, so it can be measured
    Measuring,
    Visible,
}

/// The single tooltip element owned by an attachment
pub trait OverlayElement {
    /// Replace content with plain text
    fn set_text(&self, text: &str);

    /// Replace content with markup, inserted literally
    fn set_markup(&self, markup: &str);

    fn set_state(&self, state: OverlayState);

    /// Rendered size; only meaningful after content is set and the overlay is laid out
    fn measure(&self) -> Size;

    /// Top-left corner in viewport coordinates
    fn set_position(&self, position: Point);

    /// Detach the element from the document
    fn remove(&self);
}

/// The environment an attachment lives in
pub trait TooltipHost: 'static {
    type Record: DescribeRecord + 'static;
    type Value: 'static;
    type Node: SurfaceNode + PointerTarget + ScaleOwner<Scale = Self::Scale> + 'static;
    type Scale: ScaleHandle<Self::Value> + 'static;
    type Overlay: OverlayElement + 'static;
    type Scheduler: FrameScheduler + 'static;

    fn viewport_size(&self) -> Size;

    /// Create the overlay element, attached to the document but hidden
    fn create_overlay(&self, class_name: &str) -> TooltipResult<Self::Overlay>;

    fn scheduler(&self) -> Self::Scheduler;

    /// Subscribe to viewport resize and scroll
    fn on_viewport_change(&self, handler: ViewportHandler) -> TooltipResult<Vec<Registration>>;
}
