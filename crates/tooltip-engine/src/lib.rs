//! Pointer-proximity tooltip engine
//!
//! Attaches a pointer-following tooltip to a rendered chart surface without
//! the chart emitting hover events itself. The engine resolves the surface,
//! picks a coordinate mode (the chart's own scales, or measured marker
//! elements), builds a point index, and on every throttled pointer move shows
//! the record nearest to the pointer within a radius.
//!
//! Everything platform specific sits behind the traits in [`host`]; the
//! browser implementation lives in the `plot-tooltip-wasm` crate.

pub mod controller;
pub mod host;
pub mod options;
pub mod point_index;
pub mod presenter;
pub mod scales;
pub mod scheduler;
pub mod search;
pub mod surface;

pub use controller::{attach, AttachWarning, Attachment, InteractionStats, TooltipMode};
pub use host::{
    CaptureError, OverlayElement, OverlayState, PointerHandler, PointerTarget, Registration,
    SurfaceNode, TooltipHost, ViewportHandler,
};
pub use options::{Accessor, AccessorError, ContentFn, DescribeRecord, TooltipOptions};
pub use point_index::{ComparisonSpace, CountMismatch, PointIndex};
pub use presenter::{escape_html, TooltipContent};
pub use scales::{Axis, ScaleEntry, ScaleHandle, ScaleOwner, ScaleSource, TransformKind};
pub use scheduler::{FrameScheduler, FrameTask, FrameThrottle, ManualScheduler};

pub use plot_tooltip_shared::{
    CoordinateMode, Matrix, Point, PointerEventKind, PointerSample, Rect, Size, TooltipError,
    TooltipResult, TooltipSettings,
};
