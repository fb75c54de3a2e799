//! Point index construction for both coordinate modes

use plot_tooltip_shared::tooltip::FALLBACK_MARKER_SELECTOR;
use plot_tooltip_shared::{Point, Rect, TooltipError, TooltipResult};
use serde::{Deserialize, Serialize};

use crate::host::SurfaceNode;
use crate::options::Accessor;
use crate::scales::{CoordinateAdapter, ScaleHandle};
use crate::search::nearest_within;

/// Coordinate space the index (and the normalized pointer) live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonSpace {
    /// Surface-local pixels, from the chart's scales
    SurfaceLocal,
    /// Viewport pixels, from measured marker elements
    Viewport,
}

/// Marker count and dataset length disagreed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountMismatch {
    pub markers: usize,
    pub records: usize,
}

impl CountMismatch {
    pub fn shared_len(&self) -> usize {
        self.markers.min(self.records)
    }
}

/// One optional comparison point per record, by index
#[derive(Debug, Clone, PartialEq)]
pub struct PointIndex {
    space: ComparisonSpace,
    points: Vec<Option<Point>>,
}

impl PointIndex {
    /// Map every record through its accessors and the chart's scales
    ///
    /// A record whose accessor fails, or whose pixel position is not finite,
    /// gets an absent point.
    pub fn from_scales<R, V, S>(
        records: &[R],
        x: &Accessor<R, V>,
        y: &Accessor<R, V>,
        adapter: &CoordinateAdapter<S>,
    ) -> Self
    where
        S: ScaleHandle<V>,
    {
        let points = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let x_value = x(record, index).ok()?;
                let y_value = y(record, index).ok()?;
                let px = adapter.x.to_pixel(&x_value)?;
                let py = adapter.y.to_pixel(&y_value)?;
                Some(Point::new(px, py))
            })
            .collect();

        Self {
            space: ComparisonSpace::SurfaceLocal,
            points,
        }
    }

    /// Centers of measured marker rectangles, padded or cut to `len`
    pub fn from_marker_rects(rects: &[Rect], len: usize) -> Self {
        let mut points: Vec<Option<Point>> = rects
            .iter()
            .take(len)
            .map(|rect| Some(rect.center()).filter(Point::is_finite))
            .collect();
        points.resize(len, None);

        Self {
            space: ComparisonSpace::Viewport,
            points,
        }
    }

    pub fn space(&self) -> ComparisonSpace {
        self.space
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied().flatten()
    }

    pub fn present_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    pub fn nearest_within(&self, pointer: Point, radius: f64) -> Option<usize> {
        nearest_within(&self.points, pointer, radius)
    }
}

/// Marker rectangles matched under `surface`, plus the selector that matched
///
/// Tries `selector`, then the fallback selector once.
pub fn sample_markers<N: SurfaceNode>(
    surface: &N,
    selector: &str,
) -> TooltipResult<(Vec<Rect>, String)> {
    let rects = surface.marker_rects(selector);
    if !rects.is_empty() {
        return Ok((rects, selector.to_string()));
    }

    if selector != FALLBACK_MARKER_SELECTOR {
        let rects = surface.marker_rects(FALLBACK_MARKER_SELECTOR);
        if !rects.is_empty() {
            log::debug!(
                "Selector {selector:?} matched nothing, using {FALLBACK_MARKER_SELECTOR:?}"
            );
            return Ok((rects, FALLBACK_MARKER_SELECTOR.to_string()));
        }
    }

    Err(TooltipError::NoMarkers {
        selector: selector.to_string(),
        fallback: FALLBACK_MARKER_SELECTOR.to_string(),
    })
}

/// Truncate both sequences to their shared length
pub fn reconcile_counts<R>(records: &mut Vec<R>, rects: &mut Vec<Rect>) -> Option<CountMismatch> {
    if records.len() == rects.len() {
        return None;
    }

    let mismatch = CountMismatch {
        markers: rects.len(),
        records: records.len(),
    };
    let shared = mismatch.shared_len();
    records.truncate(shared);
    rects.truncate(shared);
    Some(mismatch)
}
