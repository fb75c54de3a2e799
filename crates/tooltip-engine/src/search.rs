//! Nearest-point search and pointer normalization

use plot_tooltip_shared::{Matrix, Point, Rect};

/// Index of the nearest present point within `radius` of `pointer`
///
/// Points are scanned in ascending order and a candidate replaces the current
/// best when its squared distance is `<=` the best, so on exact ties the later
/// index wins.
pub fn nearest_within(points: &[Option<Point>], pointer: Point, radius: f64) -> Option<usize> {
    if !pointer.is_finite() || radius.is_nan() || radius < 0.0 {
        return None;
    }

    let limit = radius * radius;
    let mut best: Option<(usize, f64)> = None;

    for (index, point) in points.iter().enumerate() {
        let Some(point) = point else {
            continue;
        };
        let dist = point.distance_sq(pointer);
        if dist.is_nan() || dist > limit {
            continue;
        }
        if best.map_or(true, |(_, best_dist)| dist <= best_dist) {
            best = Some((index, dist));
        }
    }

    best.map(|(index, _)| index)
}

/// Map a viewport pointer position into the surface's local coordinates
///
/// Uses the inverse screen matrix when there is one; otherwise subtracts the
/// surface's bounding-rect origin.
pub fn to_surface_local(client: Point, inverse: Option<Matrix>, bounds: Rect) -> Point {
    match inverse {
        Some(matrix) => matrix.transform_point(client),
        None => {
            let origin = bounds.origin();
            Point::new(client.x - origin.x, client.y - origin.y)
        }
    }
}
