//! Surface resolution
//!
//! A chart wrapper may hold several `<svg>` surfaces (the plot plus a swatch
//! legend, for instance). Only one of them carries the plotted markers.

use plot_tooltip_shared::{TooltipError, TooltipResult};

use crate::host::SurfaceNode;

/// Find the surface holding the data markers under `root`
///
/// `scales_eligible` enables the second preference: a descendant exposing
/// scales, used when scale mode could be selected.
pub fn resolve_surface<N: SurfaceNode>(root: &N, scales_eligible: bool) -> TooltipResult<N> {
    if root.is_surface() && root.has_marker_group() {
        return Ok(root.clone());
    }

    let candidates = root.descendant_surfaces();

    if let Some(surface) = candidates.iter().find(|c| c.has_marker_group()) {
        return Ok(surface.clone());
    }

    if scales_eligible {
        if let Some(surface) = candidates.iter().find(|c| c.exposes_scales()) {
            return Ok(surface.clone());
        }
    }

    if let Some(first) = candidates.into_iter().next() {
        log::debug!("No marker group found, using first descendant surface");
        return Ok(first);
    }

    Err(TooltipError::SurfaceNotFound)
}
