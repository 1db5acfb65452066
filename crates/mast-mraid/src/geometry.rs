// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry coordinator: derives the snapshot reported to the creative from
// host layout facts and the session state.

use kurbo::{Point, Rect};

use mast_core::{GeometrySnapshot, HostLayout, PlacementType, State};

/// Compute the geometry snapshot.
///
/// * expanded: max size is the whole screen and the ad sits at (0,0) filling it
/// * resized: the resize frame in page coordinates
/// * otherwise: the container frame in page coordinates
pub fn snapshot(layout: &HostLayout, state: State, resize_frame: Option<Rect>) -> GeometrySnapshot {
    let (max_size, current_position) = match (state, resize_frame) {
        (State::Expanded, _) => (
            layout.screen,
            Rect::from_origin_size(Point::ZERO, layout.screen),
        ),
        (State::Resized, Some(frame)) => (layout.page, frame),
        _ => (layout.page, layout.container),
    };
    GeometrySnapshot {
        screen_size: layout.screen,
        max_size,
        current_position,
        default_position: layout.default_frame,
    }
}

/// Visible container, and for interstitials an open overlay.
pub fn is_viewable(layout: &HostLayout, placement: PlacementType) -> bool {
    match placement {
        PlacementType::Inline => layout.visible,
        PlacementType::Interstitial => layout.visible && layout.overlay_open,
    }
}
