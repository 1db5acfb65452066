// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout facts reported by the host and the geometry snapshot reported to the
// creative.  Units are device-independent pixels; page coordinates have their
// origin at the top-left of the hosting page.

use kurbo::{Rect, Size};

use crate::types::Rotation;

/// Side length of the tappable close region, and the minimum resize dimension.
pub const CLOSE_AREA_SIZE: f64 = 50.0;

/// Host-reported facts the geometry snapshot is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostLayout {
    /// Entire device screen.
    pub screen: Size,
    /// Hosting page, excluding status tray and application bar.
    pub page: Size,
    /// Current frame of the ad container in page coordinates.
    pub container: Rect,
    /// Frame the developer placed the ad at, in page coordinates.
    pub default_frame: Rect,
    /// Container visibility flag.
    pub visible: bool,
    /// Whether the full-screen overlay is currently open.
    pub overlay_open: bool,
    pub rotation: Rotation,
}

impl HostLayout {
    /// Layout for a visible inline container that has not moved from its default frame.
    pub fn new(screen: Size, page: Size, container: Rect) -> Self {
        Self {
            screen,
            page,
            container,
            default_frame: container,
            visible: true,
            overlay_open: false,
            rotation: Rotation::PortraitUp,
        }
    }

    pub fn with_default_frame(mut self, frame: Rect) -> Self {
        self.default_frame = frame;
        self
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_overlay_open(mut self, open: bool) -> Self {
        self.overlay_open = open;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Geometry pushed to the creative after every transition and layout change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometrySnapshot {
    pub screen_size: Size,
    /// Largest area the creative may occupy in its current state.
    pub max_size: Size,
    /// Current frame, relative to `max_size`.
    pub current_position: Rect,
    /// Where the developer placed the ad; invariant across states.
    pub default_position: Rect,
}
