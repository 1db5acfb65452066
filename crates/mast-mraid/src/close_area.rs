// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Close-affordance policy.
//
// A resized or expanded ad must always leave the user a way out.  This module
// validates resize requests against the available bounds, shifts surfaces
// back on-screen when the creative asks for that, places the fixed-size close
// region, and decides when the SDK draws its own close button.

use std::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};

use mast_core::{CLOSE_AREA_SIZE, CustomClosePosition, ResizeProperties, SdkConfig, State};

use crate::error::BridgeError;

const ACTION: &str = "resize";

/// Validated placement of a resize surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePlan {
    /// Surface frame in page coordinates, after any clamping.
    pub frame: Rect,
    /// Offset of the frame from the default position, after clamping.
    pub offset: Vec2,
    /// Close region relative to the surface origin.
    pub close_area: Rect,
}

/// Close region for `position` inside a surface of `size`, relative to the
/// surface origin.
pub fn close_rect(position: CustomClosePosition, size: Size) -> Rect {
    let half = CLOSE_AREA_SIZE / 2.0;
    let right = size.width - CLOSE_AREA_SIZE;
    let bottom = size.height - CLOSE_AREA_SIZE;
    let mid_x = size.width / 2.0 - half;
    let mid_y = size.height / 2.0 - half;
    let origin = match position {
        CustomClosePosition::TopLeft => Point::new(0.0, 0.0),
        CustomClosePosition::TopCenter => Point::new(mid_x, 0.0),
        CustomClosePosition::TopRight => Point::new(right, 0.0),
        CustomClosePosition::Center => Point::new(mid_x, mid_y),
        CustomClosePosition::BottomLeft => Point::new(0.0, bottom),
        CustomClosePosition::BottomCenter => Point::new(mid_x, bottom),
        CustomClosePosition::BottomRight => Point::new(right, bottom),
    };
    Rect::from_origin_size(origin, Size::new(CLOSE_AREA_SIZE, CLOSE_AREA_SIZE))
}

/// Validate a resize request and place the surface.
///
/// `default_origin` is the ad's default position and `bounds` the area the
/// surface must fit in, both in page coordinates.  The clamp only ever moves
/// the surface; the requested size is kept.
pub fn plan_resize(
    props: &ResizeProperties,
    default_origin: Point,
    bounds: Size,
) -> Result<ResizePlan, BridgeError> {
    let size = Size::new(props.width, props.height);

    if size.width >= bounds.width || size.height >= bounds.height {
        return Err(BridgeError::constraint(
            ACTION,
            "Size must be smaller than the max size.",
        ));
    }
    if size.width < CLOSE_AREA_SIZE || size.height < CLOSE_AREA_SIZE {
        return Err(BridgeError::constraint(
            ACTION,
            "Size must be at least the minimum close area size.",
        ));
    }

    let mut origin = default_origin + Vec2::new(props.offset_x, props.offset_y);
    if !props.allow_offscreen {
        origin.x = clamp_axis(origin.x, size.width, bounds.width);
        origin.y = clamp_axis(origin.y, size.height, bounds.height);
    }

    let frame = Rect::from_origin_size(origin, size);
    let close_area = close_rect(props.custom_close_position, size);

    if props.allow_offscreen {
        let on_page = close_area + frame.origin().to_vec2();
        let page = Rect::from_origin_size(Point::ZERO, bounds);
        if page.intersect(on_page) != on_page {
            return Err(BridgeError::constraint(
                ACTION,
                "Close area must remain on screen.",
            ));
        }
    }

    Ok(ResizePlan {
        frame,
        offset: origin - default_origin,
        close_area,
    })
}

/// Shift `start` so that `[start, start + len]` lies within `[0, bound]`.
fn clamp_axis(start: f64, len: f64, bound: f64) -> f64 {
    if start < 0.0 {
        0.0
    } else if start + len > bound {
        start - (start + len - bound)
    } else {
        start
    }
}

// ---------------------------------------------------------------------------
// SDK close button
// ---------------------------------------------------------------------------

/// What the SDK should do about its own close button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseButtonDecision {
    /// Draw it now.
    RenderNow,
    /// Draw it once the delay has elapsed.
    RenderAfter(Duration),
    /// The creative draws its own; keep only the tappable region.
    CreativeSupplied,
    /// No SDK close button.
    None,
}

/// Close button settings taken from the SDK configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CloseButtonPolicy {
    pub show_close_button: bool,
    pub delay: Duration,
}

impl CloseButtonPolicy {
    pub fn from_config(config: &SdkConfig) -> Self {
        Self {
            show_close_button: config.show_close_button,
            delay: Duration::from_secs(u64::from(config.close_button_delay_secs)),
        }
    }

    /// Decide for the given session state.  An expanded ad without a custom
    /// close always gets the button immediately, whatever the delay.
    pub fn decide(&self, state: State, use_custom_close: bool) -> CloseButtonDecision {
        match state {
            State::Expanded if use_custom_close => CloseButtonDecision::CreativeSupplied,
            State::Expanded => CloseButtonDecision::RenderNow,
            State::Resized => CloseButtonDecision::CreativeSupplied,
            _ if !self.show_close_button => CloseButtonDecision::None,
            _ if self.delay.is_zero() => CloseButtonDecision::RenderNow,
            _ => CloseButtonDecision::RenderAfter(self.delay),
        }
    }
}
