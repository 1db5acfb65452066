// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outbound contracts of the bridge: events for the creative's script context
// and requests for the host adapter.

use kurbo::{Rect, Size};

use crate::geometry::GeometrySnapshot;
use crate::types::{
    CalendarEvent, ExpandProperties, Feature, MediaKind, MediaProperties, PlacementType, Rotation,
    State, Surface,
};

/// Notification delivered back into the creative's script context.
#[derive(Debug, Clone, PartialEq)]
pub enum CreativeEvent {
    Ready,
    StateChange(State),
    ViewableChange(bool),
    SizeChange(Size),
    Geometry(GeometrySnapshot),
    PlacementType(PlacementType),
    /// Full capability table, sent once before `Ready`.
    Supports(Vec<(Feature, bool)>),
    /// Answer to a `supports` query; unknown names answer `false`.
    FeatureQuery { feature: String, supported: bool },
    ExpandProperties(ExpandProperties),
    /// Illegal transition, constraint violation, or unsupported action.
    Error { message: String, action: String },
    /// Body fetched for a `request` command.
    Response { url: String, body: String },
}

/// Instruction for the host adapter.  Surface requests change what is on
/// screen; the remainder are device actions performed on the creative's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    /// Open the full-screen overlay without moving content (interstitial show).
    OpenOverlay,
    /// Swap the ad container into the overlay at `frame` (screen coordinates).
    MoveToOverlay { frame: Rect },
    /// Open the overlay with a second web surface navigated to `url`.
    LoadTwoPartExpand { url: String, frame: Rect },
    CloseOverlay,
    /// Open the resize surface at `frame` (page coordinates).
    OpenResizeSurface { frame: Rect },
    MoveResizeSurface { frame: Rect },
    CloseResizeSurface,
    /// Swap the container back into the page at its default frame.
    RestoreInline { frame: Rect },
    /// Place the tappable close region at `rect`, relative to the surface origin.
    RenderCloseAffordance {
        surface: Surface,
        rect: Rect,
        draw_button: bool,
    },
    RemoveCloseAffordance { surface: Surface },
    SetVisibility(bool),
    ForceOrientation(Rotation),
    /// Dismiss the whole ad (interstitial close).
    DismissAd,

    // -- Device actions --
    OpenUrl(String),
    PlayMedia {
        url: String,
        kind: MediaKind,
        properties: MediaProperties,
    },
    CreateCalendarEvent(CalendarEvent),
    StorePicture(String),
    MakeCall(String),
    SendSms { recipient: String, body: String },
    SendMail {
        recipient: String,
        subject: String,
        body: String,
    },
    OpenMap { poi: String, fullscreen: bool },
    FetchData { url: String, display: String },
}

impl HostRequest {
    /// Whether this request changes on-screen surfaces rather than invoking a device action.
    pub fn is_surface(&self) -> bool {
        matches!(
            self,
            Self::OpenOverlay
                | Self::MoveToOverlay { .. }
                | Self::LoadTwoPartExpand { .. }
                | Self::CloseOverlay
                | Self::OpenResizeSurface { .. }
                | Self::MoveResizeSurface { .. }
                | Self::CloseResizeSurface
                | Self::RestoreInline { .. }
                | Self::RenderCloseAffordance { .. }
                | Self::RemoveCloseAffordance { .. }
                | Self::SetVisibility(_)
                | Self::ForceOrientation(_)
                | Self::DismissAd
        )
    }
}
