// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Events raised to the application that embeds the ad view.

use kurbo::Rect;

use mast_core::HostRequest;

/// Application-facing ad lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub enum AdEvent {
    /// Rich-media content was handed to the web surface.
    AdReceived,
    /// A host or I/O collaborator failed.
    AdFailed(String),
    Expanded,
    /// The ad now occupies `frame` (page coordinates).
    Resized(Rect),
    /// Back at the default position after an expand or resize.
    Collapsed,
    /// The user asked to close and the SDK leaves the decision to the app.
    CloseButtonPressed,
    /// A device action is taking the user out of the application.
    LeavingApplication,
    /// A creative command was decoded; `handled` is false when the bridge
    /// refused it.
    ProcessedRichMediaRequest { command: String, handled: bool },
}

/// Single listener for [`AdEvent`]s.  Any `FnMut(AdEvent)` closure qualifies.
pub trait AdEventSink {
    fn on_event(&mut self, event: AdEvent);

    /// Asked before each device action (open URL, play media, calendar,
    /// store picture, call, SMS, mail, map).  Returning `false` cancels the
    /// action; the app then owns it.
    fn allow(&mut self, _action: &HostRequest) -> bool {
        true
    }
}

impl<F: FnMut(AdEvent)> AdEventSink for F {
    fn on_event(&mut self, event: AdEvent) {
        self(event)
    }
}
