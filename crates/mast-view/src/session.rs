// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One rendered rich-media ad.

use chrono::{DateTime, Utc};

use mast_core::{HostLayout, PlacementType, SessionId};
use mast_mraid::{Bridge, CapabilityRegistry};

/// Bridge plus identity for one rich-media ad.  Owned by the ad view and
/// dropped when the ad is replaced, closed, or the view is disposed.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub bridge: Bridge,
    /// Bridge of the second surface while a two-part expand is showing.  The
    /// second surface is navigated without the bridge script, so this bridge
    /// is never initialized and stays in `Loading`.
    pub two_part: Option<Bridge>,
}

impl Session {
    pub fn new(placement: PlacementType, capabilities: CapabilityRegistry, layout: HostLayout) -> Self {
        Self {
            id: SessionId::new(),
            created_at: Utc::now(),
            bridge: Bridge::new(placement, capabilities, layout),
            two_part: None,
        }
    }

    /// Attach the bridge for a two-part expand's second surface.
    pub fn open_two_part(&mut self, layout: HostLayout) {
        self.two_part = Some(Bridge::two_part(
            self.bridge.placement(),
            *self.bridge.capabilities(),
            layout,
        ));
    }

    /// Discard the second surface's bridge, if any.
    pub fn close_two_part(&mut self) -> bool {
        self.two_part.take().is_some()
    }
}
