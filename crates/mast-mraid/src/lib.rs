// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MAST MRAID: the rich-media bridge.  Decodes notifications sent by the
// creative's script, validates them against the current session state, and
// answers with creative events plus the host requests a transition needs.
// Nothing in here touches a UI; the host adapter performs every visual change.

pub mod bridge;
pub mod capabilities;
pub mod close_area;
pub mod command;
pub mod error;
pub mod geometry;
pub mod script;

pub use bridge::{Bridge, EventSink, Outcome};
pub use capabilities::{CapabilityRegistry, Features};
pub use close_area::{CloseButtonDecision, CloseButtonPolicy, ResizePlan};
pub use command::Command;
pub use error::BridgeError;
