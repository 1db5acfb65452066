// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MAST View: owns the current rich-media session, routes web-surface
// notifications into the bridge, applies its outcomes through the host, and
// runs timers and fetches on tokio with results marshalled back through a
// FIFO dispatcher.

pub mod ad_view;
pub mod dispatch;
pub mod events;
pub mod session;

pub use ad_view::AdView;
pub use dispatch::{UiDispatcher, UiEvent, UiHandle};
pub use events::{AdEvent, AdEventSink};
pub use session::Session;
