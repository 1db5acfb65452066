// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Renders creative events as `mraid.*` JavaScript calls for injection into
// the web surface.  String arguments are JSON-encoded so any quote or control
// character in a message is escaped.

use kurbo::{Rect, Size};

use mast_core::CreativeEvent;

/// JavaScript statement(s) for one event.
pub fn render(event: &CreativeEvent) -> String {
    match event {
        CreativeEvent::Ready => "mraid.fireReadyEvent();".to_owned(),
        CreativeEvent::StateChange(state) => {
            format!("mraid.fireStateChangeEvent({});", js_string(state.as_str()))
        }
        CreativeEvent::ViewableChange(viewable) => {
            format!("mraid.fireViewableChangeEvent({viewable});")
        }
        CreativeEvent::SizeChange(size) => {
            format!("mraid.fireSizeChangeEvent({});", size_args(*size))
        }
        CreativeEvent::Geometry(snap) => format!(
            "mraid.setScreenSize({});mraid.setMaxSize({});mraid.setCurrentPosition({});mraid.setDefaultPosition({});",
            size_args(snap.screen_size),
            size_args(snap.max_size),
            rect_args(snap.current_position),
            rect_args(snap.default_position),
        ),
        CreativeEvent::PlacementType(placement) => {
            format!("mraid.setPlacementType({});", js_string(placement.as_str()))
        }
        CreativeEvent::Supports(table) => table
            .iter()
            .map(|(feature, supported)| {
                format!("mraid.setSupports({},{supported});", js_string(feature.name()))
            })
            .collect(),
        CreativeEvent::FeatureQuery { feature, supported } => {
            format!("mraid.setSupports({},{supported});", js_string(feature))
        }
        CreativeEvent::ExpandProperties(props) => {
            let json = serde_json::to_value(props)
                .map(|v| v.to_string())
                .unwrap_or_else(|_| "{}".to_owned());
            format!("mraid.setExpandProperties({json});")
        }
        CreativeEvent::Error { message, action } => format!(
            "mraid.fireErrorEvent({},{});",
            js_string(message),
            js_string(action)
        ),
        CreativeEvent::Response { url, body } => format!(
            "mraid.fireResponseEvent({},{});",
            js_string(url),
            js_string(body)
        ),
    }
}

/// Concatenate the scripts for a batch of events.
pub fn render_all<'a>(events: impl IntoIterator<Item = &'a CreativeEvent>) -> String {
    events.into_iter().map(render).collect()
}

fn js_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

fn size_args(size: Size) -> String {
    format!("{},{}", size.width, size.height)
}

fn rect_args(rect: Rect) -> String {
    format!("{},{},{},{}", rect.x0, rect.y0, rect.width(), rect.height())
}
