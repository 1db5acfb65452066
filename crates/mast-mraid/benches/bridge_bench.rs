// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for notification decoding, resize planning, and a full
// resize/expand/close cycle through the bridge.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};

use mast_core::{CreativeEvent, CustomClosePosition, HostLayout, PlacementType, ResizeProperties};
use mast_mraid::close_area::plan_resize;
use mast_mraid::{Bridge, CapabilityRegistry, Command};

const NOTIFICATIONS: &[&str] = &[
    "close",
    "expand|https://ads.example.com/expanded.html",
    "resize|50|50|300|250",
    r#"setResizeProperties|{"width":300,"height":250,"customClosePosition":"bottom-right","allowOffscreen":false}"#,
    r#"createCalendarEvent|{"description":"Sale","start":"2026-11-27T09:00:00Z"}"#,
    "sendMail|a@example.com|Hello|Body",
    "bogus|1|2",
];

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_notifications", |b| {
        b.iter(|| {
            for raw in NOTIFICATIONS {
                black_box(Command::parse(black_box(raw)));
            }
        })
    });
}

fn bench_plan_resize(c: &mut Criterion) {
    let props = ResizeProperties {
        width: 300.0,
        height: 250.0,
        offset_x: 50.0,
        offset_y: 50.0,
        custom_close_position: CustomClosePosition::BottomRight,
        allow_offscreen: false,
    };
    c.bench_function("plan_resize_clamped", |b| {
        b.iter(|| {
            plan_resize(
                black_box(&props),
                Point::new(400.0, 0.0),
                Size::new(480.0, 800.0),
            )
        })
    });
}

fn bench_cycle(c: &mut Criterion) {
    let layout = HostLayout::new(
        Size::new(480.0, 800.0),
        Size::new(480.0, 800.0),
        Rect::new(0.0, 0.0, 320.0, 50.0),
    );
    c.bench_function("resize_expand_close_cycle", |b| {
        b.iter(|| {
            let mut bridge =
                Bridge::new(PlacementType::Inline, CapabilityRegistry::default(), layout);
            let mut events: Vec<CreativeEvent> = Vec::new();
            bridge.initialize(layout, &mut events);
            bridge.notify("resize|0|0|300|250", &mut events);
            bridge.notify("expand", &mut events);
            bridge.notify("close", &mut events);
            black_box(events.len())
        })
    });
}

criterion_group!(benches, bench_parse, bench_plan_resize, bench_cycle);
criterion_main!(benches);
