// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_sheet::drag::{DragController, DragState, DragSurface};
use understory_sheet::{
    AnimationId, AnimationRequest, DragSample, SheetConfig, SheetController, SheetHost, SheetState,
    SheetStyle, SheetVisuals, SpringCurve,
};

const CONTAINER: Size = Size::new(400.0, 800.0);

struct NullHost;

impl SheetHost for NullHost {
    fn animate(&mut self, _request: &AnimationRequest) {}

    fn cancel_animation(&mut self, _id: AnimationId) -> Option<SheetVisuals> {
        None
    }

    fn request_dismissal(&mut self, _animated: bool) {}
}

fn bench_drag_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("sheet/drag_step");
    let drag = DragController::new(&SheetConfig::default());

    // Stretch past the top versus a rigid move downward.
    for (name, delta) in [("stretch", -4.0), ("follow", 4.0)] {
        group.bench_function(BenchmarkId::new("changed", name), |b| {
            let surface = DragSurface {
                container: CONTAINER,
                frame: Rect::new(0.0, 50.0, 400.0, 800.0),
                scrim_opacity: 1.0,
            };
            let (began, _) = drag.step(&DragState::Idle, &DragSample::began(100.0, 0.0), &surface);
            let sample = DragSample::changed(delta, 100.0 + delta, 0.0);
            b.iter(|| black_box(drag.step(black_box(&began), &sample, &surface)));
        });
    }

    group.finish();
}

fn bench_gesture(c: &mut Criterion) {
    let mut group = c.benchmark_group("sheet/gesture");

    for samples in [16_usize, 128, 1_024] {
        group.bench_with_input(BenchmarkId::from_parameter(samples), &samples, |b, &n| {
            let mut host = NullHost;
            let mut sheet = SheetController::new(SheetConfig::default(), SheetStyle::default());
            sheet.set_container_size(CONTAINER, &mut host);
            sheet.present(false, &mut host);
            let step = 100.0 / n as f64;
            b.iter(|| {
                sheet.handle_drag(&DragSample::began(0.0, 0.0), &mut host);
                for i in 0..n {
                    let y = step * (i + 1) as f64;
                    sheet.handle_drag(&DragSample::changed(step, y, 0.0), &mut host);
                }
                sheet.handle_drag(&DragSample::cancelled(), &mut host);
                black_box(sheet.visuals());
            });
            assert_eq!(sheet.state(), SheetState::Expanded);
        });
    }

    group.finish();
}

fn bench_spring(c: &mut Criterion) {
    let mut group = c.benchmark_group("sheet/spring");

    for damping in [0.4, 0.7, 1.0] {
        let spring = SpringCurve::new(damping, 0.0);
        group.bench_with_input(
            BenchmarkId::from_parameter(damping),
            &spring,
            |b, spring| {
                b.iter(|| black_box(spring.progress(black_box(0.5), 0.25)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_drag_step, bench_gesture, bench_spring);
criterion_main!(benches);
