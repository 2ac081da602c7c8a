use criterion::{criterion_group, criterion_main, Criterion};
use tour_overlay::fuzzy::{adjust_for_border, parse_pos, parse_size};
use tour_overlay::geometry::{Circle, Monitor, Rect};
use tour_overlay::overlay::{decompose, edge_for_panel, paint_panel, HighlightShape, PaintStyle};

fn bench_fuzzy(c: &mut Criterion) {
    let monitor = Monitor::new(0.0, 0.0, 1920.0, 1080.0);
    c.bench_function("fuzzy_resolve", |b| {
        b.iter(|| {
            let size = parse_size("40% 3:1", &monitor);
            let (x, y) = parse_pos("bottom right", size.width, size.height, &monitor);
            adjust_for_border(x, y, size, &monitor, 3.0)
        })
    });
}

fn bench_paint(c: &mut Criterion) {
    let bounds = Rect::new(0.0, 0.0, 1920.0, 1080.0);
    let style = PaintStyle::default();
    let rect = HighlightShape::Rect(Rect::new(400.0, 300.0, 600.0, 200.0));
    let circle = HighlightShape::Circle(Circle::new(800.0, 400.0, 120.0));

    for (name, shape) in [("paint_rect_1080p", rect), ("paint_circle_1080p", circle)] {
        c.bench_function(name, |b| {
            b.iter(|| {
                decompose(shape.bounds(), bounds)
                    .iter()
                    .map(|panel| {
                        let edge = edge_for_panel(&shape, &panel, style.border_width);
                        paint_panel(&panel, &edge, &style).rgba.len()
                    })
                    .sum::<usize>()
            })
        });
    }
}

criterion_group!(benches, bench_fuzzy, bench_paint);
criterion_main!(benches);
