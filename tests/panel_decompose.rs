use tour_overlay::geometry::Rect;
use tour_overlay::overlay::{decompose, PanelKind};

const BOUNDS: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

fn highlights() -> Vec<Rect> {
    let mut out = Vec::new();
    for x in [0.0, 10.0, 333.5, 600.0] {
        for y in [0.0, 10.0, 250.25, 700.0] {
            for (w, h) in [(400.0, 100.0), (1.0, 1.0), (66.67, 200.0)] {
                let rect = Rect::new(x, y, w, h);
                if BOUNDS.contains_rect(&rect) {
                    out.push(rect);
                }
            }
        }
    }
    out.push(BOUNDS);
    out
}

#[test]
fn panels_and_highlight_tile_the_monitor() {
    for highlight in highlights() {
        let panels = decompose(highlight, BOUNDS);
        let total = panels.total_area() + highlight.area();
        assert!(
            (total - BOUNDS.area()).abs() < 1e-6,
            "{highlight:?}: {total}"
        );
    }
}

#[test]
fn panels_are_pairwise_disjoint_and_avoid_the_highlight() {
    for highlight in highlights() {
        let panels: Vec<_> = decompose(highlight, BOUNDS).iter().collect();
        for (i, a) in panels.iter().enumerate() {
            assert!(!a.rect.intersects(&highlight), "{:?} overlaps {highlight:?}", a.kind);
            for b in &panels[i + 1..] {
                assert!(!a.rect.intersects(&b.rect), "{:?} overlaps {:?}", a.kind, b.kind);
            }
        }
    }
}

#[test]
fn edge_touching_highlight_gives_empty_panels() {
    let panels = decompose(Rect::new(0.0, 0.0, 1000.0, 100.0), BOUNDS);
    assert!(panels.top.rect.is_empty());
    assert!(panels.left.rect.is_empty());
    assert!(panels.right.rect.is_empty());
    assert_eq!(panels.bottom.rect, Rect::new(0.0, 100.0, 1000.0, 700.0));
    assert!(panels.iter().all(|p| p.rect.width >= 0.0 && p.rect.height >= 0.0));
}

#[test]
fn side_panels_span_only_the_highlight_rows() {
    let highlight = Rect::new(10.0, 10.0, 400.0, 200.0);
    let panels = decompose(highlight, BOUNDS);
    assert_eq!(panels.left.kind, PanelKind::Left);
    assert_eq!(panels.left.rect, Rect::new(0.0, 10.0, 10.0, 200.0));
    assert_eq!(panels.right.rect, Rect::new(410.0, 10.0, 590.0, 200.0));
    assert_eq!(panels.top.rect, Rect::new(0.0, 0.0, 1000.0, 10.0));
    assert_eq!(panels.bottom.rect, Rect::new(0.0, 210.0, 1000.0, 590.0));
}
