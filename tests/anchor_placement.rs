use tour_overlay::geometry::{Rect, Size};
use tour_overlay::overlay::{place_caption, place_skip_control, CaptionGaps, Corner};
use tour_overlay::settings::OverlaySettings;

const BOUNDS: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);
const BUTTON: Size = Size::new(80.0, 40.0);

fn gaps() -> CaptionGaps {
    let settings = OverlaySettings::default();
    CaptionGaps {
        after: settings.caption_gap_after,
        before: settings.caption_gap_before,
    }
}

#[test]
fn bottom_right_quadrant_pushes_skip_to_top_right() {
    let highlight = Rect::new(500.0, 400.0, 500.0, 400.0);
    let placement = place_skip_control(highlight, BOUNDS, BUTTON, 30.0);
    assert_eq!(placement.corner, Corner::TopRight);
    assert_eq!(placement.rect, Rect::new(890.0, 30.0, 80.0, 40.0));
    assert!(!placement.rect.intersects(&highlight));
}

#[test]
fn touching_the_control_is_not_a_collision() {
    let highlight = Rect::new(0.0, 0.0, 890.0, 800.0);
    let placement = place_skip_control(highlight, BOUNDS, BUTTON, 30.0);
    assert_eq!(placement.corner, Corner::BottomRight);
}

#[test]
fn placement_stays_inside_bounds() {
    for highlight in [
        Rect::new(0.0, 0.0, 100.0, 100.0),
        Rect::new(900.0, 0.0, 100.0, 800.0),
        Rect::new(0.0, 700.0, 1000.0, 100.0),
    ] {
        let placement = place_skip_control(highlight, BOUNDS, BUTTON, 30.0);
        assert!(BOUNDS.contains_rect(&placement.rect), "{highlight:?}");
    }
}

#[test]
fn offset_bounds_are_respected() {
    let bounds = Rect::new(1920.0, 0.0, 1280.0, 1024.0);
    let placement = place_skip_control(Rect::new(1920.0, 0.0, 10.0, 10.0), bounds, BUTTON, 30.0);
    assert_eq!(placement.rect.origin(), (3090.0, 954.0));
}

#[test]
fn caption_follows_highlight_orientation() {
    let label = Size::new(90.0, 20.0);
    // wide, upper half: below
    assert_eq!(
        place_caption(Rect::new(10.0, 10.0, 400.0, 200.0), BOUNDS, label, gaps()),
        (165.0, 230.0)
    );
    // square counts as tall; right half: to the left
    assert_eq!(
        place_caption(Rect::new(800.0, 300.0, 100.0, 100.0), BOUNDS, label, gaps()),
        (680.0, 340.0)
    );
}
