use tour_overlay::geometry::{Monitor, Rect};
use tour_overlay::overlay::HighlightShape;
use tour_overlay::session::{HeadlessSurface, HighlightController, HighlightRequest};
use tour_overlay::settings::OverlaySettings;

const DIM: [u8; 4] = [0, 0, 0, 200];
const BORDER: [u8; 4] = [255, 120, 0, 255];

fn show_rect(rect: Rect) -> (HighlightController, HeadlessSurface) {
    let monitor = Monitor::new(0.0, 0.0, 1000.0, 800.0);
    let surface = HeadlessSurface::new(monitor);
    let mut controller =
        HighlightController::new(Box::new(surface.clone()), OverlaySettings::default());
    controller
        .start(&monitor, HighlightRequest::shape(HighlightShape::Rect(rect)))
        .unwrap();
    (controller, surface)
}

#[test]
fn composed_overlay_dims_everything_but_the_cutout() {
    let (_controller, surface) = show_rect(Rect::new(10.0, 10.0, 400.0, 200.0));
    let canvas = surface.render();

    assert_eq!(canvas.dimensions(), (1000, 800));
    assert_eq!(canvas.get_pixel(500, 500).0, DIM);
    assert_eq!(canvas.get_pixel(999, 0).0, DIM);
    assert_eq!(canvas.get_pixel(100, 100).0, [0, 0, 0, 0]);
    assert_eq!(canvas.get_pixel(200, 9).0, BORDER);
    assert_eq!(canvas.get_pixel(200, 211).0, BORDER);
    assert_eq!(canvas.get_pixel(8, 100).0, BORDER);
    assert_eq!(canvas.get_pixel(411, 100).0, BORDER);
}

#[test]
fn snapshot_is_written_as_png() {
    let (_controller, surface) = show_rect(Rect::new(100.0, 100.0, 200.0, 200.0));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overlay.png");

    surface.write_snapshot(&path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (1000, 800));
    assert_eq!(decoded.get_pixel(0, 0).0, DIM);
    assert_eq!(decoded.get_pixel(200, 200).0, [0, 0, 0, 0]);
}

#[test]
fn snapshot_into_missing_directory_fails() {
    let (_controller, surface) = show_rect(Rect::new(100.0, 100.0, 200.0, 200.0));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("overlay.png");
    assert!(surface.write_snapshot(&path).is_err());
}

#[test]
fn fractional_highlight_leaves_no_undimmed_rows() {
    let (_controller, surface) = show_rect(Rect::new(100.0, 10.4, 100.0, 10.4));
    let canvas = surface.render();

    // the cutout snaps to columns 100..200 and rows 10..21
    let in_cutout = |x: u32, y: u32| (100..200).contains(&x) && (10..21).contains(&y);
    for (x, y, px) in canvas.enumerate_pixels() {
        if !in_cutout(x, y) {
            assert_ne!(px.0[3], 0, "pixel ({x}, {y}) outside the cutout is transparent");
        }
    }
    assert_eq!(canvas.get_pixel(20, 20).0, DIM);
    assert_eq!(canvas.get_pixel(500, 20).0, DIM);
    assert_eq!(canvas.get_pixel(150, 15).0, [0, 0, 0, 0]);
}
