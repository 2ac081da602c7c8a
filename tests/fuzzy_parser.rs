use tour_overlay::fuzzy::{adjust_for_border, parse_pos, parse_size, tokenize, Anchor, FuzzyToken};
use tour_overlay::geometry::{Monitor, Size};

fn monitor() -> Monitor {
    Monitor::new(0.0, 0.0, 1000.0, 800.0)
}

fn resolve(position: &str, size: &str) -> (f64, f64, Size) {
    let monitor = monitor();
    let size = parse_size(size, &monitor);
    let (x, y) = parse_pos(position, size.width, size.height, &monitor);
    let (x, y) = adjust_for_border(x, y, size, &monitor, 3.0);
    (x, y, size)
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "{actual} != {expected}");
}

#[test]
fn top_left_touches_two_edges() {
    let (x, y, size) = resolve("top left", "20% 10%");
    assert_eq!(size, Size::new(200.0, 80.0));
    assert_eq!((x, y), (3.0, 3.0));
}

#[test]
fn center_square_is_not_nudged() {
    let (x, y, size) = resolve("center", "10%");
    assert_eq!(size, Size::new(100.0, 100.0));
    assert_eq!((x, y), (450.0, 350.0));
}

#[test]
fn aspect_ratio_at_bottom() {
    let (x, y, size) = resolve("bottom", "200px 3:1");
    assert_close(size.height, 200.0 / 3.0);
    assert_close(x, 400.0);
    assert_close(y, 800.0 - 200.0 / 3.0 - 3.0);
}

#[test]
fn bottom_right_is_pulled_inward() {
    let (x, y, size) = resolve("bottom right", "40% 50px");
    assert_eq!(size, Size::new(400.0, 50.0));
    assert_eq!((x, y), (597.0, 747.0));
}

#[test]
fn lone_left_centers_vertically() {
    let (x, y, size) = resolve("left", "200px 90%");
    assert_eq!(size, Size::new(200.0, 720.0));
    assert_eq!((x, y), (3.0, 40.0));
}

#[test]
fn first_rule_wins_anywhere_in_the_string() {
    assert_eq!(
        parse_pos("please put it at top right thanks", 100.0, 100.0, &monitor()),
        (900.0, 0.0)
    );
    assert_eq!(parse_size("about 50px wide", &monitor()), Size::new(50.0, 50.0));
}

#[test]
fn garbage_resolves_to_origin() {
    assert_eq!(parse_pos("somewhere", 10.0, 10.0, &monitor()), (0.0, 0.0));
    assert_eq!(parse_size("big", &monitor()), Size::default());
}

#[test]
fn tokens_are_reported_in_order() {
    assert_eq!(
        tokenize("center 10%"),
        vec![
            FuzzyToken::NamedAnchor(Anchor::Center),
            FuzzyToken::Percentage(10)
        ]
    );
}

#[test]
fn oversized_numbers_still_match_their_rule() {
    let size = parse_size("99999999999px 10px", &monitor());
    assert_eq!(size, Size::new(99_999_999_999.0, 10.0));

    let huge = "1".repeat(30);
    assert_eq!(
        FuzzyToken::parse(&format!("{huge}px")),
        Some(FuzzyToken::PixelOffset(u64::MAX))
    );
    assert_eq!(FuzzyToken::parse("1x:2"), None);
}
