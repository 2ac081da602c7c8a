//! Fuzzy placement descriptions.
//!
//! A tour driver can describe a highlight without knowing the screen size:
//!
//! - position: `"<y-axis> <x-axis>"`, a lone y-axis token or a lone x-axis token
//! - size: `"<width> <height>"`, `"<width> <w>:<h>"` or `"<width>"` (square)
//!
//! where an axis is a named anchor (`top`, `bottom`, `left`, `right`,
//! `center`) or a number suffixed with `%` (of the monitor dimension) or `px`.
//! Rules are tried in that order and the first one that matches anywhere in
//! the string wins. Nothing here fails: a description that matches no rule
//! resolves to `(0, 0)`. Numbers too large for `u64` saturate.

use crate::geometry::{approx_eq, Monitor, Size};
use once_cell::sync::Lazy;
use regex::Regex;

const NUMBER: &str = r"(\d+)(%|px)";
const ASPECT: &str = r"(\d+):(\d+)";

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(NUMBER).expect("valid number regex"));
static Y_AXIS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(top|center|bottom|{NUMBER})")).expect("valid y-axis regex")
});
static X_AXIS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(left|center|right|{NUMBER})")).expect("valid x-axis regex")
});
static POS_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(top|center|bottom|{NUMBER}) (left|center|right|{NUMBER})"
    ))
    .expect("valid position regex")
});
static SIZE_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("({NUMBER}) ({NUMBER})")).expect("valid size regex")
});
static SIZE_ASPECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("({NUMBER}) ({ASPECT})")).expect("valid aspect regex")
});
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?:{ASPECT}|\d+(?:%|px)|left|right|top|bottom|center)"
    ))
    .expect("valid token regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Right,
    Top,
    Bottom,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuzzyToken {
    Percentage(u64),
    PixelOffset(u64),
    NamedAnchor(Anchor),
    AspectRatio(u64, u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl FuzzyToken {
    /// Parse one whitespace-free word produced by a grammar match.
    pub fn parse(word: &str) -> Option<FuzzyToken> {
        match word {
            "left" => return Some(FuzzyToken::NamedAnchor(Anchor::Left)),
            "right" => return Some(FuzzyToken::NamedAnchor(Anchor::Right)),
            "top" => return Some(FuzzyToken::NamedAnchor(Anchor::Top)),
            "bottom" => return Some(FuzzyToken::NamedAnchor(Anchor::Bottom)),
            "center" => return Some(FuzzyToken::NamedAnchor(Anchor::Center)),
            _ => {}
        }

        if let Some((w, h)) = word.split_once(':') {
            return Some(FuzzyToken::AspectRatio(parse_digits(w)?, parse_digits(h)?));
        }

        let caps = NUMBER_RE.captures(word)?;
        let value = parse_digits(caps.get(1)?.as_str())?;
        match caps.get(2)?.as_str() {
            "px" => Some(FuzzyToken::PixelOffset(value)),
            _ => Some(FuzzyToken::Percentage(value)),
        }
    }

    /// Resolve a numeric token against `total`; anchors and ratios have no
    /// length on their own.
    pub fn length(&self, total: f64) -> Option<f64> {
        match *self {
            FuzzyToken::Percentage(n) => Some(n as f64 * total / 100.0),
            FuzzyToken::PixelOffset(n) => Some(n as f64),
            FuzzyToken::NamedAnchor(_) | FuzzyToken::AspectRatio(..) => None,
        }
    }

    fn offset(&self, axis: Axis, extent: f64, monitor: &Monitor) -> Option<f64> {
        let total = match axis {
            Axis::Horizontal => monitor.width,
            Axis::Vertical => monitor.height,
        };
        match (*self, axis) {
            (FuzzyToken::NamedAnchor(Anchor::Left), Axis::Horizontal)
            | (FuzzyToken::NamedAnchor(Anchor::Top), Axis::Vertical) => Some(0.0),
            (FuzzyToken::NamedAnchor(Anchor::Right), Axis::Horizontal)
            | (FuzzyToken::NamedAnchor(Anchor::Bottom), Axis::Vertical) => Some(total - extent),
            (FuzzyToken::NamedAnchor(Anchor::Center), _) => Some(total / 2.0 - extent / 2.0),
            (FuzzyToken::NamedAnchor(_), _) => None,
            (token, _) => token.length(total),
        }
    }
}

fn parse_digits(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Every token the grammar knows about, in order of appearance.
pub fn tokenize(spec: &str) -> Vec<FuzzyToken> {
    TOKEN_RE
        .find_iter(spec)
        .filter_map(|m| FuzzyToken::parse(m.as_str()))
        .collect()
}

fn split_pair(matched: &str) -> Option<(FuzzyToken, FuzzyToken)> {
    let (first, second) = matched.split_once(' ')?;
    Some((FuzzyToken::parse(first)?, FuzzyToken::parse(second)?))
}

/// Resolve a size description to pixels. Unmatched input yields a zero size.
pub fn parse_size(spec: &str, monitor: &Monitor) -> Size {
    if let Some(m) = SIZE_PAIR_RE.find(spec) {
        if let Some((w, h)) = split_pair(m.as_str()) {
            if let (Some(width), Some(height)) = (w.length(monitor.width), h.length(monitor.height))
            {
                return Size::new(width, height);
            }
        }
    }

    if let Some(m) = SIZE_ASPECT_RE.find(spec) {
        if let Some((w, FuzzyToken::AspectRatio(rw, rh))) = split_pair(m.as_str()) {
            if let Some(width) = w.length(monitor.width) {
                return Size::new(width, apply_aspect_ratio(width, rw, rh));
            }
        }
    }

    if let Some(m) = NUMBER_RE.find(spec) {
        if let Some(width) = FuzzyToken::parse(m.as_str()).and_then(|t| t.length(monitor.width)) {
            return Size::new(width, width);
        }
    }

    tracing::debug!(spec, "size description matched no rule");
    Size::default()
}

fn apply_aspect_ratio(width: f64, ratio_w: u64, ratio_h: u64) -> f64 {
    if ratio_w == 0 || ratio_h == 0 {
        return 0.0;
    }
    width / (ratio_w as f64 / ratio_h as f64)
}

/// Resolve a position description to a monitor-local origin for a box of
/// `width` x `height`.
pub fn parse_pos(spec: &str, width: f64, height: f64, monitor: &Monitor) -> (f64, f64) {
    let center = FuzzyToken::NamedAnchor(Anchor::Center);
    let resolve = |y: FuzzyToken, x: FuzzyToken| -> Option<(f64, f64)> {
        Some((
            x.offset(Axis::Horizontal, width, monitor)?,
            y.offset(Axis::Vertical, height, monitor)?,
        ))
    };

    if let Some(m) = POS_PAIR_RE.find(spec) {
        if let Some(pos) = split_pair(m.as_str()).and_then(|(y, x)| resolve(y, x)) {
            return pos;
        }
    }

    if let Some(m) = Y_AXIS_RE.find(spec) {
        if let Some(pos) = FuzzyToken::parse(m.as_str()).and_then(|y| resolve(y, center)) {
            return pos;
        }
    }

    if let Some(m) = X_AXIS_RE.find(spec) {
        if let Some(pos) = FuzzyToken::parse(m.as_str()).and_then(|x| resolve(center, x)) {
            return pos;
        }
    }

    tracing::debug!(spec, "position description matched no rule");
    (0.0, 0.0)
}

/// Pull a box that touches a monitor edge inward by the border thickness so
/// its border stays on screen.
pub fn adjust_for_border(
    x: f64,
    y: f64,
    size: Size,
    monitor: &Monitor,
    border: f64,
) -> (f64, f64) {
    let mut x = x;
    let mut y = y;
    if approx_eq(x, 0.0) {
        x += border;
    }
    if approx_eq(x + size.width, monitor.width) {
        x -= border;
    }
    if approx_eq(y, 0.0) {
        y += border;
    }
    if approx_eq(y + size.height, monitor.height) {
        y -= border;
    }
    (x, y)
}
