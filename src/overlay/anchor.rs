use crate::geometry::{Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    BottomRight,
    TopRight,
    TopLeft,
    BottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkipPlacement {
    pub corner: Corner,
    pub rect: Rect,
}

/// Distances between a caption and the highlight it describes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionGaps {
    /// Used when the caption goes below or to the right.
    pub after: f64,
    /// Used when the caption goes above or to the left.
    pub before: f64,
}

fn corner_rect(corner: Corner, bounds: Rect, control: Size, margin: f64) -> Rect {
    let left = bounds.x + margin;
    let right = bounds.right() - control.width - margin;
    let top = bounds.y + margin;
    let bottom = bounds.bottom() - control.height - margin;
    let (x, y) = match corner {
        Corner::BottomRight => (right, bottom),
        Corner::TopRight => (right, top),
        Corner::TopLeft => (left, top),
        Corner::BottomLeft => (left, bottom),
    };
    Rect::new(x, y, control.width, control.height)
}

/// Put the skip control in the first corner that stays clear of the
/// highlight. Bottom-left is taken without checking once the other three
/// are blocked.
pub fn place_skip_control(
    highlight: Rect,
    bounds: Rect,
    control: Size,
    margin: f64,
) -> SkipPlacement {
    for corner in [Corner::BottomRight, Corner::TopRight, Corner::TopLeft] {
        let rect = corner_rect(corner, bounds, control, margin);
        if !rect.intersects(&highlight) {
            return SkipPlacement { corner, rect };
        }
    }
    SkipPlacement {
        corner: Corner::BottomLeft,
        rect: corner_rect(Corner::BottomLeft, bounds, control, margin),
    }
}

/// Caption origin next to the highlight. Wide highlights get the caption
/// below (upper half of the screen) or above; tall or square ones get it to
/// the right (left half) or left.
pub fn place_caption(highlight: Rect, bounds: Rect, label: Size, gaps: CaptionGaps) -> (f64, f64) {
    if highlight.width > highlight.height {
        let x = highlight.x + highlight.width / 2.0 - label.width / 2.0;
        let y = if highlight.y - bounds.y < bounds.height / 2.0 {
            highlight.bottom() + gaps.after
        } else {
            highlight.y - gaps.before
        };
        (x, y)
    } else {
        let y = highlight.y + highlight.height / 2.0 - label.height / 2.0;
        let x = if highlight.x - bounds.x < bounds.width / 2.0 {
            highlight.right() + gaps.after
        } else {
            highlight.x - label.width - gaps.before
        };
        (x, y)
    }
}
