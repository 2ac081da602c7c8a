use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub kind: PanelKind,
    pub rect: Rect,
}

/// The dimming layer around a highlight, split into four rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSet {
    pub top: Panel,
    pub right: Panel,
    pub bottom: Panel,
    pub left: Panel,
}

impl PanelSet {
    pub fn iter(&self) -> impl Iterator<Item = Panel> {
        [self.top, self.right, self.bottom, self.left].into_iter()
    }

    pub fn total_area(&self) -> f64 {
        self.iter().map(|panel| panel.rect.area()).sum()
    }
}

/// Cut `highlight` out of `bounds`. Top and bottom span the whole width;
/// left and right only cover the highlight's rows, so no two panels share
/// a pixel. Panels on an edge the highlight touches come out empty.
pub fn decompose(highlight: Rect, bounds: Rect) -> PanelSet {
    let top_height = (highlight.y - bounds.y).max(0.0);
    let bottom_height = (bounds.bottom() - highlight.bottom()).max(0.0);
    let left_width = (highlight.x - bounds.x).max(0.0);
    let right_width = (bounds.right() - highlight.right()).max(0.0);

    PanelSet {
        top: Panel {
            kind: PanelKind::Top,
            rect: Rect::new(bounds.x, bounds.y, bounds.width, top_height),
        },
        right: Panel {
            kind: PanelKind::Right,
            rect: Rect::new(highlight.right(), highlight.y, right_width, highlight.height),
        },
        bottom: Panel {
            kind: PanelKind::Bottom,
            rect: Rect::new(bounds.x, highlight.bottom(), bounds.width, bottom_height),
        },
        left: Panel {
            kind: PanelKind::Left,
            rect: Rect::new(bounds.x, highlight.y, left_width, highlight.height),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_surround_highlight() {
        let bounds = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let panels = decompose(Rect::new(10.0, 10.0, 400.0, 200.0), bounds);
        assert_eq!(panels.top.rect, Rect::new(0.0, 0.0, 1000.0, 10.0));
        assert_eq!(panels.bottom.rect, Rect::new(0.0, 210.0, 1000.0, 590.0));
        assert_eq!(panels.left.rect, Rect::new(0.0, 10.0, 10.0, 200.0));
        assert_eq!(panels.right.rect, Rect::new(410.0, 10.0, 590.0, 200.0));
    }

    #[test]
    fn highlight_on_corner_leaves_empty_panels() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let panels = decompose(Rect::new(0.0, 0.0, 50.0, 50.0), bounds);
        assert!(panels.top.rect.is_empty());
        assert!(panels.left.rect.is_empty());
        assert_eq!(panels.total_area() + 2500.0, bounds.area());
    }

    #[test]
    fn offset_bounds_are_respected() {
        let bounds = Rect::new(100.0, 50.0, 200.0, 100.0);
        let panels = decompose(Rect::new(150.0, 70.0, 20.0, 20.0), bounds);
        assert_eq!(panels.top.rect, Rect::new(100.0, 50.0, 200.0, 20.0));
        assert_eq!(panels.left.rect, Rect::new(100.0, 70.0, 50.0, 20.0));
        assert_eq!(panels.right.rect, Rect::new(170.0, 70.0, 130.0, 20.0));
        assert_eq!(panels.bottom.rect, Rect::new(100.0, 90.0, 200.0, 60.0));
    }
}
