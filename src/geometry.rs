use serde::{Deserialize, Serialize};

/// Tolerance used when comparing layout coordinates that went through
/// percentage math.
pub const COORD_EPSILON: f64 = 1e-6;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= COORD_EPSILON
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle. Layout code works in monitor-local coordinates;
/// surfaces receive stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: (f64, f64), size: Size) -> Self {
        Self::new(origin.0, origin.1, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains_point(&self, point: (f64, f64)) -> bool {
        point.0 >= self.x && point.0 < self.right() && point.1 >= self.y && point.1 < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x - COORD_EPSILON
            && other.y >= self.y - COORD_EPSILON
            && other.right() <= self.right() + COORD_EPSILON
            && other.bottom() <= self.bottom() + COORD_EPSILON
    }

    /// Overlapping area of two rectangles. Rectangles that only share an
    /// edge do not intersect.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn inflate(&self, amount: f64) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Round each edge to the pixel grid and return `(x, y, width, height)`.
    /// Rects that share an edge snap to the same pixel boundary.
    pub fn snap_to_pixels(&self) -> (i64, i64, u32, u32) {
        let x0 = self.x.round();
        let y0 = self.y.round();
        let x1 = self.right().round().max(x0);
        let y1 = self.bottom().round().max(y0);
        (x0 as i64, y0 as i64, (x1 - x0) as u32, (y1 - y0) as u32)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Circular highlight. `x`/`y` is the top-left corner of the enclosing
/// square, the same origin convention rectangles use.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Circle {
    pub const fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    pub fn square_side(&self) -> f64 {
        std::f64::consts::SQRT_2 * self.radius
    }

    pub fn bounding_square(&self) -> Rect {
        let side = self.square_side();
        Rect::new(self.x, self.y, side, side)
    }

    pub fn center(&self) -> (f64, f64) {
        self.bounding_square().center()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Monitor {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Monitor {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding area for layout math, in monitor-local coordinates.
    pub fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn stage_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn to_stage(&self, local: Rect) -> Rect {
        local.translate(self.x, self.y)
    }

    pub fn to_local(&self, stage: Rect) -> Rect {
        stage.translate(-self.x, -self.y)
    }

    pub fn contains_point(&self, point: (f64, f64)) -> bool {
        self.stage_rect().contains_point(point)
    }
}

pub fn select_monitor_for_point(monitors: &[Monitor], point: (f64, f64)) -> Option<Monitor> {
    monitors
        .iter()
        .copied()
        .find(|monitor| monitor.contains_point(point))
}
