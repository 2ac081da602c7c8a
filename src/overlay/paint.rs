use crate::geometry::{Circle, Rect};
use crate::overlay::panels::{Panel, PanelKind};
use crate::settings::{OverlayColor, OverlaySettings};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HighlightShape {
    Rect(Rect),
    Circle(Circle),
}

impl HighlightShape {
    /// Region the panels are cut around and the click catcher covers.
    pub fn bounds(&self) -> Rect {
        match self {
            HighlightShape::Rect(rect) => *rect,
            HighlightShape::Circle(circle) => circle.bounding_square(),
        }
    }
}

/// The part of the highlight border a single panel is responsible for, in
/// that panel's own coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeDescriptor {
    Segment { start: (f64, f64), end: (f64, f64) },
    Arc { center: (f64, f64), radius: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintStyle {
    pub overlay: OverlayColor,
    pub border: OverlayColor,
    pub border_width: f64,
}

impl PaintStyle {
    pub fn from_settings(settings: &OverlaySettings) -> Self {
        Self {
            overlay: settings.overlay_color,
            border: settings.border_color,
            border_width: settings.border_width,
        }
    }
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self::from_settings(&OverlaySettings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelPixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PanelPixels {
    pub fn filled(width: u32, height: u32, color: OverlayColor) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        let mut rgba = vec![0; len];
        for px in rgba.chunks_exact_mut(4) {
            px.copy_from_slice(&color.to_rgba_array());
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = self.rgba.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        if let Some(px) = self.rgba.get_mut(idx..idx + 4) {
            px.copy_from_slice(&color);
        }
    }

    fn blend_pixel(&mut self, x: u32, y: u32, color: OverlayColor) {
        if let Some(dst) = self.pixel(x, y) {
            self.set_pixel(x, y, blend_over(color.to_rgba_array(), dst));
        }
    }

    /// Pixel index range covering `[min, max]` in continuous coordinates,
    /// clipped to `limit`.
    fn span(min: f64, max: f64, limit: u32) -> std::ops::Range<u32> {
        let start = min.floor().max(0.0);
        let end = max.ceil().max(0.0).min(f64::from(limit));
        if end <= start {
            return 0..0;
        }
        start as u32..end as u32
    }
}

/// Source-over blend in straight (non-premultiplied) alpha.
fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= f32::EPSILON {
        return [0, 0, 0, 0];
    }
    let mut out = [0_u8; 4];
    for channel in 0..3 {
        let s = f32::from(src[channel]);
        let d = f32::from(dst[channel]);
        out[channel] = ((s * sa + d * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}

/// Work out which border piece `panel` draws. `shape` and `panel` share a
/// coordinate space; the result is relative to the panel origin.
pub fn edge_for_panel(shape: &HighlightShape, panel: &Panel, border: f64) -> EdgeDescriptor {
    let (ox, oy) = panel.rect.origin();
    let local = |p: (f64, f64)| (p.0 - ox, p.1 - oy);

    match shape {
        HighlightShape::Rect(rect) => {
            // Offsetting by half the border puts the stroke just outside the
            // highlight; top and bottom strokes run past the corners so the
            // side strokes can stop at the highlight's rows.
            let half = border / 2.0;
            let (start, end) = match panel.kind {
                PanelKind::Top => (
                    (rect.x - half, rect.y - half),
                    (rect.right() + half, rect.y - half),
                ),
                PanelKind::Bottom => (
                    (rect.x - half, rect.bottom() + half),
                    (rect.right() + half, rect.bottom() + half),
                ),
                PanelKind::Left => ((rect.x - half, rect.y), (rect.x - half, rect.bottom())),
                PanelKind::Right => (
                    (rect.right() + half, rect.y),
                    (rect.right() + half, rect.bottom()),
                ),
            };
            EdgeDescriptor::Segment {
                start: local(start),
                end: local(end),
            }
        }
        HighlightShape::Circle(circle) => EdgeDescriptor::Arc {
            center: local(circle.center()),
            radius: circle.radius + border,
        },
    }
}

/// Produce the pixels of one panel: the dim fill plus its share of the
/// highlight border.
///
/// The buffer covers [`Rect::snap_to_pixels`] of the panel rect, so its first
/// pixel sits at the rounded panel origin.
pub fn paint_panel(panel: &Panel, edge: &EdgeDescriptor, style: &PaintStyle) -> PanelPixels {
    let (x0, y0, width, height) = panel.rect.snap_to_pixels();
    let mut pixels = PanelPixels::filled(width, height, style.overlay);
    if width == 0 || height == 0 {
        return pixels;
    }

    // edge coordinates are relative to the unrounded origin
    let (dx, dy) = (panel.rect.x - x0 as f64, panel.rect.y - y0 as f64);
    let shift = |p: (f64, f64)| (p.0 + dx, p.1 + dy);
    match *edge {
        EdgeDescriptor::Segment { start, end } => {
            stroke_segment(&mut pixels, shift(start), shift(end), style.border_width, style.border);
        }
        EdgeDescriptor::Arc { center, radius } => {
            clear_disc(&mut pixels, shift(center), radius);
            stroke_ring(&mut pixels, shift(center), radius, style.border_width, style.border);
        }
    }
    pixels
}

/// Straight stroke with square caps: the covered area extends half the
/// stroke width past both endpoints.
fn stroke_segment(
    pixels: &mut PanelPixels,
    start: (f64, f64),
    end: (f64, f64),
    stroke_width: f64,
    color: OverlayColor,
) {
    let half = stroke_width / 2.0;
    if half <= 0.0 {
        return;
    }
    let (vx, vy) = (end.0 - start.0, end.1 - start.1);
    let len = (vx * vx + vy * vy).sqrt();
    let (ux, uy) = if len <= f64::EPSILON {
        (1.0, 0.0)
    } else {
        (vx / len, vy / len)
    };

    let xs = PanelPixels::span(start.0.min(end.0) - half, start.0.max(end.0) + half, pixels.width);
    let ys = PanelPixels::span(start.1.min(end.1) - half, start.1.max(end.1) + half, pixels.height);
    for y in ys {
        for x in xs.clone() {
            let px = f64::from(x) + 0.5 - start.0;
            let py = f64::from(y) + 0.5 - start.1;
            let along = px * ux + py * uy;
            let across = (px * uy - py * ux).abs();
            if along >= -half && along <= len + half && across <= half {
                pixels.blend_pixel(x, y, color);
            }
        }
    }
}

fn clear_disc(pixels: &mut PanelPixels, center: (f64, f64), radius: f64) {
    let xs = PanelPixels::span(center.0 - radius, center.0 + radius, pixels.width);
    let ys = PanelPixels::span(center.1 - radius, center.1 + radius, pixels.height);
    let radius_sq = radius * radius;
    for y in ys {
        for x in xs.clone() {
            let dx = f64::from(x) + 0.5 - center.0;
            let dy = f64::from(y) + 0.5 - center.1;
            if dx * dx + dy * dy <= radius_sq {
                pixels.set_pixel(x, y, [0, 0, 0, 0]);
            }
        }
    }
}

fn stroke_ring(
    pixels: &mut PanelPixels,
    center: (f64, f64),
    radius: f64,
    stroke_width: f64,
    color: OverlayColor,
) {
    let half = stroke_width / 2.0;
    let outer = radius + half;
    let xs = PanelPixels::span(center.0 - outer, center.0 + outer, pixels.width);
    let ys = PanelPixels::span(center.1 - outer, center.1 + outer, pixels.height);
    for y in ys {
        for x in xs.clone() {
            let dx = f64::from(x) + 0.5 - center.0;
            let dy = f64::from(y) + 0.5 - center.1;
            let distance = (dx * dx + dy * dy).sqrt();
            if (distance - radius).abs() <= half {
                pixels.blend_pixel(x, y, color);
            }
        }
    }
}
