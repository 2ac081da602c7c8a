//! In-memory [`OverlaySurface`] for the headless daemon and for tests.
//!
//! Elements stack in insertion order. Host widgets (the UI underneath the
//! overlay) sit below every overlay element and only matter for picking and
//! event re-dispatch. Panels are rasterized on demand when a snapshot is
//! taken.

use crate::geometry::{Monitor, Rect, Size};
use crate::overlay::{paint_panel, Panel};
use crate::session::surface::{
    ElementId, ElementSpec, ListenerId, ListenerKind, MeasureRequest, OverlaySurface,
    PointerEvent, SurfaceEvent,
};
use anyhow::{anyhow, Context, Result};
use image::{Rgba, RgbaImage};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::rc::Rc;

const CHAR_WIDTH: f64 = 9.0;
const LINE_HEIGHT: f64 = 20.0;
const BUTTON_PADDING_X: f64 = 16.0;
const BUTTON_HEIGHT: f64 = 36.0;

const CAPTION_OUTLINE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BUTTON_FILL: Rgba<u8> = Rgba([60, 60, 60, 255]);
const IMAGE_FRAME: Rgba<u8> = Rgba([30, 30, 30, 230]);

#[derive(Debug, Clone, PartialEq)]
struct HostWidget {
    name: String,
    rect: Rect,
}

#[derive(Debug, Default)]
struct HeadlessState {
    monitor: Monitor,
    next_id: u64,
    elements: BTreeMap<ElementId, ElementSpec>,
    host_widgets: BTreeMap<ElementId, HostWidget>,
    listeners: HashMap<ListenerId, (ElementId, ListenerKind)>,
    connects: HashMap<ListenerKind, usize>,
    disconnects: HashMap<ListenerKind, usize>,
    redispatched: Vec<(ElementId, PointerEvent)>,
    remaining_adds: Option<usize>,
}

impl HeadlessState {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn overlay_at(&self, point: (f64, f64)) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|(_, spec)| spec.is_reactive() && spec.rect().contains_point(point))
            .map(|(id, _)| *id)
    }

    fn host_at(&self, point: (f64, f64)) -> Option<ElementId> {
        // Later host widgets are children of earlier ones, so the deepest
        // match wins.
        self.host_widgets
            .iter()
            .rev()
            .find(|(_, widget)| widget.rect.contains_point(point))
            .map(|(id, _)| *id)
    }
}

/// Cloning yields another handle to the same surface, so the host loop can
/// keep one while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessSurface {
    pub fn new(monitor: Monitor) -> Self {
        let surface = Self::default();
        surface.state.borrow_mut().monitor = monitor;
        surface
    }

    pub fn monitor(&self) -> Monitor {
        self.state.borrow().monitor
    }

    /// Register a piece of underlying UI that can receive re-dispatched
    /// events.
    pub fn add_host_widget(&self, name: impl Into<String>, rect: Rect) -> ElementId {
        let mut state = self.state.borrow_mut();
        let id = ElementId(state.allocate());
        state.host_widgets.insert(
            id,
            HostWidget {
                name: name.into(),
                rect,
            },
        );
        id
    }

    /// Make every `add_element` after the next `count` calls fail.
    pub fn fail_adds_after(&self, count: usize) {
        self.state.borrow_mut().remaining_adds = Some(count);
    }

    /// Translate a pointer press into the event the compositor would emit.
    /// Presses on reactive elements without a listener are swallowed.
    pub fn press(&self, point: (f64, f64), button: u32) -> Option<SurfaceEvent> {
        let state = self.state.borrow();
        let target = state.overlay_at(point)?;
        let (listener, kind) = state
            .listeners
            .iter()
            .filter(|(_, (element, _))| *element == target)
            .map(|(listener, (_, kind))| (*listener, *kind))
            .min_by_key(|(listener, _)| *listener)?;
        Some(match kind {
            ListenerKind::ButtonPress => SurfaceEvent::ButtonPress {
                listener,
                event: PointerEvent {
                    x: point.0,
                    y: point.1,
                    button,
                },
            },
            ListenerKind::SkipActivated => SurfaceEvent::SkipActivated { listener },
        })
    }

    pub fn elements(&self) -> Vec<(ElementId, ElementSpec)> {
        self.state
            .borrow()
            .elements
            .iter()
            .map(|(id, spec)| (*id, spec.clone()))
            .collect()
    }

    pub fn element_count(&self) -> usize {
        self.state.borrow().elements.len()
    }

    pub fn live_listeners(&self, kind: ListenerKind) -> usize {
        self.state
            .borrow()
            .listeners
            .values()
            .filter(|(_, k)| *k == kind)
            .count()
    }

    pub fn connect_count(&self, kind: ListenerKind) -> usize {
        self.state.borrow().connects.get(&kind).copied().unwrap_or(0)
    }

    pub fn disconnect_count(&self, kind: ListenerKind) -> usize {
        self.state.borrow().disconnects.get(&kind).copied().unwrap_or(0)
    }

    pub fn redispatched(&self) -> Vec<(ElementId, PointerEvent)> {
        self.state.borrow().redispatched.clone()
    }

    /// Compose the visible overlay over a transparent monitor-sized canvas.
    pub fn render(&self) -> RgbaImage {
        let state = self.state.borrow();
        let monitor = state.monitor;
        let mut canvas = RgbaImage::new(
            monitor.width.round().max(0.0) as u32,
            monitor.height.round().max(0.0) as u32,
        );

        for spec in state.elements.values() {
            let local = monitor.to_local(spec.rect());
            match spec {
                ElementSpec::Panel { panel, edge, style } => {
                    let panel = Panel {
                        kind: panel.kind,
                        rect: local,
                    };
                    let pixels = paint_panel(&panel, edge, style);
                    let (x, y, _, _) = local.snap_to_pixels();
                    if let Some(tile) = RgbaImage::from_raw(pixels.width, pixels.height, pixels.rgba) {
                        image::imageops::replace(&mut canvas, &tile, x, y);
                    }
                }
                ElementSpec::Caption { .. } => outline(&mut canvas, local, CAPTION_OUTLINE),
                ElementSpec::SkipButton { .. } => fill(&mut canvas, local, BUTTON_FILL),
                ElementSpec::Image { .. } => fill(&mut canvas, local, IMAGE_FRAME),
                ElementSpec::ClickCatcher { .. } => {}
            }
        }
        canvas
    }

    pub fn write_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.render()
            .save(path)
            .with_context(|| format!("failed to write overlay snapshot to {}", path.display()))
    }
}

fn pixel_span(start: f64, len: f64, limit: u32) -> std::ops::Range<u32> {
    let from = start.round().max(0.0).min(f64::from(limit)) as u32;
    let to = (start + len).round().max(0.0).min(f64::from(limit)) as u32;
    from..to.max(from)
}

fn fill(canvas: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let (w, h) = canvas.dimensions();
    for y in pixel_span(rect.y, rect.height, h) {
        for x in pixel_span(rect.x, rect.width, w) {
            canvas.put_pixel(x, y, color);
        }
    }
}

fn outline(canvas: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let (w, h) = canvas.dimensions();
    let xs = pixel_span(rect.x, rect.width, w);
    let ys = pixel_span(rect.y, rect.height, h);
    for y in ys.clone() {
        for x in xs.clone() {
            let edge = x == xs.start || x + 1 == xs.end || y == ys.start || y + 1 == ys.end;
            if edge {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

impl OverlaySurface for HeadlessSurface {
    fn measure(&self, request: MeasureRequest<'_>) -> Size {
        match request {
            MeasureRequest::Caption(text) => {
                let lines = text.lines().count().max(1);
                let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                Size::new(longest as f64 * CHAR_WIDTH, lines as f64 * LINE_HEIGHT)
            }
            MeasureRequest::SkipButton(label) => Size::new(
                label.chars().count() as f64 * CHAR_WIDTH + BUTTON_PADDING_X * 2.0,
                BUTTON_HEIGHT,
            ),
        }
    }

    fn add_element(&mut self, spec: ElementSpec) -> Result<ElementId> {
        let mut state = self.state.borrow_mut();
        if let Some(remaining) = state.remaining_adds.as_mut() {
            if *remaining == 0 {
                return Err(anyhow!("headless surface refused element"));
            }
            *remaining -= 1;
        }
        let id = ElementId(state.allocate());
        state.elements.insert(id, spec);
        Ok(id)
    }

    fn remove_element(&mut self, id: ElementId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state
            .elements
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("unknown overlay element {id:?}"))
    }

    fn connect(&mut self, element: ElementId, kind: ListenerKind) -> Result<ListenerId> {
        let mut state = self.state.borrow_mut();
        if !state.elements.contains_key(&element) {
            return Err(anyhow!("cannot listen on unknown element {element:?}"));
        }
        let id = ListenerId(state.allocate());
        state.listeners.insert(id, (element, kind));
        *state.connects.entry(kind).or_default() += 1;
        Ok(id)
    }

    fn disconnect(&mut self, listener: ListenerId) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let (_, kind) = state
            .listeners
            .remove(&listener)
            .ok_or_else(|| anyhow!("unknown listener {listener:?}"))?;
        *state.disconnects.entry(kind).or_default() += 1;
        Ok(())
    }

    fn element_at(&self, point: (f64, f64)) -> Option<ElementId> {
        let state = self.state.borrow();
        state.overlay_at(point).or_else(|| state.host_at(point))
    }

    fn redispatch(&mut self, target: ElementId, event: &PointerEvent) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let widget = state
            .host_widgets
            .get(&target)
            .map(|w| w.name.clone())
            .or_else(|| state.elements.get(&target).map(|_| "overlay element".to_owned()))
            .ok_or_else(|| anyhow!("cannot re-dispatch to unknown element {target:?}"))?;
        tracing::debug!(?target, widget = %widget, x = event.x, y = event.y, "re-dispatched pointer press");
        state.redispatched.push((target, *event));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> HeadlessSurface {
        HeadlessSurface::new(Monitor::new(0.0, 0.0, 200.0, 100.0))
    }

    #[test]
    fn press_reports_topmost_listener() {
        let mut surface = surface();
        let below = surface
            .add_element(ElementSpec::ClickCatcher {
                rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            })
            .unwrap();
        let above = surface
            .add_element(ElementSpec::SkipButton {
                label: "Skip".into(),
                rect: Rect::new(10.0, 10.0, 50.0, 20.0),
            })
            .unwrap();
        let catch = surface.connect(below, ListenerKind::ButtonPress).unwrap();
        let skip = surface.connect(above, ListenerKind::SkipActivated).unwrap();

        assert_eq!(
            surface.press((20.0, 20.0), 1),
            Some(SurfaceEvent::SkipActivated { listener: skip })
        );
        assert_eq!(
            surface.press((80.0, 80.0), 1),
            Some(SurfaceEvent::ButtonPress {
                listener: catch,
                event: PointerEvent {
                    x: 80.0,
                    y: 80.0,
                    button: 1
                }
            })
        );
        assert_eq!(surface.press((150.0, 50.0), 1), None);
    }

    #[test]
    fn listener_counters_track_connects_and_disconnects() {
        let mut surface = surface();
        let id = surface
            .add_element(ElementSpec::ClickCatcher {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            })
            .unwrap();
        let listener = surface.connect(id, ListenerKind::ButtonPress).unwrap();
        assert_eq!(surface.live_listeners(ListenerKind::ButtonPress), 1);
        surface.disconnect(listener).unwrap();
        assert_eq!(surface.live_listeners(ListenerKind::ButtonPress), 0);
        assert_eq!(surface.connect_count(ListenerKind::ButtonPress), 1);
        assert_eq!(surface.disconnect_count(ListenerKind::ButtonPress), 1);
        assert!(surface.disconnect(listener).is_err());
    }

    #[test]
    fn element_at_falls_through_to_host_widgets() {
        let surface = surface();
        let button = surface.add_host_widget("apps-button", Rect::new(0.0, 0.0, 40.0, 40.0));
        assert_eq!(surface.element_at((5.0, 5.0)), Some(button));
        assert_eq!(surface.element_at((100.0, 5.0)), None);
    }

    #[test]
    fn measure_scales_with_text() {
        let surface = surface();
        assert_eq!(
            surface.measure(MeasureRequest::Caption("hello")),
            Size::new(45.0, 20.0)
        );
        assert_eq!(
            surface.measure(MeasureRequest::SkipButton("Skip")),
            Size::new(68.0, 36.0)
        );
    }
}
