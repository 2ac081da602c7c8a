use crate::geometry::{Monitor, Rect, Size};
use crate::overlay::{
    decompose, edge_for_panel, place_caption, place_skip_control, CaptionGaps, HighlightShape,
    PaintStyle, Panel,
};
use crate::session::completion::{completion_pair, Completion, Outcome, Resolver};
use crate::session::surface::{
    ElementId, ElementSpec, ListenerId, ListenerKind, MeasureRequest, OverlaySurface,
    PointerEvent, SurfaceEvent,
};
use crate::settings::OverlaySettings;
use anyhow::{bail, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum HighlightTarget {
    Shape(HighlightShape),
    /// Framed picture centered on the monitor instead of a cutout.
    Image { path: PathBuf, size: Size },
}

/// One tour step. Geometry is in monitor-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightRequest {
    pub target: HighlightTarget,
    pub text: Option<String>,
    pub skippable: bool,
    pub propagate_events: bool,
}

impl HighlightRequest {
    pub fn shape(shape: HighlightShape) -> Self {
        Self {
            target: HighlightTarget::Shape(shape),
            text: None,
            skippable: false,
            propagate_events: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = (!text.is_empty()).then_some(text);
        self
    }

    pub fn skippable(mut self, skippable: bool) -> Self {
        self.skippable = skippable;
        self
    }

    pub fn propagate_events(mut self, propagate: bool) -> Self {
        self.propagate_events = propagate;
        self
    }

    fn is_finite(&self) -> bool {
        match &self.target {
            HighlightTarget::Shape(shape) => shape.bounds().is_finite(),
            HighlightTarget::Image { size, .. } => {
                size.width.is_finite() && size.height.is_finite()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifecycle {
    Idle,
    Active,
}

#[derive(Debug, Default)]
struct Session {
    elements: Vec<ElementId>,
    listeners: Vec<ListenerId>,
    catcher: Option<ListenerId>,
    skip: Option<ListenerId>,
    propagate_events: bool,
    resolver: Option<Resolver>,
}

/// Owns the single live highlight and everything it put on the surface.
pub struct HighlightController {
    surface: Box<dyn OverlaySurface>,
    settings: OverlaySettings,
    session: Option<Session>,
}

impl HighlightController {
    pub fn new(surface: Box<dyn OverlaySurface>, settings: OverlaySettings) -> Self {
        Self {
            surface,
            settings,
            session: None,
        }
    }

    pub fn lifecycle(&self) -> SessionLifecycle {
        if self.session.is_some() {
            SessionLifecycle::Active
        } else {
            SessionLifecycle::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    /// New colors and margins apply from the next step on.
    pub fn apply_settings(&mut self, settings: OverlaySettings) {
        self.settings = settings;
    }

    pub fn surface(&self) -> &dyn OverlaySurface {
        self.surface.as_ref()
    }

    /// Show `request` on `monitor`, replacing whatever step was live. The old
    /// step's completion reads cancelled afterwards.
    ///
    /// A request with non-finite geometry is rejected before the live step is
    /// touched.
    pub fn start(&mut self, monitor: &Monitor, request: HighlightRequest) -> Result<Completion> {
        if !request.is_finite() {
            bail!("highlight geometry must be finite: {:?}", request.target);
        }
        if self.session.is_some() {
            tracing::debug!("superseding live highlight");
            self.teardown();
        }

        let (resolver, completion) = completion_pair();
        let mut session = Session {
            propagate_events: request.propagate_events,
            resolver: Some(resolver),
            ..Session::default()
        };

        if let Err(err) = self.populate(&mut session, monitor, &request) {
            tracing::warn!(?err, "highlight setup failed, rolling back");
            self.release(session);
            return Err(err);
        }

        tracing::info!(
            elements = session.elements.len(),
            listeners = session.listeners.len(),
            "highlight shown"
        );
        self.session = Some(session);
        Ok(completion)
    }

    fn populate(
        &mut self,
        session: &mut Session,
        monitor: &Monitor,
        request: &HighlightRequest,
    ) -> Result<()> {
        let bounds = monitor.local_bounds();
        let anchor = match &request.target {
            HighlightTarget::Shape(shape) => {
                let highlight = shape.bounds();
                let style = PaintStyle::from_settings(&self.settings);
                for panel in decompose(highlight, bounds).iter() {
                    let edge = edge_for_panel(shape, &panel, style.border_width);
                    let spec = ElementSpec::Panel {
                        panel: Panel {
                            kind: panel.kind,
                            rect: monitor.to_stage(panel.rect),
                        },
                        edge,
                        style,
                    };
                    session.elements.push(self.surface.add_element(spec)?);
                }
                highlight
            }
            HighlightTarget::Image { path, size } => {
                let rect = Rect::new(
                    (bounds.width - size.width) / 2.0,
                    (bounds.height - size.height) / 2.0,
                    size.width,
                    size.height,
                );
                let frame = rect.inflate(self.settings.image_margin);
                let spec = ElementSpec::Image {
                    path: path.clone(),
                    rect: monitor.to_stage(rect),
                    frame: monitor.to_stage(frame),
                };
                session.elements.push(self.surface.add_element(spec)?);
                frame
            }
        };

        if let Some(text) = request.text.as_deref() {
            let label = self.surface.measure(MeasureRequest::Caption(text));
            let gaps = CaptionGaps {
                after: self.settings.caption_gap_after,
                before: self.settings.caption_gap_before,
            };
            let origin = place_caption(anchor, bounds, label, gaps);
            let spec = ElementSpec::Caption {
                text: text.to_owned(),
                rect: monitor.to_stage(Rect::from_origin_size(origin, label)),
            };
            session.elements.push(self.surface.add_element(spec)?);
        }

        if request.skippable {
            let label = self.settings.skip_label.clone();
            let control = self.surface.measure(MeasureRequest::SkipButton(&label));
            let placement = place_skip_control(anchor, bounds, control, self.settings.skip_margin);
            tracing::debug!(corner = ?placement.corner, "placed skip control");
            let button = self.surface.add_element(ElementSpec::SkipButton {
                label,
                rect: monitor.to_stage(placement.rect),
            })?;
            session.elements.push(button);
            let listener = self.surface.connect(button, ListenerKind::SkipActivated)?;
            session.listeners.push(listener);
            session.skip = Some(listener);
        }

        if let HighlightTarget::Shape(_) = request.target {
            let catcher = self.surface.add_element(ElementSpec::ClickCatcher {
                rect: monitor.to_stage(anchor),
            })?;
            session.elements.push(catcher);
            let listener = self.surface.connect(catcher, ListenerKind::ButtonPress)?;
            session.listeners.push(listener);
            session.catcher = Some(listener);
        }
        Ok(())
    }

    /// Route a surface event to the live session. Events from listeners the
    /// session does not own are dropped.
    pub fn handle_event(&mut self, event: SurfaceEvent) -> Option<Outcome> {
        let session = self.session.as_ref()?;
        let (outcome, press) = match event {
            SurfaceEvent::ButtonPress { listener, event } if session.catcher == Some(listener) => {
                (Outcome::Activated, Some(event))
            }
            SurfaceEvent::SkipActivated { listener } if session.skip == Some(listener) => {
                (Outcome::Skipped, None)
            }
            other => {
                tracing::debug!(event = ?other, "ignoring event from a stale listener");
                return None;
            }
        };
        let propagate = session.propagate_events;

        self.resolve(outcome);
        if let (Some(press), true) = (press, propagate) {
            self.propagate(&press);
        }
        Some(outcome)
    }

    /// Tear down the live session and fire its completion with `outcome`.
    /// Returns `false` when idle.
    pub fn resolve(&mut self, outcome: Outcome) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        let resolver = session.resolver.take();
        self.release(session);
        if let Some(resolver) = resolver {
            tracing::info!(?outcome, "highlight resolved");
            resolver.fire(outcome);
        }
        true
    }

    /// Remove the live session without an outcome.
    pub fn external_clean(&mut self) -> bool {
        if self.session.is_none() {
            return false;
        }
        self.teardown();
        tracing::info!("highlight cleaned");
        true
    }

    fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            self.release(session);
        }
    }

    fn release(&mut self, session: Session) {
        for listener in session.listeners {
            if let Err(err) = self.surface.disconnect(listener) {
                tracing::warn!(?err, ?listener, "failed to disconnect overlay listener");
            }
        }
        for element in session.elements {
            if let Err(err) = self.surface.remove_element(element) {
                tracing::warn!(?err, ?element, "failed to remove overlay element");
            }
        }
    }

    fn propagate(&mut self, event: &PointerEvent) {
        let Some(target) = self.surface.element_at((event.x, event.y)) else {
            tracing::debug!(x = event.x, y = event.y, "nothing under the pointer to re-dispatch to");
            return;
        };
        if let Err(err) = self.surface.redispatch(target, event) {
            tracing::warn!(?err, ?target, "failed to re-dispatch pointer press");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Circle;
    use crate::session::completion::CompletionState;
    use crate::session::headless::HeadlessSurface;

    fn controller() -> (HighlightController, HeadlessSurface) {
        let surface = HeadlessSurface::new(Monitor::new(0.0, 0.0, 1000.0, 800.0));
        let controller =
            HighlightController::new(Box::new(surface.clone()), OverlaySettings::default());
        (controller, surface)
    }

    fn monitor() -> Monitor {
        Monitor::new(0.0, 0.0, 1000.0, 800.0)
    }

    #[test]
    fn rect_step_adds_panels_and_one_catcher() {
        let (mut controller, surface) = controller();
        let request = HighlightRequest::shape(HighlightShape::Rect(Rect::new(
            10.0, 10.0, 400.0, 200.0,
        )))
        .with_text("Open the menu")
        .skippable(true);
        let mut completion = controller.start(&monitor(), request).unwrap();

        assert!(controller.is_active());
        assert_eq!(completion.poll(), CompletionState::Pending);
        // 4 panels, caption, skip button, catcher
        assert_eq!(surface.element_count(), 7);
        assert_eq!(surface.live_listeners(ListenerKind::ButtonPress), 1);
        assert_eq!(surface.live_listeners(ListenerKind::SkipActivated), 1);
    }

    #[test]
    fn skip_press_resolves_skipped() {
        let (mut controller, surface) = controller();
        let request =
            HighlightRequest::shape(HighlightShape::Circle(Circle::new(100.0, 100.0, 50.0)))
                .skippable(true);
        let mut completion = controller.start(&monitor(), request).unwrap();

        let button = surface
            .elements()
            .into_iter()
            .find_map(|(_, spec)| match spec {
                ElementSpec::SkipButton { rect, .. } => Some(rect),
                _ => None,
            })
            .unwrap();
        let event = surface.press(button.center(), 1).unwrap();
        assert_eq!(controller.handle_event(event), Some(Outcome::Skipped));
        assert_eq!(completion.poll(), CompletionState::Resolved(Outcome::Skipped));
        assert_eq!(surface.element_count(), 0);
        assert!(!controller.is_active());
    }

    #[test]
    fn failed_setup_rolls_back() {
        let (mut controller, surface) = controller();
        surface.fail_adds_after(2);
        let request = HighlightRequest::shape(HighlightShape::Rect(Rect::new(
            10.0, 10.0, 100.0, 100.0,
        )));
        assert!(controller.start(&monitor(), request).is_err());
        assert_eq!(surface.element_count(), 0);
        assert!(!controller.is_active());
    }

    #[test]
    fn non_finite_geometry_is_rejected_and_live_step_kept() {
        let (mut controller, surface) = controller();
        let mut live = controller
            .start(
                &monitor(),
                HighlightRequest::shape(HighlightShape::Rect(Rect::new(10.0, 10.0, 100.0, 100.0))),
            )
            .unwrap();
        let before = surface.element_count();

        for bad in [
            HighlightShape::Rect(Rect::new(f64::NAN, 10.0, 100.0, 100.0)),
            HighlightShape::Rect(Rect::new(10.0, 10.0, f64::INFINITY, 100.0)),
            HighlightShape::Circle(Circle::new(10.0, 10.0, f64::NAN)),
        ] {
            assert!(controller.start(&monitor(), HighlightRequest::shape(bad)).is_err());
        }
        assert_eq!(surface.element_count(), before);
        assert_eq!(controller.lifecycle(), SessionLifecycle::Active);
        assert_eq!(live.poll(), CompletionState::Pending);
    }

    #[test]
    fn failed_supersede_leaves_controller_idle() {
        let (mut controller, surface) = controller();
        let mut first = controller
            .start(
                &monitor(),
                HighlightRequest::shape(HighlightShape::Rect(Rect::new(10.0, 10.0, 100.0, 100.0))),
            )
            .unwrap();
        surface.fail_adds_after(1);
        let request =
            HighlightRequest::shape(HighlightShape::Rect(Rect::new(300.0, 300.0, 50.0, 50.0)));
        assert!(controller.start(&monitor(), request).is_err());
        assert_eq!(first.poll(), CompletionState::Cancelled);
        assert_eq!(controller.lifecycle(), SessionLifecycle::Idle);
        assert_eq!(surface.element_count(), 0);
    }

    #[test]
    fn image_step_has_no_catcher() {
        let (mut controller, surface) = controller();
        let request = HighlightRequest {
            target: HighlightTarget::Image {
                path: PathBuf::from("/tmp/tour.png"),
                size: Size::new(200.0, 100.0),
            },
            text: None,
            skippable: true,
            propagate_events: true,
        };
        controller.start(&monitor(), request).unwrap();

        let image = surface
            .elements()
            .into_iter()
            .find_map(|(_, spec)| match spec {
                ElementSpec::Image { rect, frame, .. } => Some((rect, frame)),
                _ => None,
            })
            .unwrap();
        assert_eq!(image.0, Rect::new(400.0, 350.0, 200.0, 100.0));
        assert_eq!(image.1, Rect::new(368.0, 318.0, 264.0, 164.0));
        assert_eq!(surface.live_listeners(ListenerKind::ButtonPress), 0);
        assert_eq!(surface.live_listeners(ListenerKind::SkipActivated), 1);
    }
}
