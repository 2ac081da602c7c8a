//! Method surface a tour driver talks to. Each highlight call returns a
//! [`Completion`] that settles when the step ends; properties announce
//! every write to subscribers.

pub mod wire;

use crate::fuzzy::{adjust_for_border, parse_pos, parse_size};
use crate::geometry::{Circle, Monitor, Rect};
use crate::overlay::HighlightShape;
use crate::session::{
    Completion, HighlightController, HighlightRequest, HighlightTarget, OverlaySurface, Outcome,
    SurfaceEvent,
};
use crate::settings::OverlaySettings;
use crate::shell::{find_widget, monitor_for_rect, OverviewAction, ShellEnvironment};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::{channel, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    Skippable,
    PropagateEvents,
    IsHighlight,
    /// Write-only signal raised by [`HighlightService::skip`].
    Skip,
}

impl Property {
    pub fn as_str(self) -> &'static str {
        match self {
            Property::Skippable => "Skippable",
            Property::PropagateEvents => "PropagateEvents",
            Property::IsHighlight => "IsHighlight",
            Property::Skip => "Skip",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Skippable" => Ok(Property::Skippable),
            "PropagateEvents" => Ok(Property::PropagateEvents),
            "IsHighlight" => Ok(Property::IsHighlight),
            "Skip" => Ok(Property::Skip),
            other => Err(anyhow!("unknown property {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyChange {
    pub property: Property,
    pub value: bool,
}

pub struct HighlightService<S> {
    controller: HighlightController,
    shell: S,
    skippable: bool,
    propagate_events: bool,
    is_highlight: bool,
    subscribers: Vec<Sender<PropertyChange>>,
}

impl<S: ShellEnvironment> HighlightService<S> {
    pub fn new(surface: Box<dyn OverlaySurface>, shell: S, settings: OverlaySettings) -> Self {
        let skippable = settings.skippable;
        let propagate_events = settings.propagate_events;
        Self {
            controller: HighlightController::new(surface, settings),
            shell,
            skippable,
            propagate_events,
            is_highlight: false,
            subscribers: Vec::new(),
        }
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn controller(&self) -> &HighlightController {
        &self.controller
    }

    pub fn apply_settings(&mut self, settings: OverlaySettings) {
        self.controller.apply_settings(settings);
    }

    pub fn highlight_rect(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        text: &str,
    ) -> Result<Completion> {
        let rect = Rect::new(f64::from(x), f64::from(y), f64::from(width), f64::from(height));
        self.show_shape(HighlightShape::Rect(rect), text)
    }

    pub fn highlight_circle(&mut self, x: u32, y: u32, radius: u32, text: &str) -> Result<Completion> {
        let circle = Circle::new(f64::from(x), f64::from(y), f64::from(radius));
        self.show_shape(HighlightShape::Circle(circle), text)
    }

    /// Highlight the first widget whose style class, name or label is
    /// `class_name`.
    pub fn highlight_widget(&mut self, class_name: &str, text: &str) -> Result<Completion> {
        let found = self
            .shell
            .widget_root()
            .and_then(|root| find_widget(root, class_name))
            .map(|widget| widget.bounds());
        match found {
            Some(bounds) => self.show_stage_rect(bounds, text),
            None => {
                tracing::debug!(class_name, "no widget matches, step unsatisfied");
                Ok(Completion::ready(Outcome::Unsatisfied))
            }
        }
    }

    /// Open the app grid and highlight the icon of `app_id`.
    pub fn highlight_desktop_icon(&mut self, app_id: &str, text: &str) -> Result<Completion> {
        self.shell.overview(OverviewAction::ShowApps);
        let desktop_id = format!("{app_id}.desktop");
        match self.shell.locate_app_icon(&desktop_id) {
            Some(bounds) => self.show_stage_rect(bounds, text),
            None => {
                tracing::debug!(desktop_id = %desktop_id, "app icon not in the grid, step unsatisfied");
                Ok(Completion::ready(Outcome::Unsatisfied))
            }
        }
    }

    pub fn highlight_fuzzy(
        &mut self,
        position: &str,
        size: &str,
        shape: &str,
        text: &str,
    ) -> Result<Completion> {
        let monitor = self.shell.primary_monitor();
        let size = parse_size(size, &monitor);
        let (x, y) = parse_pos(position, size.width, size.height, &monitor);
        let (x, y) = adjust_for_border(
            x,
            y,
            size,
            &monitor,
            self.controller.settings().border_width,
        );
        tracing::debug!(position, x, y, width = size.width, height = size.height, "resolved fuzzy highlight");
        let shape = if shape == "circle" {
            HighlightShape::Circle(Circle::new(x, y, size.width / 2.0))
        } else {
            HighlightShape::Rect(Rect::new(x, y, size.width, size.height))
        };
        self.show_shape(shape, text)
    }

    /// Show a framed image centered on the primary monitor.
    pub fn show_image(&mut self, path: &str, size: &str, text: &str) -> Result<Completion> {
        let monitor = self.shell.primary_monitor();
        let request = HighlightRequest {
            target: HighlightTarget::Image {
                path: PathBuf::from(path),
                size: parse_size(size, &monitor),
            },
            text: None,
            skippable: self.skippable,
            propagate_events: self.propagate_events,
        }
        .with_text(text);
        self.start(&monitor, request)
    }

    /// Unknown method names are ignored.
    pub fn overview(&mut self, method: &str) {
        match method.parse::<OverviewAction>() {
            Ok(action) => self.shell.overview(action),
            Err(err) => tracing::debug!(%err, "ignoring overview call"),
        }
    }

    pub fn clean(&mut self) {
        self.controller.external_clean();
        self.set_is_highlight(false);
    }

    pub fn skip(&mut self) {
        self.emit(Property::Skip, true);
    }

    /// Feed a surface event to the live step.
    pub fn dispatch(&mut self, event: SurfaceEvent) -> Option<Outcome> {
        let outcome = self.controller.handle_event(event)?;
        self.set_is_highlight(false);
        Some(outcome)
    }

    pub fn skippable(&self) -> bool {
        self.skippable
    }

    pub fn set_skippable(&mut self, value: bool) {
        self.skippable = value;
        self.emit(Property::Skippable, value);
    }

    pub fn propagate_events(&self) -> bool {
        self.propagate_events
    }

    pub fn set_propagate_events(&mut self, value: bool) {
        self.propagate_events = value;
        self.emit(Property::PropagateEvents, value);
    }

    pub fn is_highlight(&self) -> bool {
        self.is_highlight
    }

    pub fn set_is_highlight(&mut self, value: bool) {
        self.is_highlight = value;
        self.emit(Property::IsHighlight, value);
    }

    pub fn get_property(&self, property: Property) -> Result<bool> {
        match property {
            Property::Skippable => Ok(self.skippable),
            Property::PropagateEvents => Ok(self.propagate_events),
            Property::IsHighlight => Ok(self.is_highlight),
            Property::Skip => Err(anyhow!("Skip is a signal and cannot be read")),
        }
    }

    pub fn set_property(&mut self, property: Property, value: bool) -> Result<()> {
        match property {
            Property::Skippable => self.set_skippable(value),
            Property::PropagateEvents => self.set_propagate_events(value),
            Property::IsHighlight => self.set_is_highlight(value),
            Property::Skip if value => self.skip(),
            Property::Skip => return Err(anyhow!("Skip can only be raised")),
        }
        Ok(())
    }

    pub fn subscribe(&mut self) -> Receiver<PropertyChange> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, property: Property, value: bool) {
        let change = PropertyChange { property, value };
        tracing::debug!(%property, value, "property changed");
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }

    fn show_stage_rect(&mut self, bounds: Rect, text: &str) -> Result<Completion> {
        let monitor = monitor_for_rect(&self.shell, bounds);
        let local = monitor.to_local(bounds);
        let request = self.request(HighlightShape::Rect(local), text);
        self.start(&monitor, request)
    }

    fn show_shape(&mut self, shape: HighlightShape, text: &str) -> Result<Completion> {
        let monitor = self.shell.primary_monitor();
        let request = self.request(shape, text);
        self.start(&monitor, request)
    }

    fn request(&self, shape: HighlightShape, text: &str) -> HighlightRequest {
        HighlightRequest::shape(shape)
            .with_text(text)
            .skippable(self.skippable)
            .propagate_events(self.propagate_events)
    }

    fn start(&mut self, monitor: &Monitor, request: HighlightRequest) -> Result<Completion> {
        let was_active = self.controller.is_active();
        match self.controller.start(monitor, request) {
            Ok(completion) => {
                self.set_is_highlight(true);
                Ok(completion)
            }
            Err(err) => {
                if was_active {
                    self.set_is_highlight(false);
                }
                Err(err)
            }
        }
    }
}
