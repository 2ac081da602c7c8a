//! Boundary to the compositor that actually shows overlay elements.
//!
//! The controller only talks to an [`OverlaySurface`]: it adds and removes
//! elements, connects listeners, and asks what sits under the pointer. The
//! host turns real input into [`SurfaceEvent`]s and feeds them back to the
//! controller.

use crate::geometry::{Rect, Size};
use crate::overlay::{EdgeDescriptor, PaintStyle, Panel};
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Everything a surface needs to show one overlay element. Rectangles are
/// in stage coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSpec {
    /// Dimming panel. The surface paints it with
    /// [`paint_panel`](crate::overlay::paint_panel) whenever it needs pixels.
    Panel {
        panel: Panel,
        edge: EdgeDescriptor,
        style: PaintStyle,
    },
    Caption {
        text: String,
        rect: Rect,
    },
    SkipButton {
        label: String,
        rect: Rect,
    },
    /// Invisible reactive region over the highlight.
    ClickCatcher {
        rect: Rect,
    },
    Image {
        path: PathBuf,
        rect: Rect,
        frame: Rect,
    },
}

impl ElementSpec {
    pub fn rect(&self) -> Rect {
        match self {
            ElementSpec::Panel { panel, .. } => panel.rect,
            ElementSpec::Caption { rect, .. }
            | ElementSpec::SkipButton { rect, .. }
            | ElementSpec::ClickCatcher { rect } => *rect,
            ElementSpec::Image { frame, .. } => *frame,
        }
    }

    /// Reactive elements swallow pointer input even without a listener.
    pub fn is_reactive(&self) -> bool {
        matches!(
            self,
            ElementSpec::Panel { .. } | ElementSpec::SkipButton { .. } | ElementSpec::ClickCatcher { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureRequest<'a> {
    Caption(&'a str),
    SkipButton(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    ButtonPress,
    SkipActivated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub button: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    ButtonPress {
        listener: ListenerId,
        event: PointerEvent,
    },
    SkipActivated {
        listener: ListenerId,
    },
}

pub trait OverlaySurface {
    /// Natural size of a text element before it is placed.
    fn measure(&self, request: MeasureRequest<'_>) -> Size;
    fn add_element(&mut self, spec: ElementSpec) -> Result<ElementId>;
    fn remove_element(&mut self, id: ElementId) -> Result<()>;
    fn connect(&mut self, element: ElementId, kind: ListenerKind) -> Result<ListenerId>;
    fn disconnect(&mut self, listener: ListenerId) -> Result<()>;
    /// Topmost reactive element at a stage point, overlay or not.
    fn element_at(&self, point: (f64, f64)) -> Option<ElementId>;
    /// Deliver a copy of `event` to `target`.
    fn redispatch(&mut self, target: ElementId, event: &PointerEvent) -> Result<()>;
}
