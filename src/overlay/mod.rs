//! Highlight geometry: the four dimming panels around a cutout, the pixels
//! each panel paints, and where the caption and skip control go.

pub mod anchor;
pub mod paint;
pub mod panels;

pub use anchor::{place_caption, place_skip_control, CaptionGaps, Corner, SkipPlacement};
pub use paint::{edge_for_panel, paint_panel, EdgeDescriptor, HighlightShape, PaintStyle, PanelPixels};
pub use panels::{decompose, Panel, PanelKind, PanelSet};
