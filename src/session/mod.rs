pub mod completion;
pub mod controller;
pub mod headless;
pub mod surface;

pub use completion::{completion_pair, Completion, CompletionState, Outcome, Resolver};
pub use controller::{HighlightController, HighlightRequest, HighlightTarget, SessionLifecycle};
pub use headless::HeadlessSurface;
pub use surface::{
    ElementId, ElementSpec, ListenerId, ListenerKind, MeasureRequest, OverlaySurface,
    PointerEvent, SurfaceEvent,
};
