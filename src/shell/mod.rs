//! The desktop shell the overlay sits on: monitors, the widget tree, the
//! app grid and the overview.

pub mod widgets;

pub use widgets::{find_widget, DescribableNode, WidgetNode};

use crate::geometry::{Monitor, Rect};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverviewAction {
    Toggle,
    Show,
    Hide,
    ShowApps,
}

impl FromStr for OverviewAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "toggle" => Ok(Self::Toggle),
            "show" => Ok(Self::Show),
            "hide" => Ok(Self::Hide),
            "showApps" => Ok(Self::ShowApps),
            other => Err(anyhow!("unknown overview method {other:?}")),
        }
    }
}

pub trait ShellEnvironment {
    fn primary_monitor(&self) -> Monitor;

    fn monitors(&self) -> Vec<Monitor> {
        vec![self.primary_monitor()]
    }

    fn widget_root(&self) -> Option<&dyn DescribableNode>;

    /// Stage rectangle of the app grid icon for `desktop_id`
    /// (e.g. `org.gnome.Nautilus.desktop`).
    fn locate_app_icon(&self, desktop_id: &str) -> Option<Rect>;

    fn overview(&mut self, action: OverviewAction);
}

/// Monitor that contains the center of `rect`, or the primary one.
pub fn monitor_for_rect(shell: &dyn ShellEnvironment, rect: Rect) -> Monitor {
    crate::geometry::select_monitor_for_point(&shell.monitors(), rect.center())
        .unwrap_or_else(|| shell.primary_monitor())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverviewState {
    pub visible: bool,
    pub showing_apps: bool,
}

impl OverviewState {
    fn apply(&mut self, action: OverviewAction) {
        match action {
            OverviewAction::Toggle => {
                self.visible = !self.visible;
                if !self.visible {
                    self.showing_apps = false;
                }
            }
            OverviewAction::Show => self.visible = true,
            OverviewAction::Hide => *self = Self::default(),
            OverviewAction::ShowApps => {
                self.visible = true;
                self.showing_apps = true;
            }
        }
    }
}

fn default_monitors() -> Vec<Monitor> {
    vec![Monitor::new(0.0, 0.0, 1920.0, 1080.0)]
}

/// Fixed shell described by a JSON scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticShell {
    #[serde(default = "default_monitors")]
    pub monitors: Vec<Monitor>,
    #[serde(default)]
    pub primary: usize,
    #[serde(default)]
    pub widgets: Option<WidgetNode>,
    /// App grid icons keyed by desktop file id.
    #[serde(default)]
    pub app_icons: HashMap<String, Rect>,
    #[serde(skip)]
    pub overview: OverviewState,
}

impl Default for StaticShell {
    fn default() -> Self {
        Self {
            monitors: default_monitors(),
            primary: 0,
            widgets: None,
            app_icons: HashMap::new(),
            overview: OverviewState::default(),
        }
    }
}

impl StaticShell {
    pub fn with_monitor(monitor: Monitor) -> Self {
        Self {
            monitors: vec![monitor],
            ..Self::default()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        let mut shell: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scene {}", path.display()))?;
        if shell.monitors.is_empty() {
            shell.monitors = default_monitors();
        }
        if shell.primary >= shell.monitors.len() {
            tracing::warn!(primary = shell.primary, "primary monitor index out of range, using 0");
            shell.primary = 0;
        }
        Ok(shell)
    }
}

impl ShellEnvironment for StaticShell {
    fn primary_monitor(&self) -> Monitor {
        self.monitors
            .get(self.primary)
            .or_else(|| self.monitors.first())
            .copied()
            .unwrap_or_default()
    }

    fn monitors(&self) -> Vec<Monitor> {
        self.monitors.clone()
    }

    fn widget_root(&self) -> Option<&dyn DescribableNode> {
        self.widgets.as_ref().map(|root| root as &dyn DescribableNode)
    }

    fn locate_app_icon(&self, desktop_id: &str) -> Option<Rect> {
        self.app_icons.get(desktop_id).copied()
    }

    fn overview(&mut self, action: OverviewAction) {
        self.overview.apply(action);
        tracing::debug!(?action, state = ?self.overview, "overview updated");
    }
}
