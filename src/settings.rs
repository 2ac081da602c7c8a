use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OverlayColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl OverlayColor {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_rgba_array(color: [u8; 4]) -> Self {
        Self::rgba(color[0], color[1], color[2], color[3])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlaySettings {
    /// Fill of the dimming panels around the highlight.
    #[serde(default = "default_overlay_color")]
    pub overlay_color: OverlayColor,
    #[serde(default = "default_border_color")]
    pub border_color: OverlayColor,
    /// Stroke width of the highlight border. Fuzzy highlights touching a
    /// monitor edge are pulled inward by the same amount.
    #[serde(default = "default_border_width", alias = "border")]
    pub border_width: f64,
    /// Distance between the skip control and the monitor edges.
    #[serde(default = "default_skip_margin")]
    pub skip_margin: f64,
    #[serde(default = "default_caption_gap_after")]
    pub caption_gap_after: f64,
    #[serde(default = "default_caption_gap_before")]
    pub caption_gap_before: f64,
    /// Padding of the frame drawn around images shown with `ShowImage`.
    #[serde(default = "default_image_margin")]
    pub image_margin: f64,
    #[serde(default = "default_skip_label")]
    pub skip_label: String,
    /// Initial value of the `Skippable` service property.
    #[serde(default = "default_true")]
    pub skippable: bool,
    /// Initial value of the `PropagateEvents` service property.
    #[serde(default = "default_true")]
    pub propagate_events: bool,
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_overlay_color() -> OverlayColor {
    OverlayColor::rgba(0, 0, 0, 200)
}

fn default_border_color() -> OverlayColor {
    OverlayColor::rgba(255, 120, 0, 255)
}

fn default_border_width() -> f64 {
    3.0
}

fn default_skip_margin() -> f64 {
    30.0
}

fn default_caption_gap_after() -> f64 {
    20.0
}

fn default_caption_gap_before() -> f64 {
    30.0
}

fn default_image_margin() -> f64 {
    32.0
}

fn default_skip_label() -> String {
    "Skip".to_owned()
}

fn default_true() -> bool {
    true
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            overlay_color: default_overlay_color(),
            border_color: default_border_color(),
            border_width: default_border_width(),
            skip_margin: default_skip_margin(),
            caption_gap_after: default_caption_gap_after(),
            caption_gap_before: default_caption_gap_before(),
            image_margin: default_image_margin(),
            skip_label: default_skip_label(),
            skippable: true,
            propagate_events: true,
            debug_logging: false,
            log_file: None,
        }
    }
}

impl OverlaySettings {
    /// Load settings from `path`. A missing or empty file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Self = serde_json::from_str(&content)?;
        if settings.sanitize() {
            tracing::warn!(
                path = %path.as_ref().display(),
                "overlay settings contained invalid lengths; defaults were used for them"
            );
        }
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// `<config dir>/tour-overlay/settings.json`, when the platform has a
    /// config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("tour-overlay").join("settings.json"))
    }

    /// Replace negative or non-finite lengths with their defaults. Returns
    /// whether anything changed.
    pub fn sanitize(&mut self) -> bool {
        fn fix(value: &mut f64, fallback: f64) -> bool {
            if value.is_finite() && *value >= 0.0 {
                return false;
            }
            *value = fallback;
            true
        }

        let mut changed = false;
        changed |= fix(&mut self.border_width, default_border_width());
        changed |= fix(&mut self.skip_margin, default_skip_margin());
        changed |= fix(&mut self.caption_gap_after, default_caption_gap_after());
        changed |= fix(&mut self.caption_gap_before, default_caption_gap_before());
        changed |= fix(&mut self.image_margin, default_image_margin());
        changed
    }
}
