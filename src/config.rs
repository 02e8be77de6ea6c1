use std::path::PathBuf;
use std::time::Duration;

use crate::world::{CELL_SIZE, GRID_COLS, GRID_ROWS};

// ── AppConfig ─────────────────────────────────────────────────────────────────

/// Process-wide settings, fixed at start-up.
///
/// The default window matches the rectangle grid exactly (64 × 48 cells of
/// 10 px), so every grid cell is visible and nothing below it is left blank.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Window title.
    pub title: String,
    /// Window width in physical pixels.
    pub width: u32,
    /// Window height in physical pixels.
    pub height: u32,
    /// Pause between presenting a frame and polling input.
    pub frame_delay: Duration,
    /// Directory holding `icon.png` and `cat.png`.
    pub image_dir: PathBuf,
    /// Directory holding fonts: `<name>.ttf`, or `<name>.json` plus its atlas.
    pub font_dir: PathBuf,
    /// Font used by both text overlays.
    pub font_name: String,
    /// Text size in pixels per em.
    pub font_size: f32,
    /// Linear texture filtering when `true`, nearest-pixel when `false`.
    pub smooth_scaling: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Rect Grid Test Application".into(),
            width: GRID_COLS as u32 * CELL_SIZE,
            height: GRID_ROWS as u32 * CELL_SIZE,
            frame_delay: Duration::from_millis(20),
            image_dir: PathBuf::from("assets/images"),
            font_dir: PathBuf::from("assets/fonts"),
            font_name: "DejaVuSansMono".into(),
            font_size: 12.0,
            smooth_scaling: true,
        }
    }
}

impl AppConfig {
    pub fn with_title(mut self, title: &str) -> Self { self.title = title.into(); self }
    pub fn with_size(mut self, width: u32, height: u32) -> Self { self.width = width; self.height = height; self }
    pub fn with_frame_delay(mut self, delay: Duration) -> Self { self.frame_delay = delay; self }

    /// Point both asset directories under `root` (`root/images`, `root/fonts`).
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.image_dir = root.join("images");
        self.font_dir = root.join("fonts");
        self
    }

    pub fn with_font(mut self, name: &str, size: f32) -> Self {
        self.font_name = name.into();
        self.font_size = size;
        self
    }

    pub fn with_smooth_scaling(mut self, smooth: bool) -> Self { self.smooth_scaling = smooth; self }
}
