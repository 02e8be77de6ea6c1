// Shared fixtures: a recording render backend and an on-disk asset tree.
#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use image::{Rgba, RgbaImage};
use rectgrid::graphics::{Color, Flip, RenderBackend, TextureId};
use rectgrid::world::Rect;
use rectgrid::{AppError, AppResult};

// ── Recording backend ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    SetDrawColor(Color),
    Clear,
    FillRect(Rect),
    Copy { texture: TextureId, dst: Rect, angle: f64, flip: Flip },
    Present,
}

/// Records every draw call and tracks texture lifetimes.
pub struct RecordingBackend {
    pub size: (u32, u32),
    pub calls: Vec<Call>,
    pub live: BTreeSet<TextureId>,
    pub destroyed: HashMap<TextureId, u32>,
    pub uploads: Vec<(TextureId, u32, u32)>,
    next: u64,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            calls: Vec::new(),
            live: BTreeSet::new(),
            destroyed: HashMap::new(),
            uploads: Vec::new(),
            next: 1,
        }
    }

    /// Calls recorded since the last `Present` (exclusive), i.e. one frame.
    pub fn last_frame(&self) -> &[Call] {
        let end = self.calls.iter().rposition(|c| *c == Call::Present).unwrap_or(self.calls.len());
        let start = self.calls[..end].iter().rposition(|c| *c == Call::Present).map_or(0, |i| i + 1);
        &self.calls[start..end]
    }
}

impl RenderBackend for RecordingBackend {
    fn create_texture(&mut self, pixels: &RgbaImage) -> AppResult<TextureId> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(AppError::Texture("empty surface".into()));
        }
        let id = TextureId(self.next);
        self.next += 1;
        self.live.insert(id);
        self.uploads.push((id, pixels.width(), pixels.height()));
        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        self.live.remove(&id);
        *self.destroyed.entry(id).or_default() += 1;
    }

    fn output_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_draw_color(&mut self, color: Color) {
        self.calls.push(Call::SetDrawColor(color));
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.calls.push(Call::FillRect(rect));
    }

    fn copy_ex(&mut self, texture: TextureId, dst: Rect, angle_degrees: f64, flip: Flip) {
        self.calls.push(Call::Copy { texture, dst, angle: angle_degrees, flip });
    }

    fn present(&mut self) {
        self.calls.push(Call::Present);
    }
}

// ── Asset fixture ─────────────────────────────────────────────────────────────

pub const ICON_SIZE: (u32, u32) = (24, 24);
pub const CAT_SIZE: (u32, u32) = (40, 32);

/// Glyph cell of the fixture font: every printable ASCII char is a solid
/// 4×8 block advancing 5 px, line height 8.
pub const GLYPH_ADVANCE: u32 = 5;
pub const LINE_HEIGHT: u32 = 8;

/// Bundled TrueType font, copied into every fixture as `mono.ttf`.
pub const TTF_SOURCE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/DejaVuSansMono.ttf");

/// A fresh asset tree (`images/`, `fonts/`) under the system temp dir.
pub struct Assets {
    pub root: PathBuf,
}

impl Assets {
    pub fn new() -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let root = std::env::temp_dir().join(format!(
            "rectgrid-test-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        let images = root.join("images");
        let fonts = root.join("fonts");
        std::fs::create_dir_all(&images).unwrap();
        std::fs::create_dir_all(&fonts).unwrap();

        solid(ICON_SIZE, [255, 0, 0, 255]).save(images.join("icon.png")).unwrap();
        solid(CAT_SIZE, [40, 40, 40, 255]).save(images.join("cat.png")).unwrap();
        write_font(&fonts);
        std::fs::copy(TTF_SOURCE, fonts.join("mono.ttf")).unwrap();

        Self { root }
    }

    pub fn image_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn font_dir(&self) -> PathBuf {
        self.root.join("fonts")
    }
}

impl Drop for Assets {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

fn solid((w, h): (u32, u32), px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(px))
}

fn write_font(dir: &Path) {
    let count = (0x20u32..0x7F).count() as u32;
    let atlas = solid((count * GLYPH_ADVANCE, LINE_HEIGHT), [255, 255, 255, 255]);
    atlas.save(dir.join("block.png")).unwrap();

    let glyphs: Vec<String> = (0x20u32..0x7F)
        .enumerate()
        .map(|(i, id)| {
            format!(
                r#"{{ "id": {id}, "x": {}, "y": 0, "width": 4, "height": {LINE_HEIGHT}, "x_advance": {GLYPH_ADVANCE} }}"#,
                i as u32 * GLYPH_ADVANCE
            )
        })
        .collect();
    let json = format!(
        r#"{{ "image": "block.png", "line_height": {LINE_HEIGHT}, "texture_width": {}, "texture_height": {LINE_HEIGHT}, "glyphs": [{}] }}"#,
        atlas.width(),
        glyphs.join(",\n")
    );
    std::fs::write(dir.join("block.json"), json).unwrap();
}
