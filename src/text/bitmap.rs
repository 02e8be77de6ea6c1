use std::collections::HashMap;
use std::path::Path;

use image::{Rgba, RgbaImage};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::graphics::Color;

// ── Glyph ────────────────────────────────────────────────────────────────────

/// Metrics for a single character in the bitmap font atlas.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// The Unicode character this glyph represents.
    pub id: char,
    /// Top-left pixel X of the glyph region in the atlas.
    pub x: u32,
    /// Top-left pixel Y of the glyph region in the atlas.
    pub y: u32,
    /// Pixel width of the glyph region.
    pub width: u32,
    /// Pixel height of the glyph region.
    pub height: u32,
    /// Horizontal offset applied when rendering (may be negative).
    pub x_offset: i32,
    /// Vertical offset applied when rendering (may be negative).
    pub y_offset: i32,
    /// How far to advance the cursor after drawing this glyph.
    pub x_advance: u32,
}

// ── Font ─────────────────────────────────────────────────────────────────────

/// Glyph table of a bitmap font.
pub struct Font {
    /// All glyphs in this font, keyed by character.
    pub glyphs: HashMap<char, Glyph>,
    /// Vertical distance between successive baselines in pixels.
    pub line_height: u32,
    /// Width of the backing atlas in pixels.
    pub texture_width: u32,
    /// Height of the backing atlas in pixels.
    pub texture_height: u32,
}

impl Font {
    /// Deserialise a `Font` from a JSON descriptor.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawFont = serde_json::from_str(json)?;
        Ok(raw.into_font().0)
    }
}

// ── BitmapFace ───────────────────────────────────────────────────────────────

/// A font descriptor together with its decoded atlas.
pub struct BitmapFace {
    pub font: Font,
    pub atlas: RgbaImage,
}

impl BitmapFace {
    /// Open `<name>.json` and the atlas PNG it names (relative to the JSON).
    pub fn open(path: &Path) -> AppResult<Self> {
        let fail = |reason: String| AppError::Font { path: path.to_path_buf(), reason };

        let json = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        let raw: RawFont = serde_json::from_str(&json).map_err(|e| fail(e.to_string()))?;
        let (font, image) = raw.into_font();

        let atlas_path = path.parent().unwrap_or(Path::new("")).join(&image);
        let atlas = image::open(&atlas_path)
            .map_err(|e| fail(format!("atlas {}: {e}", atlas_path.display())))?
            .to_rgba8();

        Self::new(font, atlas).map_err(fail)
    }

    /// Natural pixel size of `text`; see [`measure`].
    pub fn measure(&self, text: &str, font_size: f32) -> (u32, u32) {
        measure(text, &self.font, font_size)
    }

    /// Pair a glyph table with an atlas. The atlas must have the size the
    /// table was built for.
    pub fn new(font: Font, atlas: RgbaImage) -> Result<Self, String> {
        if atlas.dimensions() != (font.texture_width, font.texture_height) {
            return Err(format!(
                "atlas is {}x{}, descriptor expects {}x{}",
                atlas.width(),
                atlas.height(),
                font.texture_width,
                font.texture_height
            ));
        }
        Ok(Self { font, atlas })
    }
}

// ── Rasterising ──────────────────────────────────────────────────────────────

/// Natural pixel size of `text` at `font_size` (the height of one line).
///
/// Width is the widest line's summed advances; height is one scaled line
/// height per `'\n'`-separated line. Characters missing from the font take
/// no space.
pub fn measure(text: &str, font: &Font, font_size: f32) -> (u32, u32) {
    if font.line_height == 0 {
        return (0, 0);
    }
    let scale = font_size / font.line_height as f32;

    let mut widest = 0.0f32;
    let mut lines = 0u32;
    for line in text.split('\n') {
        lines += 1;
        let advance: u32 = line
            .chars()
            .filter_map(|ch| font.glyphs.get(&ch))
            .map(|g| g.x_advance)
            .sum();
        widest = widest.max(advance as f32 * scale);
    }

    let height = font.line_height as f32 * scale * lines as f32;
    (widest.ceil() as u32, height.ceil() as u32)
}

/// Render `text` into a new RGBA surface of exactly [`measure`] size.
///
/// Glyph coverage comes from the atlas alpha channel; covered pixels take
/// `color` with its alpha scaled by coverage. Text with no visible width is
/// an error, as there is nothing to turn into a texture.
pub fn rasterize(text: &str, face: &BitmapFace, font_size: f32, color: Color) -> AppResult<RgbaImage> {
    let font = &face.font;
    if font.line_height == 0 {
        return Err(AppError::TextRender("font has zero line height".into()));
    }
    let (width, height) = measure(text, font, font_size);
    if width == 0 || height == 0 {
        return Err(AppError::TextRender(format!("text {text:?} has zero width")));
    }

    let scale = font_size / font.line_height as f32;
    let [r, g, b, a] = color.to_rgba8();
    let mut surface = RgbaImage::new(width, height);

    for (line_no, line) in text.split('\n').enumerate() {
        let mut cursor_x = 0.0f32;
        let line_y = line_no as f32 * font.line_height as f32 * scale;

        for ch in line.chars() {
            let Some(glyph) = font.glyphs.get(&ch) else {
                continue;
            };

            let quad_x = (cursor_x + glyph.x_offset as f32 * scale).floor() as i64;
            let quad_y = (line_y + glyph.y_offset as f32 * scale).floor() as i64;
            let quad_w = (glyph.width as f32 * scale).ceil() as u32;
            let quad_h = (glyph.height as f32 * scale).ceil() as u32;

            for dy in 0..quad_h {
                let py = quad_y + dy as i64;
                if py < 0 || py >= height as i64 {
                    continue;
                }
                let sy = glyph.y + ((dy as f32 / scale) as u32).min(glyph.height - 1);

                for dx in 0..quad_w {
                    let px = quad_x + dx as i64;
                    if px < 0 || px >= width as i64 {
                        continue;
                    }
                    let sx = glyph.x + ((dx as f32 / scale) as u32).min(glyph.width - 1);
                    let Some(src) = face.atlas.get_pixel_checked(sx, sy) else {
                        continue;
                    };

                    let coverage = src.0[3] as u32;
                    let alpha = (coverage * a as u32 / 255) as u8;
                    let dst = surface.get_pixel_mut(px as u32, py as u32);
                    if alpha > dst.0[3] {
                        *dst = Rgba([r, g, b, alpha]);
                    }
                }
            }

            cursor_x += glyph.x_advance as f32 * scale;
        }
    }

    Ok(surface)
}

// ── Raw (JSON-facing) types ───────────────────────────────────────────────────
//
// Character IDs are stored as u32 in JSON (Unicode code points); we convert
// them to `char` when building the public `Font`.

#[derive(Deserialize)]
struct RawGlyph {
    /// Unicode code point (e.g. 65 for 'A').
    id: u32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    #[serde(default)]
    x_offset: i32,
    #[serde(default)]
    y_offset: i32,
    x_advance: u32,
}

#[derive(Deserialize)]
struct RawFont {
    /// Atlas file name, relative to the descriptor.
    #[serde(default)]
    image: String,
    line_height: u32,
    texture_width: u32,
    texture_height: u32,
    glyphs: Vec<RawGlyph>,
}

impl RawFont {
    fn into_font(self) -> (Font, String) {
        let glyphs = self
            .glyphs
            .into_iter()
            .filter_map(|g| {
                // Skip any code-point that isn't a valid Unicode scalar value.
                char::from_u32(g.id).map(|ch| {
                    (ch, Glyph {
                        id: ch,
                        x: g.x,
                        y: g.y,
                        width: g.width,
                        height: g.height,
                        x_offset: g.x_offset,
                        y_offset: g.y_offset,
                        x_advance: g.x_advance,
                    })
                })
            })
            .collect();

        let font = Font {
            glyphs,
            line_height: self.line_height,
            texture_width: self.texture_width,
            texture_height: self.texture_height,
        };
        (font, self.image)
    }
}
