use std::path::Path;

use image::RgbaImage;

use super::bitmap::{self, BitmapFace};
use super::truetype::TrueTypeFace;
use crate::error::{AppError, AppResult};
use crate::graphics::Color;

/// A font opened by name from a font directory.
///
/// `<name>.ttf` is preferred; `<name>.json` (a bitmap glyph table next to
/// its PNG atlas) is the fallback.
pub enum FontFace {
    TrueType(TrueTypeFace),
    Bitmap(BitmapFace),
}

impl FontFace {
    pub fn open(font_dir: &Path, name: &str) -> AppResult<Self> {
        let ttf = font_dir.join(format!("{name}.ttf"));
        if ttf.is_file() {
            return TrueTypeFace::open(&ttf).map(FontFace::TrueType);
        }
        let json = font_dir.join(format!("{name}.json"));
        if json.is_file() {
            return BitmapFace::open(&json).map(FontFace::Bitmap);
        }
        Err(AppError::Font {
            path: ttf,
            reason: format!("no {name}.ttf or {name}.json in {}", font_dir.display()),
        })
    }

    /// Natural pixel size of `text` at `font_size`.
    pub fn measure(&self, text: &str, font_size: f32) -> (u32, u32) {
        match self {
            FontFace::TrueType(face) => face.measure(text, font_size),
            FontFace::Bitmap(face) => face.measure(text, font_size),
        }
    }

    /// Render `text` into a surface of exactly [`Self::measure`] size.
    pub fn rasterize(&self, text: &str, font_size: f32, color: Color) -> AppResult<RgbaImage> {
        match self {
            FontFace::TrueType(face) => face.rasterize(text, font_size, color),
            FontFace::Bitmap(face) => bitmap::rasterize(text, face, font_size, color),
        }
    }
}
