use std::path::Path;

use ab_glyph::{Font as _, FontVec, PxScale, PxScaleFont, ScaleFont, point};
use image::{Rgba, RgbaImage};

use crate::error::{AppError, AppResult};
use crate::graphics::Color;

/// An outline (TrueType/OpenType) font loaded from disk.
///
/// Sizes are pixels per em, i.e. a point size at 72 DPI, so a 12 px font
/// has an em square 12 px tall and a line slightly taller than that.
pub struct TrueTypeFace {
    font: FontVec,
}

impl TrueTypeFace {
    pub fn open(path: &Path) -> AppResult<Self> {
        let fail = |reason: String| AppError::Font { path: path.to_path_buf(), reason };
        let data = std::fs::read(path).map_err(|e| fail(e.to_string()))?;
        Self::from_bytes(data).map_err(fail)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, String> {
        let font = FontVec::try_from_vec(data).map_err(|e| format!("not a usable font file ({e})"))?;
        Ok(Self { font })
    }

    /// `ab_glyph` scales by line height (ascent - descent); convert from em size.
    pub fn px_scale(&self, font_size: f32) -> PxScale {
        let height = self
            .font
            .units_per_em()
            .map_or(font_size, |upem| font_size * self.font.height_unscaled() / upem);
        PxScale::from(height)
    }

    fn scaled(&self, font_size: f32) -> PxScaleFont<&FontVec> {
        self.font.as_scaled(self.px_scale(font_size))
    }

    /// Natural pixel size of `text`: the widest line's advances (with
    /// kerning) by one ascent-to-descent height per line, plus the line gap
    /// between lines.
    pub fn measure(&self, text: &str, font_size: f32) -> (u32, u32) {
        let scaled = self.scaled(font_size);

        let mut widest = 0.0f32;
        let mut lines = 0u32;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(line_width(&scaled, line));
        }

        let height = scaled.height() * lines as f32 + scaled.line_gap() * (lines - 1) as f32;
        (widest.ceil() as u32, height.ceil() as u32)
    }

    /// Render `text` antialiased into a surface of exactly [`Self::measure`]
    /// size. Coverage scales the alpha of `color`.
    pub fn rasterize(&self, text: &str, font_size: f32, color: Color) -> AppResult<RgbaImage> {
        let (width, height) = self.measure(text, font_size);
        if width == 0 || height == 0 {
            return Err(AppError::TextRender(format!("text {text:?} has zero width")));
        }

        let scaled = self.scaled(font_size);
        let [r, g, b, a] = color.to_rgba8();
        let line_step = scaled.height() + scaled.line_gap();
        let mut surface = RgbaImage::new(width, height);

        for (line_no, line) in text.split('\n').enumerate() {
            let baseline = line_no as f32 * line_step + scaled.ascent();
            let mut cursor_x = 0.0f32;
            let mut prev = None;

            for ch in line.chars() {
                let id = scaled.glyph_id(ch);
                if let Some(prev) = prev {
                    cursor_x += scaled.kern(prev, id);
                }
                prev = Some(id);

                let glyph = id.with_scale_and_position(scaled.scale(), point(cursor_x, baseline));
                cursor_x += scaled.h_advance(id);

                // Whitespace has no outline.
                let Some(outlined) = scaled.outline_glyph(glyph) else {
                    continue;
                };
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px = bounds.min.x as i64 + gx as i64;
                    let py = bounds.min.y as i64 + gy as i64;
                    if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                        return;
                    }
                    let alpha = (coverage.clamp(0.0, 1.0) * a as f32).round() as u8;
                    let dst = surface.get_pixel_mut(px as u32, py as u32);
                    if alpha > dst.0[3] {
                        *dst = Rgba([r, g, b, alpha]);
                    }
                });
            }
        }

        Ok(surface)
    }
}

fn line_width(scaled: &PxScaleFont<&FontVec>, line: &str) -> f32 {
    let mut width = 0.0;
    let mut prev = None;
    for ch in line.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_rejected() {
        assert!(TrueTypeFace::from_bytes(b"not a font at all".to_vec()).is_err());
    }

    #[test]
    fn px_scale_is_taller_than_em() {
        let data = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf").to_vec();
        let face = TrueTypeFace::from_bytes(data).unwrap();
        let scale = face.px_scale(12.0);
        assert!(scale.y > 12.0 && scale.y < 16.0, "{scale:?}");
    }
}
