pub mod gpu;
pub mod pipeline;

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{AppError, AppResult};
use crate::text::font::FontFace;
use crate::world::Rect;

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    pub const RED: Self = Self([1.0, 0.0, 0.0, 1.0]);

    /// Build from 8-bit channels.
    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0])
    }

    /// Back to 8-bit channels (rounded, clamped).
    pub fn to_rgba8(self) -> [u8; 4] {
        self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

// ── Image handles ──────────────────────────────────────────────────────────

/// Opaque id of a texture living inside a [`RenderBackend`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// One loaded image: the texture plus its pixel size.
///
/// This is a handle; the texture itself belongs to the [`Graphics`] resource
/// list and is destroyed through it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub texture: TextureId,
    pub width: u32,
    pub height: u32,
}

/// Mirroring applied by [`RenderBackend::copy_ex`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

// ── RenderBackend ──────────────────────────────────────────────────────────

/// Drawing context bound to a window.
///
/// Draw calls are recorded in order and shown by `present`. The draw color
/// is sticky: it applies to every following `clear` and `fill_rect`.
pub trait RenderBackend {
    /// Upload a CPU surface and return its texture id.
    fn create_texture(&mut self, pixels: &RgbaImage) -> AppResult<TextureId>;
    fn destroy_texture(&mut self, id: TextureId);
    /// Current drawable size in pixels.
    fn output_size(&self) -> (u32, u32);

    fn set_draw_color(&mut self, color: Color);
    /// Fill the whole frame with the draw color.
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect);
    fn copy(&mut self, texture: TextureId, dst: Rect) {
        self.copy_ex(texture, dst, 0.0, Flip::None);
    }
    /// Draw `texture` stretched over `dst`, rotated clockwise by
    /// `angle_degrees` around the centre of `dst`.
    fn copy_ex(&mut self, texture: TextureId, dst: Rect, angle_degrees: f64, flip: Flip);
    fn present(&mut self);
}

// ── Graphics ───────────────────────────────────────────────────────────────

/// Owns the renderer and every image loaded through it.
pub struct Graphics<B: RenderBackend> {
    pub renderer: B,
    images: Vec<Image>,
    font_dir: PathBuf,
}

impl<B: RenderBackend> Graphics<B> {
    pub fn new(renderer: B, font_dir: impl Into<PathBuf>) -> Self {
        Self { renderer, images: Vec::new(), font_dir: font_dir.into() }
    }

    /// Images currently owned by this context.
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Decode the image at `path`, upload it, and keep it until teardown.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> AppResult<Image> {
        let path = path.as_ref();
        let surface = image::open(path)
            .map_err(|source| AppError::ImageLoad { path: path.to_path_buf(), source })?
            .to_rgba8();
        let image = self.upload(&surface)?;
        log::debug!("loaded {} ({}x{})", path.display(), image.width, image.height);
        Ok(image)
    }

    /// Rasterise `text` with font `font_name` at `font_size` px per em and
    /// upload it. The font is opened from disk on every call, as
    /// `<font_dir>/<font_name>.ttf` or, failing that, `.json`.
    pub fn create_text_image(
        &mut self,
        text: &str,
        font_name: &str,
        font_size: f32,
        color: Color,
    ) -> AppResult<Image> {
        let face = FontFace::open(&self.font_dir, font_name)?;
        let surface = face.rasterize(text, font_size, color)?;
        self.upload(&surface)
    }

    fn upload(&mut self, surface: &RgbaImage) -> AppResult<Image> {
        let texture = self.renderer.create_texture(surface)?;
        let image = Image { texture, width: surface.width(), height: surface.height() };
        self.images.push(image);
        Ok(image)
    }

    /// Destroy one image now. Handles that are not (or no longer) owned by
    /// this context are ignored.
    pub fn release_image(&mut self, image: &Image) {
        if let Some(pos) = self.images.iter().position(|i| i.texture == image.texture) {
            let image = self.images.remove(pos);
            self.renderer.destroy_texture(image.texture);
        }
    }

    pub fn destroy_images(&mut self) {
        for image in self.images.drain(..) {
            self.renderer.destroy_texture(image.texture);
        }
    }

    /// Tear down: destroy every remaining image and hand the renderer back.
    /// Dropping the returned renderer closes the window.
    pub fn destroy(mut self) -> B {
        log::debug!("destroying {} images", self.images.len());
        self.destroy_images();
        self.renderer
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_round_trips_channels() {
        let c = Color::rgba8(0, 128, 255, 120);
        assert_eq!(c.to_rgba8(), [0, 128, 255, 120]);
    }

    #[test]
    fn to_rgba8_clamps() {
        assert_eq!(Color([2.0, -1.0, 0.5, 1.0]).to_rgba8(), [255, 0, 128, 255]);
    }
}
