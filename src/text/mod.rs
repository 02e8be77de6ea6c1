pub mod bitmap;
pub mod font;
pub mod truetype;

use crate::error::AppResult;
use crate::graphics::{Color, Graphics, Image, RenderBackend};
use crate::world::Rect;

// ── Layout strategies ─────────────────────────────────────────────────────────

/// Decides where a text image goes on screen.
///
/// Re-rendered text usually changes size, so the placement is recomputed
/// from the fresh image after every render.
pub trait TextLayout {
    fn place(&self, image: &Image) -> Rect;
}

/// Centred horizontally, `offset` pixels above the bottom edge of the screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BottomCentered {
    pub screen_width: u32,
    pub screen_height: u32,
    pub offset: u32,
}

impl TextLayout for BottomCentered {
    fn place(&self, image: &Image) -> Rect {
        Rect::new(
            (self.screen_width as i32 - image.width as i32) / 2,
            self.screen_height as i32 - self.offset as i32,
            image.width,
            image.height,
        )
    }
}

// ── TextObject ────────────────────────────────────────────────────────────────

/// Font, size and color of a text object.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font: String,
    pub font_size: f32,
    pub color: Color,
}

/// A string kept on screen as a texture.
///
/// Every `set_text` re-renders the image, releases the previous one and
/// asks the layout for a new rect. The object never owns more than one
/// image at a time.
pub struct TextObject<L: TextLayout> {
    text: String,
    style: TextStyle,
    image: Image,
    rect: Rect,
    layout: L,
}

impl<L: TextLayout> TextObject<L> {
    pub fn new<B: RenderBackend>(
        gfx: &mut Graphics<B>,
        style: TextStyle,
        text: &str,
        layout: L,
    ) -> AppResult<Self> {
        let image = gfx.create_text_image(text, &style.font, style.font_size, style.color)?;
        let rect = layout.place(&image);
        Ok(Self { text: text.to_owned(), style, image, rect, layout })
    }

    /// Replace the text and re-render synchronously.
    pub fn set_text<B: RenderBackend>(&mut self, gfx: &mut Graphics<B>, text: &str) -> AppResult<()> {
        let image = gfx.create_text_image(text, &self.style.font, self.style.font_size, self.style.color)?;
        gfx.release_image(&self.image);
        self.image = image;
        self.text = text.to_owned();
        self.rect = self.layout.place(&self.image);
        Ok(())
    }

    pub fn text(&self) -> &str { &self.text }
    pub fn style(&self) -> &TextStyle { &self.style }
    pub fn image(&self) -> &Image { &self.image }
    pub fn rect(&self) -> Rect { self.rect }
    pub fn layout(&self) -> &L { &self.layout }

    /// Draw the current image at the current rect.
    pub fn draw<B: RenderBackend>(&self, renderer: &mut B) {
        renderer.copy(self.image.texture, self.rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::TextureId;

    fn image(w: u32, h: u32) -> Image {
        Image { texture: TextureId(1), width: w, height: h }
    }

    #[test]
    fn bottom_centered_centres_and_offsets() {
        let layout = BottomCentered { screen_width: 640, screen_height: 480, offset: 80 };
        assert_eq!(layout.place(&image(100, 16)), Rect::new(270, 400, 100, 16));
    }

    #[test]
    fn bottom_centered_wider_than_screen_goes_negative() {
        let layout = BottomCentered { screen_width: 100, screen_height: 100, offset: 10 };
        assert_eq!(layout.place(&image(120, 8)).x, -10);
    }
}
