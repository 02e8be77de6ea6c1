// Generates the demo's sample assets when they are missing:
//   assets/images/icon.png, assets/images/cat.png
//   assets/fonts/mono5x8.png + mono5x8.json (printable ASCII bitmap font)
// Existing files are never overwritten, so they can be replaced by hand.

use std::path::Path;

use image::{Rgba, RgbaImage};

fn draw_bordered_rect(width: u32, height: u32, fill: [u8; 4], border: [u8; 4]) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let on_border = x == 0 || x == width - 1 || y == 0 || y == height - 1;
            img.put_pixel(x, y, Rgba(if on_border { border } else { fill }));
        }
    }
    img
}

fn draw_cat(size: u32) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);
    let fur = Rgba([0x30, 0x30, 0x30, 0xFF]);
    let eye = Rgba([0xF0, 0xD0, 0x20, 0xFF]);
    let s = size as f32;

    let inside_ellipse = |x: f32, y: f32, cx: f32, cy: f32, rx: f32, ry: f32| {
        let dx = (x - cx) / rx;
        let dy = (y - cy) / ry;
        dx * dx + dy * dy <= 1.0
    };

    for y in 0..size {
        for x in 0..size {
            let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
            let body = inside_ellipse(fx, fy, s * 0.55, s * 0.70, s * 0.28, s * 0.20);
            let head = inside_ellipse(fx, fy, s * 0.30, s * 0.38, s * 0.17, s * 0.15);
            // Ears: triangles rising above the head.
            let ear = |tip_x: f32| {
                let top = s * 0.12;
                let base = s * 0.28;
                fy >= top && fy <= base && (fx - tip_x).abs() <= (fy - top) * 0.5
            };
            let ears = ear(s * 0.20) || ear(s * 0.40);
            let tail = fx >= s * 0.78 && fx <= s * 0.86 && fy >= s * 0.30 && fy <= s * 0.68;
            if body || head || ears || tail {
                img.put_pixel(x, y, fur);
            }
        }
    }

    let ey = (s * 0.36) as u32;
    for ex in [(s * 0.24) as u32, (s * 0.36) as u32] {
        img.put_pixel(ex, ey, eye);
        img.put_pixel(ex + 1, ey, eye);
    }
    img
}

/// Column bitmaps (bit 0 = top row) for ' '..='~'.
const GLYPHS_5X8: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], [0x00, 0x00, 0x5F, 0x00, 0x00], [0x00, 0x07, 0x00, 0x07, 0x00],
    [0x14, 0x7F, 0x14, 0x7F, 0x14], [0x24, 0x2A, 0x7F, 0x2A, 0x12], [0x23, 0x13, 0x08, 0x64, 0x62],
    [0x36, 0x49, 0x56, 0x20, 0x50], [0x00, 0x08, 0x07, 0x03, 0x00], [0x00, 0x1C, 0x22, 0x41, 0x00],
    [0x00, 0x41, 0x22, 0x1C, 0x00], [0x2A, 0x1C, 0x7F, 0x1C, 0x2A], [0x08, 0x08, 0x3E, 0x08, 0x08],
    [0x00, 0x80, 0x70, 0x30, 0x00], [0x08, 0x08, 0x08, 0x08, 0x08], [0x00, 0x00, 0x60, 0x60, 0x00],
    [0x20, 0x10, 0x08, 0x04, 0x02], [0x3E, 0x51, 0x49, 0x45, 0x3E], [0x00, 0x42, 0x7F, 0x40, 0x00],
    [0x72, 0x49, 0x49, 0x49, 0x46], [0x21, 0x41, 0x49, 0x4D, 0x33], [0x18, 0x14, 0x12, 0x7F, 0x10],
    [0x27, 0x45, 0x45, 0x45, 0x39], [0x3C, 0x4A, 0x49, 0x49, 0x31], [0x41, 0x21, 0x11, 0x09, 0x07],
    [0x36, 0x49, 0x49, 0x49, 0x36], [0x46, 0x49, 0x49, 0x29, 0x1E], [0x00, 0x00, 0x14, 0x00, 0x00],
    [0x00, 0x40, 0x34, 0x00, 0x00], [0x00, 0x08, 0x14, 0x22, 0x41], [0x14, 0x14, 0x14, 0x14, 0x14],
    [0x00, 0x41, 0x22, 0x14, 0x08], [0x02, 0x01, 0x59, 0x09, 0x06], [0x3E, 0x41, 0x5D, 0x59, 0x4E],
    [0x7C, 0x12, 0x11, 0x12, 0x7C], [0x7F, 0x49, 0x49, 0x49, 0x36], [0x3E, 0x41, 0x41, 0x41, 0x22],
    [0x7F, 0x41, 0x41, 0x41, 0x3E], [0x7F, 0x49, 0x49, 0x49, 0x41], [0x7F, 0x09, 0x09, 0x09, 0x01],
    [0x3E, 0x41, 0x41, 0x51, 0x73], [0x7F, 0x08, 0x08, 0x08, 0x7F], [0x00, 0x41, 0x7F, 0x41, 0x00],
    [0x20, 0x40, 0x41, 0x3F, 0x01], [0x7F, 0x08, 0x14, 0x22, 0x41], [0x7F, 0x40, 0x40, 0x40, 0x40],
    [0x7F, 0x02, 0x1C, 0x02, 0x7F], [0x7F, 0x04, 0x08, 0x10, 0x7F], [0x3E, 0x41, 0x41, 0x41, 0x3E],
    [0x7F, 0x09, 0x09, 0x09, 0x06], [0x3E, 0x41, 0x51, 0x21, 0x5E], [0x7F, 0x09, 0x19, 0x29, 0x46],
    [0x26, 0x49, 0x49, 0x49, 0x32], [0x03, 0x01, 0x7F, 0x01, 0x03], [0x3F, 0x40, 0x40, 0x40, 0x3F],
    [0x1F, 0x20, 0x40, 0x20, 0x1F], [0x3F, 0x40, 0x38, 0x40, 0x3F], [0x63, 0x14, 0x08, 0x14, 0x63],
    [0x03, 0x04, 0x78, 0x04, 0x03], [0x61, 0x59, 0x49, 0x4D, 0x43], [0x00, 0x7F, 0x41, 0x41, 0x41],
    [0x02, 0x04, 0x08, 0x10, 0x20], [0x00, 0x41, 0x41, 0x41, 0x7F], [0x04, 0x02, 0x01, 0x02, 0x04],
    [0x40, 0x40, 0x40, 0x40, 0x40], [0x00, 0x03, 0x07, 0x08, 0x00], [0x20, 0x54, 0x54, 0x78, 0x40],
    [0x7F, 0x28, 0x44, 0x44, 0x38], [0x38, 0x44, 0x44, 0x44, 0x28], [0x38, 0x44, 0x44, 0x28, 0x7F],
    [0x38, 0x54, 0x54, 0x54, 0x18], [0x00, 0x08, 0x7E, 0x09, 0x02], [0x18, 0xA4, 0xA4, 0x9C, 0x78],
    [0x7F, 0x08, 0x04, 0x04, 0x78], [0x00, 0x44, 0x7D, 0x40, 0x00], [0x20, 0x40, 0x40, 0x3D, 0x00],
    [0x7F, 0x10, 0x28, 0x44, 0x00], [0x00, 0x41, 0x7F, 0x40, 0x00], [0x7C, 0x04, 0x78, 0x04, 0x78],
    [0x7C, 0x08, 0x04, 0x04, 0x78], [0x38, 0x44, 0x44, 0x44, 0x38], [0xFC, 0x18, 0x24, 0x24, 0x18],
    [0x18, 0x24, 0x24, 0x18, 0xFC], [0x7C, 0x08, 0x04, 0x04, 0x08], [0x48, 0x54, 0x54, 0x54, 0x24],
    [0x04, 0x04, 0x3F, 0x44, 0x24], [0x3C, 0x40, 0x40, 0x20, 0x7C], [0x1C, 0x20, 0x40, 0x20, 0x1C],
    [0x3C, 0x40, 0x30, 0x40, 0x3C], [0x44, 0x28, 0x10, 0x28, 0x44], [0x4C, 0x90, 0x90, 0x90, 0x7C],
    [0x44, 0x64, 0x54, 0x4C, 0x44], [0x00, 0x08, 0x36, 0x41, 0x00], [0x00, 0x00, 0x77, 0x00, 0x00],
    [0x00, 0x41, 0x36, 0x08, 0x00], [0x02, 0x01, 0x02, 0x04, 0x02],
];

const CELL_W: u32 = 6;
const CELL_H: u32 = 8;
const ATLAS_COLS: u32 = 16;

fn build_font() -> (RgbaImage, serde_json::Value) {
    let rows = (GLYPHS_5X8.len() as u32).div_ceil(ATLAS_COLS);
    let mut atlas = RgbaImage::new(ATLAS_COLS * CELL_W, rows * CELL_H);
    let mut glyphs = Vec::with_capacity(GLYPHS_5X8.len());

    for (i, columns) in GLYPHS_5X8.iter().enumerate() {
        let i = i as u32;
        let (ox, oy) = ((i % ATLAS_COLS) * CELL_W, (i / ATLAS_COLS) * CELL_H);
        for (cx, bits) in columns.iter().enumerate() {
            for cy in 0..CELL_H {
                if bits >> cy & 1 == 1 {
                    atlas.put_pixel(ox + cx as u32, oy + cy, Rgba([255, 255, 255, 255]));
                }
            }
        }
        glyphs.push(serde_json::json!({
            "id": 0x20 + i,
            "x": ox, "y": oy, "width": 5, "height": CELL_H,
            "x_offset": 0, "y_offset": 0, "x_advance": CELL_W,
        }));
    }

    let descriptor = serde_json::json!({
        "image": "mono5x8.png",
        "line_height": CELL_H,
        "texture_width": atlas.width(),
        "texture_height": atlas.height(),
        "glyphs": glyphs,
    });
    (atlas, descriptor)
}

fn save_if_missing(path: &str, img: &RgbaImage) {
    if !Path::new(path).exists() {
        img.save(path).unwrap_or_else(|e| eprintln!("build: could not save {path}: {e}"));
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    for dir in ["assets/images", "assets/fonts"] {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("build: could not create {dir}: {e}");
            return;
        }
    }

    save_if_missing("assets/images/icon.png", &draw_bordered_rect(24, 24, [0xE0, 0x20, 0x20, 0xFF], [0x60, 0x00, 0x00, 0xFF]));
    save_if_missing("assets/images/cat.png", &draw_cat(64));

    let (atlas, descriptor) = build_font();
    save_if_missing("assets/fonts/mono5x8.png", &atlas);
    let json_path = "assets/fonts/mono5x8.json";
    if !Path::new(json_path).exists() {
        let text = serde_json::to_string_pretty(&descriptor).unwrap_or_default();
        std::fs::write(json_path, text).unwrap_or_else(|e| eprintln!("build: could not save {json_path}: {e}"));
    }
}
