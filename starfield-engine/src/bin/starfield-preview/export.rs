// export.rs - PNG output
//
// The star canvas is transparent; the loading screen shows it over a
// #000011 backdrop, so frames are flattened onto the same colour.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use starfield_engine::{PixelBuffer, Surface};

pub const BACKDROP: [u8; 3] = [0x00, 0x00, 0x11];

/// Flatten the RGBA buffer over an opaque backdrop.
pub fn composite(buf: &PixelBuffer, backdrop: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(buf.width(), buf.height(), |x, y| {
        let [r, g, b, a] = buf.pixel(x, y).unwrap_or([0; 4]);
        let a = a as f32 / 255.0;
        let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
        Rgb([mix(r, backdrop[0]), mix(g, backdrop[1]), mix(b, backdrop[2])])
    })
}

pub fn write_png(buf: &PixelBuffer, path: &Path) -> Result<()> {
    composite(buf, BACKDROP)
        .save(path)
        .with_context(|| format!("writing {}", path.display()))
}
