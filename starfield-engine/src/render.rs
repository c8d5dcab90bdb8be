// render.rs - Project the star field onto a 2D surface
//
// Perspective: screen = center + world / (z * k)
// Brightness:  b = 1 - (z / depth)^2, near stars are bigger and brighter
//
// Drawing goes through the Surface trait so the same frame can land on a
// canvas context in the browser or on a PixelBuffer for headless output.

use crate::config::StarfieldConfig;
use crate::error::RenderError;
use crate::sim::{Star, StarField};

/// Straight-alpha colour, alpha in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba()` form, as a canvas fill style.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Anything the star field can be drawn on.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba);
}

/// Screen position of a star on a `w` x `h` surface. Not bounds-checked.
#[inline]
pub fn project(star: &Star, w: f64, h: f64, focal_scale: f64) -> (f64, f64) {
    let s = star.z * focal_scale;
    (w * 0.5 + star.x / s, h * 0.5 + star.y / s)
}

#[inline]
pub fn on_surface(x: f64, y: f64, w: f64, h: f64) -> bool {
    x >= 0.0 && x < w && y >= 0.0 && y < h
}

/// 1 at the viewer, 0 at the far plane.
#[inline]
pub fn brightness(z: f64, depth: f64) -> f64 {
    let d = z / depth;
    1.0 - d * d
}

/// Clear the surface and draw every visible star. Returns how many were drawn.
///
/// `w` and `h` are the renderer's cached dimensions, not re-read from the
/// surface, so a frame always uses the size from the last resize event.
pub fn draw_frame<S: Surface + ?Sized>(
    field: &StarField,
    surface: &mut S,
    w: u32,
    h: u32,
    config: &StarfieldConfig,
) -> Result<usize, RenderError> {
    if w == 0 || h == 0 {
        return Err(RenderError::InvalidDimensions { width: w, height: h });
    }
    let (w, h) = (w as f64, h as f64);
    let [r, g, b] = config.color;

    surface.clear_rect(0.0, 0.0, w, h);

    let mut drawn = 0;
    for star in field.iter() {
        let (x, y) = project(&star, w, h, config.focal_scale);
        if !on_surface(x, y, w, h) {
            continue;
        }

        let bright = brightness(star.z, field.depth());
        let size = bright * config.max_size;
        surface.fill_rect(x, y, size, size, Rgba::new(r, g, b, bright * config.max_alpha));
        drawn += 1;
    }

    Ok(drawn)
}

// ============================================================================
// PixelBuffer - software RGBA surface
// ============================================================================

/// Row-major RGBA8 buffer with source-over blending.
#[derive(Debug)]
pub struct PixelBuffer {
    out: Vec<u8>,
    w: u32,
    h: u32,
}

impl PixelBuffer {
    /// Largest buffer accepted, in pixels (1 GiB of RGBA).
    pub const MAX_PIXELS: usize = 1 << 28;

    pub fn new(w: u32, h: u32) -> Result<Self, RenderError> {
        let len = Self::byte_len(w, h)?;
        Ok(Self { out: vec![0; len], w, h })
    }

    /// Resize and clear. An oversized request leaves the buffer as it was.
    pub fn resize(&mut self, w: u32, h: u32) -> Result<(), RenderError> {
        let len = Self::byte_len(w, h)?;
        self.w = w;
        self.h = h;
        self.out.clear();
        self.out.resize(len, 0);
        Ok(())
    }

    fn byte_len(w: u32, h: u32) -> Result<usize, RenderError> {
        (w as usize)
            .checked_mul(h as usize)
            .filter(|&px| px <= Self::MAX_PIXELS)
            .and_then(|px| px.checked_mul(4))
            .ok_or(RenderError::SurfaceTooLarge { width: w, height: h })
    }

    /// Byte offset of pixel (x, y). Caller keeps x <= w and y < h.
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.w as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.w || y >= self.h {
            return None;
        }
        let i = self.offset(x, y);
        Some([self.out[i], self.out[i + 1], self.out[i + 2], self.out[i + 3]])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Integer pixel span covered by [x, x + w) clipped to the buffer.
    fn span(start: f64, len: f64, max: u32) -> (u32, u32) {
        let lo = start.floor().max(0.0);
        let hi = (start + len).ceil().min(max as f64);
        if hi <= lo {
            return (0, 0);
        }
        (lo as u32, hi as u32)
    }
}

impl Surface for PixelBuffer {
    fn width(&self) -> u32 {
        self.w
    }

    fn height(&self) -> u32 {
        self.h
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let (x0, x1) = Self::span(x, w, self.w);
        let (y0, y1) = Self::span(y, h, self.h);
        for py in y0..y1 {
            let (row, end) = (self.offset(x0, py), self.offset(x1, py));
            self.out[row..end].fill(0);
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let sa = color.a.clamp(0.0, 1.0);
        if sa == 0.0 {
            return;
        }

        let (x0, x1) = Self::span(x, w, self.w);
        let (y0, y1) = Self::span(y, h, self.h);
        let src = [color.r as f64, color.g as f64, color.b as f64];

        for py in y0..y1 {
            for px in x0..x1 {
                let i = self.offset(px, py);
                let da = self.out[i + 3] as f64 / 255.0;
                let oa = sa + da * (1.0 - sa);
                for c in 0..3 {
                    let dc = self.out[i + c] as f64;
                    let oc = (src[c] * sa + dc * da * (1.0 - sa)) / oa;
                    self.out[i + c] = oc.round().clamp(0.0, 255.0) as u8;
                }
                self.out[i + 3] = (oa * 255.0).round() as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        w: u32,
        h: u32,
        clears: usize,
        fills: Vec<(f64, f64, f64, Rgba)>,
    }

    impl Surface for Recorder {
        fn width(&self) -> u32 {
            self.w
        }
        fn height(&self) -> u32 {
            self.h
        }
        fn clear_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {
            self.clears += 1;
        }
        fn fill_rect(&mut self, x: f64, y: f64, w: f64, _h: f64, color: Rgba) {
            self.fills.push((x, y, w, color));
        }
    }

    fn single(x: f64, y: f64, z: f64) -> StarField {
        StarField::from_stars(&StarfieldConfig::default(), [Star { x, y, z }])
    }

    #[test]
    fn test_star_on_axis_projects_to_center() {
        let star = Star { x: 0.0, y: 0.0, z: 500.0 };
        assert_eq!(project(&star, 800.0, 600.0, 0.001), (400.0, 300.0));
    }

    #[test]
    fn test_projection_scales_with_inverse_depth() {
        // x / (z * k) = 100 / (500 * 0.001) = 200
        let star = Star { x: 100.0, y: -50.0, z: 500.0 };
        assert_eq!(project(&star, 800.0, 600.0, 0.001), (600.0, 200.0));
    }

    #[test]
    fn test_brightness_falls_with_depth() {
        let mut prev = f64::INFINITY;
        for z in [1.0, 10.0, 100.0, 500.0, 900.0, 999.0, 1000.0] {
            let b = brightness(z, 1000.0);
            assert!(b < prev, "brightness({z}) = {b} not below {prev}");
            assert!((0.0..1.0).contains(&b));
            prev = b;
        }
        assert_eq!(brightness(1000.0, 1000.0), 0.0);
    }

    #[test]
    fn test_draw_frame_uses_reference_size_and_colour() {
        let field = single(0.0, 0.0, 500.0);
        let mut surface = Recorder { w: 800, h: 600, ..Default::default() };
        let drawn = draw_frame(&field, &mut surface, 800, 600, &StarfieldConfig::default()).unwrap();

        assert_eq!(drawn, 1);
        assert_eq!(surface.clears, 1);
        let (x, y, size, color) = surface.fills[0];
        assert_eq!((x, y), (400.0, 300.0));
        // d = 0.5, b = 0.75
        assert!((size - 0.75 * 2.5).abs() < 1e-12);
        assert_eq!((color.r, color.g, color.b), (150, 180, 255));
        assert!((color.a - 0.75 * 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_off_surface_stars_are_skipped() {
        let config = StarfieldConfig::default();
        let field = StarField::from_stars(
            &config,
            [
                // 800 / 0.1 = 8000 px right of center
                Star { x: 800.0, y: 0.0, z: 100.0 },
                Star { x: 0.0, y: -449.0, z: 50.0 },
                // exactly on the right edge, which is exclusive
                Star { x: 400.0, y: 0.0, z: 1000.0 },
                Star { x: 10.0, y: 10.0, z: 900.0 },
            ],
        );
        let mut surface = Recorder::default();
        let drawn = draw_frame(&field, &mut surface, 800, 600, &config).unwrap();

        assert_eq!(drawn, 1);
        assert_eq!(surface.fills.len(), 1);
        for &(x, y, _, _) in &surface.fills {
            assert!(on_surface(x, y, 800.0, 600.0));
        }
    }

    #[test]
    fn test_zero_sized_surface_draws_nothing() {
        let field = single(0.0, 0.0, 500.0);
        let mut surface = Recorder::default();
        let err = draw_frame(&field, &mut surface, 0, 600, &StarfieldConfig::default()).unwrap_err();
        assert_eq!(err, RenderError::InvalidDimensions { width: 0, height: 600 });
        assert_eq!(surface.clears, 0);
        assert!(surface.fills.is_empty());
    }

    #[test]
    fn test_css_fill_style() {
        assert_eq!(Rgba::new(150, 180, 255, 0.45).css(), "rgba(150, 180, 255, 0.45)");
    }

    #[test]
    fn test_pixel_buffer_blends_and_clips() {
        let mut buf = PixelBuffer::new(4, 4).unwrap();
        buf.fill_rect(2.5, 2.5, 2.0, 2.0, Rgba::new(255, 0, 0, 1.0));
        assert_eq!(buf.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(buf.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(buf.pixel(1, 1), Some([0, 0, 0, 0]));

        buf.fill_rect(3.0, 3.0, 1.0, 1.0, Rgba::new(0, 0, 255, 0.5));
        let [r, g, b, a] = buf.pixel(3, 3).unwrap();
        assert_eq!((r, g, b, a), (128, 0, 128, 255));

        buf.clear_rect(0.0, 0.0, 4.0, 3.0);
        assert_eq!(buf.pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(buf.pixel(3, 3), Some([128, 0, 128, 255]));
    }

    #[test]
    fn test_pixel_buffer_resize_and_accessors() {
        let mut buf = PixelBuffer::new(2, 2).unwrap();
        assert_eq!(buf.len(), 16);
        buf.fill_rect(0.0, 0.0, 2.0, 2.0, Rgba::new(1, 2, 3, 1.0));
        buf.resize(3, 1).unwrap();
        assert_eq!((buf.width(), buf.height()), (3, 1));
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buf.pixel(3, 0), None);
    }

    #[test]
    fn test_pixel_buffer_rejects_oversized_dimensions() {
        let err = PixelBuffer::new(40_000, 30_000).unwrap_err();
        assert_eq!(err, RenderError::SurfaceTooLarge { width: 40_000, height: 30_000 });
        assert!(PixelBuffer::new(u32::MAX, u32::MAX).is_err());
        assert!(PixelBuffer::new(u32::MAX, 0).is_ok());

        let mut buf = PixelBuffer::new(2, 2).unwrap();
        assert!(buf.resize(70_000, 70_000).is_err());
        assert_eq!((buf.width(), buf.height()), (2, 2));
        assert_eq!(buf.len(), 16);
    }

    #[test]
    fn test_pixel_buffer_addresses_wide_rows() {
        let mut buf = PixelBuffer::new(70_000, 2).unwrap();
        buf.fill_rect(69_999.0, 1.0, 1.0, 1.0, Rgba::new(9, 8, 7, 1.0));
        assert_eq!(buf.pixel(69_999, 1), Some([9, 8, 7, 255]));
        assert_eq!(&buf.as_bytes()[buf.len() - 4..], &[9, 8, 7, 255]);

        buf.clear_rect(0.0, 0.0, 70_000.0, 2.0);
        assert_eq!(buf.pixel(69_999, 1), Some([0, 0, 0, 0]));
    }
}
