//! Fixed-size raster buffer backed by a Cairo image surface.
//!
//! All drawing goes through short-lived Cairo contexts so the image surface is
//! never shared while its pixels are read back or encoded.

use super::color::Color;
use std::io::Cursor;
use thiserror::Error;

/// Buffer width in pixels.
pub const CANVAS_WIDTH: i32 = 600;
/// Buffer height in pixels.
pub const CANVAS_HEIGHT: i32 = 250;

/// Errors raised while drawing, encoding, or decoding raster data.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("PNG stream error: {0}")]
    Png(#[from] cairo::IoError),

    #[error("Pixel data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("Image has no pixels ({width}x{height})")]
    Empty { width: i32, height: i32 },

    #[error("Image decoder panicked")]
    DecodePanicked,
}

/// Decoded ARGB32 pixels, detached from Cairo so they can cross threads.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    width: i32,
    height: i32,
    stride: i32,
    data: Vec<u8>,
}

impl DecodedImage {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn into_surface(self) -> Result<cairo::ImageSurface, SurfaceError> {
        Ok(cairo::ImageSurface::create_for_data(
            self.data,
            cairo::Format::ARgb32,
            self.width,
            self.height,
            self.stride,
        )?)
    }
}

/// Decodes PNG bytes into ARGB32 pixels.
///
/// Whatever format the PNG decodes to, the pixels are repainted into an ARGB32
/// surface so every decoded image has the same layout as the canvas buffer.
pub fn decode_png(bytes: &[u8]) -> Result<DecodedImage, SurfaceError> {
    let decoded = cairo::ImageSurface::create_from_png(&mut Cursor::new(bytes))?;
    let width = decoded.width();
    let height = decoded.height();
    if width <= 0 || height <= 0 {
        return Err(SurfaceError::Empty { width, height });
    }

    let mut target = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
    {
        let ctx = cairo::Context::new(&target)?;
        ctx.set_operator(cairo::Operator::Source);
        ctx.set_source_surface(&decoded, 0.0, 0.0)?;
        ctx.paint()?;
    }
    target.flush();

    let stride = target.stride();
    let data = target.data()?.to_vec();
    Ok(DecodedImage {
        width,
        height,
        stride,
        data,
    })
}

/// The mutable raster buffer the user draws on.
pub struct Surface {
    image: cairo::ImageSurface,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Surface {
    /// Allocates a transparent `CANVAS_WIDTH` x `CANVAS_HEIGHT` buffer.
    pub fn new() -> Result<Self, SurfaceError> {
        Self::with_size(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    /// Allocates a transparent buffer of arbitrary size.
    pub fn with_size(width: i32, height: i32) -> Result<Self, SurfaceError> {
        if width <= 0 || height <= 0 {
            return Err(SurfaceError::Empty { width, height });
        }
        let image = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
        Ok(Self { image })
    }

    pub fn width(&self) -> i32 {
        self.image.width()
    }

    pub fn height(&self) -> i32 {
        self.image.height()
    }

    /// Underlying Cairo surface, for blitting onto the window.
    pub fn image(&self) -> &cairo::ImageSurface {
        &self.image
    }

    fn context(&self) -> Result<cairo::Context, SurfaceError> {
        Ok(cairo::Context::new(&self.image)?)
    }

    /// Replaces every pixel with `color`.
    pub fn fill(&self, color: Color) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        ctx.set_operator(cairo::Operator::Source);
        color.set_source(&ctx);
        ctx.paint()?;
        Ok(())
    }

    /// Strokes the polyline through `points` with round caps and joins.
    ///
    /// A single point strokes nothing, matching a path that has only been
    /// started.
    pub fn stroke_path(
        &self,
        points: &[(f64, f64)],
        color: Color,
        width: f64,
    ) -> Result<(), SurfaceError> {
        let Some(((x0, y0), rest)) = points.split_first() else {
            return Ok(());
        };
        if rest.is_empty() {
            return Ok(());
        }

        let ctx = self.context()?;
        color.set_source(&ctx);
        ctx.set_line_width(width);
        ctx.set_line_cap(cairo::LineCap::Round);
        ctx.set_line_join(cairo::LineJoin::Round);

        ctx.move_to(*x0, *y0);
        for (x, y) in rest {
            ctx.line_to(*x, *y);
        }
        ctx.stroke()?;
        Ok(())
    }

    /// Clears the buffer and paints `image` stretched to cover it.
    pub fn draw_scaled(&self, image: DecodedImage) -> Result<(), SurfaceError> {
        let (src_width, src_height) = (image.width(), image.height());
        let source = image.into_surface()?;

        let ctx = self.context()?;
        ctx.set_operator(cairo::Operator::Clear);
        ctx.paint()?;
        ctx.set_operator(cairo::Operator::Over);

        ctx.scale(
            self.width() as f64 / src_width as f64,
            self.height() as f64 / src_height as f64,
        );
        ctx.set_source_surface(&source, 0.0, 0.0)?;
        ctx.paint()?;
        Ok(())
    }

    /// Encodes the current buffer as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        self.image.flush();
        let mut bytes = Vec::new();
        self.image.write_to_png(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads one pixel as straight `[r, g, b, a]`.
    pub fn pixel(&mut self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        let stride = self.image.stride() as usize;
        self.image.flush();
        let data = self.image.data().ok()?;
        Some(pixel_at(&data, stride, x as usize, y as usize))
    }

    /// Returns true when every pixel equals `color` at 8-bit precision.
    pub fn is_filled_with(&mut self, color: Color) -> bool {
        let [r, g, b] = color.to_rgb8();
        let a = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        let expected = [r, g, b, a];

        let (width, height) = (self.width() as usize, self.height() as usize);
        let stride = self.image.stride() as usize;
        self.image.flush();
        let Ok(data) = self.image.data() else {
            return false;
        };
        (0..height).all(|y| (0..width).all(|x| pixel_at(&data, stride, x, y) == expected))
    }
}

fn pixel_at(data: &[u8], stride: usize, x: usize, y: usize) -> [u8; 4] {
    let offset = y * stride + x * 4;
    // ARGB32 pixels are native-endian u32 words with alpha in the high byte.
    let word = u32::from_ne_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]);
    unpremultiply(word)
}

fn unpremultiply(word: u32) -> [u8; 4] {
    let a = (word >> 24) as u8;
    let channel = |shift: u32| {
        let premultiplied = ((word >> shift) & 0xff) as u32;
        match a {
            0 => 0,
            255 => premultiplied as u8,
            _ => ((premultiplied * 255 + a as u32 / 2) / a as u32).min(255) as u8,
        }
    };
    [channel(16), channel(8), channel(0), a]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLUE, RED, WHITE};

    #[test]
    fn new_surface_has_canvas_dimensions() {
        let surface = Surface::new().unwrap();
        assert_eq!((surface.width(), surface.height()), (600, 250));
    }

    #[test]
    fn fill_paints_every_pixel() {
        let mut surface = Surface::with_size(16, 8).unwrap();
        surface.fill(BLUE).unwrap();
        assert!(surface.is_filled_with(BLUE));
        assert_eq!(surface.pixel(3, 3), Some([0, 0, 255, 255]));
        assert_eq!(surface.pixel(16, 0), None);
    }

    #[test]
    fn single_point_path_draws_nothing() {
        let mut surface = Surface::with_size(16, 16).unwrap();
        surface.fill(WHITE).unwrap();
        surface.stroke_path(&[(8.0, 8.0)], RED, 10.0).unwrap();
        assert!(surface.is_filled_with(WHITE));
    }

    #[test]
    fn stroke_marks_pixels_along_the_path() {
        let mut surface = Surface::with_size(40, 40).unwrap();
        surface.fill(WHITE).unwrap();
        surface
            .stroke_path(&[(5.0, 20.0), (35.0, 20.0)], RED, 6.0)
            .unwrap();
        assert_eq!(surface.pixel(20, 20), Some([255, 0, 0, 255]));
        // Round caps extend past the end points by half the width.
        assert_eq!(surface.pixel(3, 20), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(20, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let mut surface = Surface::with_size(32, 32).unwrap();
        surface.fill(WHITE).unwrap();
        surface
            .stroke_path(&[(2.0, 2.0), (30.0, 30.0)], BLUE, 4.0)
            .unwrap();
        let png = surface.encode_png().unwrap();

        let mut restored = Surface::with_size(32, 32).unwrap();
        restored.draw_scaled(decode_png(&png).unwrap()).unwrap();
        for (x, y) in [(0, 0), (16, 16), (31, 0), (5, 5)] {
            assert_eq!(restored.pixel(x, y), surface.pixel(x, y));
        }
    }

    #[test]
    fn draw_scaled_stretches_to_fill() {
        let small = Surface::with_size(10, 5).unwrap();
        small.fill(RED).unwrap();
        let png = small.encode_png().unwrap();

        let mut surface = Surface::with_size(60, 25).unwrap();
        surface.fill(WHITE).unwrap();
        surface.draw_scaled(decode_png(&png).unwrap()).unwrap();
        assert_eq!(surface.pixel(30, 12), Some([255, 0, 0, 255]));
    }

    #[test]
    fn decode_rejects_non_png() {
        assert!(decode_png(b"definitely not a png").is_err());
    }
}
