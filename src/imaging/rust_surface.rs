//! Pure Rust surface provider built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::load_from_memory` on tokio's blocking pool |
//! | Scale into tile | `image::imageops::resize` with `Lanczos3` filter |
//! | Composite | `image::imageops::overlay` (alpha blend, clips negative offsets) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::params::{Quality, Rgba, TileRect};
use super::surface::{Canvas, Dimensions, ImagingError, Raster, SurfaceProvider};
use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, RgbImage, RgbaImage};
use std::future::Future;

/// Longest surface edge the provider will allocate.
pub const MAX_SURFACE_EDGE: u32 = 16_384;

/// Surface provider backed by in-memory RGBA buffers.
///
/// Decoding runs on tokio's blocking pool, so it must be called from within
/// a tokio runtime.
pub struct RustSurfaceProvider;

impl RustSurfaceProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustSurfaceProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory RGBA drawing surface.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    pixels: RgbaImage,
}

impl RasterCanvas {
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

fn decode_bytes(bytes: &[u8]) -> Result<Raster, ImagingError> {
    image::load_from_memory(bytes)
        .map(|img| Raster::new(img.to_rgba8()))
        .map_err(|e| ImagingError::Decode(e.to_string()))
}

impl Canvas for RasterCanvas {
    fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }

    fn fill(&mut self, color: Rgba) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = image::Rgba(color.0);
        }
    }

    fn draw_raster(&mut self, raster: &Raster, rect: TileRect) {
        let (left, top, right, bottom) = rect.pixel_edges();
        let (width, height) = (right - left, bottom - top);
        if width <= 0 || height <= 0 {
            return;
        }
        let (width, height) = (width as u32, height as u32);

        let source = raster.pixels();
        if source.dimensions() == (width, height) {
            imageops::overlay(&mut self.pixels, source, left, top);
        } else {
            let scaled = imageops::resize(source, width, height, FilterType::Lanczos3);
            imageops::overlay(&mut self.pixels, &scaled, left, top);
        }
    }

    fn stroke_rect(&mut self, rect: TileRect, color: Rgba) {
        let (left, top, right, bottom) = rect.pixel_edges();
        if right <= left || bottom <= top {
            return;
        }
        let (surface_w, surface_h) = (self.pixels.width() as i64, self.pixels.height() as i64);
        let pixel = image::Rgba(color.0);
        let mut plot = |x: i64, y: i64| {
            if (0..surface_w).contains(&x) && (0..surface_h).contains(&y) {
                self.pixels.put_pixel(x as u32, y as u32, pixel);
            }
        };

        for x in left..right {
            plot(x, top);
            plot(x, bottom - 1);
        }
        for y in top..bottom {
            plot(left, y);
            plot(right - 1, y);
        }
    }
}

impl SurfaceProvider for RustSurfaceProvider {
    type Surface = RasterCanvas;

    fn decode(&self, bytes: Vec<u8>) -> impl Future<Output = Result<Raster, ImagingError>> + Send {
        async move {
            tokio::task::spawn_blocking(move || decode_bytes(&bytes))
                .await
                .map_err(|e| ImagingError::Decode(format!("decoder task failed: {e}")))?
        }
    }

    fn create_surface(&self, width: u32, height: u32) -> Result<RasterCanvas, ImagingError> {
        if width == 0 || height == 0 {
            return Err(ImagingError::SurfaceUnavailable(format!(
                "cannot allocate an empty {width}x{height} surface"
            )));
        }
        if width > MAX_SURFACE_EDGE || height > MAX_SURFACE_EDGE {
            return Err(ImagingError::SurfaceUnavailable(format!(
                "{width}x{height} exceeds the {MAX_SURFACE_EDGE}px surface limit"
            )));
        }
        Ok(RasterCanvas {
            pixels: RgbaImage::new(width, height),
        })
    }

    fn encode(&self, surface: &RasterCanvas, quality: Quality) -> Result<Vec<u8>, ImagingError> {
        // JPEG has no alpha channel; surfaces are painted opaque before drawing.
        let rgb: RgbImage = surface.pixels.convert();
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality.jpeg_level())
            .encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| ImagingError::Encode(format!("JPEG encode failed: {e}")))?;
        Ok(buf)
    }
}
