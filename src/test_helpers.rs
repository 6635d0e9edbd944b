//! Shared test utilities: synthetic rasters and JPEG fixtures.
//!
//! Fixtures are generated in memory so tests need no files on disk.
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let url = gradient_data_url(320, 240);
//! let raster = solid_raster(4, 4, [255, 0, 0, 255]);
//! ```

use crate::envelope;
use crate::imaging::Raster;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage, RgbaImage};

/// A raster filled with one colour.
pub fn solid_raster(width: u32, height: u32, rgba: [u8; 4]) -> Raster {
    Raster::new(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
}

/// A diagonal gradient with deterministic noise, so quality changes size.
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    let mut seed: u32 = 0x2545_f491;
    RgbImage::from_fn(width, height, |x, y| {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let noise = (seed >> 27) as u8;
        let r = ((x * 255) / width.max(1)) as u8;
        let g = ((y * 255) / height.max(1)) as u8;
        let b = (((x + y) * 127) / (width + height).max(1)) as u8;
        image::Rgb([
            r.saturating_add(noise),
            g.saturating_add(noise),
            b.saturating_add(noise),
        ])
    })
}

/// JPEG bytes of [`gradient_image`] at quality 90.
pub fn gradient_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = gradient_image(width, height);
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 90)
        .encode(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// [`gradient_jpeg`] wrapped in a data URL.
pub fn gradient_data_url(width: u32, height: u32) -> String {
    envelope::to_data_url(&gradient_jpeg(width, height))
}

/// Decode a data URL produced by an operation back into pixels.
pub fn decode_data_url(url: &str) -> image::DynamicImage {
    let bytes = envelope::decode_payload(url).unwrap();
    image::load_from_memory(&bytes).unwrap()
}
