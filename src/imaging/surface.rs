//! Raster surface capability traits and shared types.
//!
//! The [`SurfaceProvider`] trait is everything the operations need from the
//! platform: decode bytes into a [`Raster`], hand out a drawable [`Canvas`],
//! and encode that canvas as JPEG at a given quality. Operations never touch
//! pixels directly, so a headless, recording, or hardware-backed provider
//! can be substituted without the operations knowing the difference.
//!
//! The production implementation is
//! [`RustSurfaceProvider`](super::rust_surface::RustSurfaceProvider), built on
//! the `image` crate.

use super::params::{Quality, Rgba, TileRect};
use image::RgbaImage;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Image decode timed out after {0:?}")]
    DecodeTimeout(Duration),
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("No image data provided")]
    EmptyInput,
    #[error("Invalid photo size: {0}")]
    InvalidPhotoSize(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of a raster or surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A decoded bitmap.
///
/// Created by [`SurfaceProvider::decode`], consumed by a single operation,
/// then dropped. Drawing only ever reads from it, so the same raster can be
/// drawn into any number of tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pixels: RgbaImage,
}

impl Raster {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// A drawable surface owned by a single operation.
pub trait Canvas {
    fn dimensions(&self) -> Dimensions;

    /// Paint every pixel with an opaque colour.
    fn fill(&mut self, color: Rgba);

    /// Scale `raster` into `rect` and composite it over the current contents.
    ///
    /// Parts of `rect` outside the surface are clipped.
    fn draw_raster(&mut self, raster: &Raster, rect: TileRect);

    /// Draw a 1-pixel outline along the inside of `rect`, clipped to the surface.
    fn stroke_rect(&mut self, rect: TileRect, color: Rgba);
}

/// Platform capability for decoding, drawing, and encoding rasters.
pub trait SurfaceProvider: Sync {
    type Surface: Canvas;

    /// Decode encoded image bytes. This is the only asynchronous step.
    fn decode(&self, bytes: Vec<u8>) -> impl Future<Output = Result<Raster, ImagingError>> + Send;

    /// Allocate a blank surface, or fail with [`ImagingError::SurfaceUnavailable`].
    fn create_surface(&self, width: u32, height: u32) -> Result<Self::Surface, ImagingError>;

    /// Encode the surface as JPEG. The returned length is the exact file size.
    fn encode(&self, surface: &Self::Surface, quality: Quality) -> Result<Vec<u8>, ImagingError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Provider that records every call instead of touching pixels.
    ///
    /// Encoded size is `quality × bytes_at_full_quality`, which makes the
    /// quality search fully predictable.
    pub struct MockSurfaceProvider {
        pub decoded: Option<Dimensions>,
        pub hang_on_decode: bool,
        pub surface_available: bool,
        pub bytes_at_full_quality: f64,
        pub operations: Arc<Mutex<Vec<RecordedOp>>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode(usize),
        CreateSurface { width: u32, height: u32 },
        Fill(Rgba),
        DrawRaster(TileRect),
        StrokeRect(TileRect, Rgba),
        Encode { quality: f64, len: usize },
    }

    impl MockSurfaceProvider {
        pub fn with_dimensions(width: u32, height: u32) -> Self {
            Self {
                decoded: Some(Dimensions { width, height }),
                hang_on_decode: false,
                surface_available: true,
                bytes_at_full_quality: 100_000.0,
                operations: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn undecodable() -> Self {
            Self {
                decoded: None,
                ..Self::with_dimensions(1, 1)
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn encoded_qualities(&self) -> Vec<f64> {
            self.get_operations()
                .into_iter()
                .filter_map(|op| match op {
                    RecordedOp::Encode { quality, .. } => Some(quality),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }
    }

    pub struct RecordingCanvas {
        dimensions: Dimensions,
        operations: Arc<Mutex<Vec<RecordedOp>>>,
    }

    impl Canvas for RecordingCanvas {
        fn dimensions(&self) -> Dimensions {
            self.dimensions
        }

        fn fill(&mut self, color: Rgba) {
            self.operations.lock().unwrap().push(RecordedOp::Fill(color));
        }

        fn draw_raster(&mut self, _raster: &Raster, rect: TileRect) {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::DrawRaster(rect));
        }

        fn stroke_rect(&mut self, rect: TileRect, color: Rgba) {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::StrokeRect(rect, color));
        }
    }

    impl SurfaceProvider for MockSurfaceProvider {
        type Surface = RecordingCanvas;

        fn decode(
            &self,
            bytes: Vec<u8>,
        ) -> impl Future<Output = Result<Raster, ImagingError>> + Send {
            self.record(RecordedOp::Decode(bytes.len()));
            let decoded = self.decoded;
            let hang = self.hang_on_decode;
            async move {
                if hang {
                    std::future::pending::<()>().await;
                }
                decoded
                    .map(|d| Raster::new(RgbaImage::new(d.width, d.height)))
                    .ok_or_else(|| ImagingError::Decode("mock refuses to decode".to_string()))
            }
        }

        fn create_surface(&self, width: u32, height: u32) -> Result<RecordingCanvas, ImagingError> {
            self.record(RecordedOp::CreateSurface { width, height });
            if !self.surface_available {
                return Err(ImagingError::SurfaceUnavailable("mock".to_string()));
            }
            Ok(RecordingCanvas {
                dimensions: Dimensions { width, height },
                operations: Arc::clone(&self.operations),
            })
        }

        fn encode(
            &self,
            _surface: &RecordingCanvas,
            quality: Quality,
        ) -> Result<Vec<u8>, ImagingError> {
            let len = (quality.value() * self.bytes_at_full_quality).round() as usize;
            self.record(RecordedOp::Encode {
                quality: quality.value(),
                len,
            });
            Ok(vec![0; len])
        }
    }

    #[tokio::test]
    async fn mock_records_decode() {
        let provider = MockSurfaceProvider::with_dimensions(800, 600);

        let raster = provider.decode(vec![1, 2, 3]).await.unwrap();
        assert_eq!(
            raster.dimensions(),
            Dimensions {
                width: 800,
                height: 600
            }
        );

        let ops = provider.get_operations();
        assert_eq!(ops, vec![RecordedOp::Decode(3)]);
    }

    #[test]
    fn mock_encode_size_scales_with_quality() {
        let provider = MockSurfaceProvider::with_dimensions(10, 10);
        let surface = provider.create_surface(10, 10).unwrap();

        let bytes = provider.encode(&surface, Quality::new(0.5)).unwrap();
        assert_eq!(bytes.len(), 50_000);
        assert_eq!(provider.encoded_qualities(), vec![0.5]);
    }

    #[test]
    fn mock_surface_can_be_unavailable() {
        let provider = MockSurfaceProvider {
            surface_available: false,
            ..MockSurfaceProvider::with_dimensions(10, 10)
        };
        assert!(matches!(
            provider.create_surface(10, 10),
            Err(ImagingError::SurfaceUnavailable(_))
        ));
    }
}
