//! Image processing: decode, tile, and re-encode in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory`, bounded by `tokio::time::timeout` |
//! | **Compress to size** | bisection over JPEG quality (`JpegEncoder`) |
//! | **Print sheet** | `Lanczos3` scaling + `imageops::overlay` onto a white canvas |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for sheet layout and quality search (unit testable)
//! - **Parameters**: Value types describing quality, budgets, and physical sizes
//! - **Surface**: [`SurfaceProvider`] / [`Canvas`] traits + [`RustSurfaceProvider`]
//! - **Operations**: High-level functions combining calculations + a provider

mod calculations;
pub mod operations;
mod params;
pub mod rust_surface;
pub mod surface;

pub use calculations::{
    GRID_COLUMNS, GRID_ROWS, MM_TO_INCH, QualitySearch, SHEET_DPI, SHEET_HEIGHT_IN,
    SHEET_WIDTH_IN, SheetLayout, mm_to_px,
};
pub use operations::{
    CompressConfig, Compressed, DEFAULT_DECODE_TIMEOUT, PrintSheet, SheetConfig,
    compress_to_target_size, create_print_sheet, decode_image,
};
pub use params::{CompressionBudget, PhotoSpec, Quality, Rgba, TileRect};
pub use rust_surface::{RasterCanvas, RustSurfaceProvider};
pub use surface::{Canvas, Dimensions, ImagingError, Raster, SurfaceProvider};
