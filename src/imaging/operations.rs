//! High-level image operations.
//!
//! These functions combine calculations with surface-provider execution.
//! They take configuration, compute parameters, and drive the provider.
//! Decoding is the only await point; everything after it runs to
//! completion without yielding.

use super::calculations::{GRID_COLUMNS, GRID_ROWS, QualitySearch, SheetLayout};
use super::params::{CompressionBudget, PhotoSpec, Quality, Rgba, TileRect};
use super::surface::{Canvas, ImagingError, Raster, SurfaceProvider};
use crate::envelope;
use crate::types::DocType;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// How long a decode may take before the operation fails.
pub const DEFAULT_DECODE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Longest tile edge the composer will scale a photo to.
pub const MAX_TILE_EDGE_PX: f64 = 16_384.0;

/// Configuration for size-constrained compression.
#[derive(Debug, Clone)]
pub struct CompressConfig {
    pub budget: CompressionBudget,
    pub decode_timeout: Duration,
}

impl CompressConfig {
    pub fn new(budget: CompressionBudget) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            budget: CompressionBudget::UNLIMITED,
            decode_timeout: DEFAULT_DECODE_TIMEOUT,
        }
    }
}

/// Outcome of [`compress_to_target_size`].
#[derive(Debug, Clone)]
pub struct Compressed {
    pub data_url: String,
    pub byte_len: usize,
    /// Quality of the returned encoding; `None` when the input passed through.
    pub quality: Option<Quality>,
    /// False when no candidate fit and the reference encode was returned.
    pub within_budget: bool,
    pub encode_attempts: u32,
}

/// Configuration for print-sheet composition.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub photo: PhotoSpec,
    pub decode_timeout: Duration,
}

impl SheetConfig {
    pub fn new(photo: PhotoSpec) -> Self {
        Self {
            photo,
            ..Self::default()
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            photo: DocType::Passport.photo_spec(),
            decode_timeout: DEFAULT_DECODE_TIMEOUT,
        }
    }
}

/// Outcome of [`create_print_sheet`].
#[derive(Debug, Clone)]
pub struct PrintSheet {
    pub data_url: String,
    pub byte_len: usize,
    pub layout: SheetLayout,
}

/// Decode an enveloped image, failing if the provider takes longer than `limit`.
pub async fn decode_image(
    provider: &impl SurfaceProvider,
    image: &str,
    limit: Duration,
) -> Result<Raster> {
    let bytes =
        envelope::decode_payload(image).map_err(|e| ImagingError::Decode(e.to_string()))?;
    tokio::time::timeout(limit, provider.decode(bytes))
        .await
        .map_err(|_| ImagingError::DecodeTimeout(limit))?
}

/// Re-encode an image at the highest quality whose size fits the budget.
///
/// Bisects quality over `[0.1, 1.0]` for a fixed number of steps, starting
/// from a reference encode at 0.95. If no candidate fits, the reference is
/// returned, so the result is best-effort and may exceed the budget. A
/// non-positive budget skips decoding and returns the input normalised.
pub async fn compress_to_target_size(
    provider: &impl SurfaceProvider,
    image: &str,
    config: &CompressConfig,
) -> Result<Compressed> {
    let budget = config.budget;
    if !budget.is_limited() {
        return Ok(Compressed {
            byte_len: envelope::payload_len(image),
            data_url: envelope::normalize(image),
            quality: None,
            within_budget: true,
            encode_attempts: 0,
        });
    }

    let raster = decode_image(provider, image, config.decode_timeout).await?;
    let dims = raster.dimensions();
    let mut surface = provider.create_surface(dims.width, dims.height)?;
    surface.fill(Rgba::WHITE);
    surface.draw_raster(
        &raster,
        TileRect {
            x: 0.0,
            y: 0.0,
            width: dims.width as f64,
            height: dims.height as f64,
        },
    );

    let mut best = provider.encode(&surface, Quality::REFERENCE)?;
    let mut best_quality = Quality::REFERENCE;
    let mut encode_attempts = 1;

    let mut search = QualitySearch::new();
    while let Some(quality) = search.next_quality() {
        let candidate = provider.encode(&surface, quality)?;
        encode_attempts += 1;

        let fits = budget.fits(candidate.len());
        debug!(
            quality = quality.value(),
            bytes = candidate.len(),
            fits,
            "quality candidate"
        );
        if fits {
            best = candidate;
            best_quality = quality;
        }
        search.record(fits);
    }

    let within_budget = budget.fits(best.len());
    if within_budget {
        info!(
            bytes = best.len(),
            budget = budget.value(),
            quality = best_quality.value(),
            "compressed to target size"
        );
    } else {
        warn!(
            bytes = best.len(),
            budget = budget.value(),
            "no quality fit the budget; returning reference encode"
        );
    }

    Ok(Compressed {
        byte_len: best.len(),
        data_url: envelope::to_data_url(&best),
        quality: Some(best_quality),
        within_budget,
        encode_attempts,
    })
}

/// Tile one photo 3×2 onto a white 6×4 inch sheet at 300 DPI.
///
/// Each copy is drawn at its exact physical size with a light-gray cut guide
/// on top. The grid is centred on the sheet and may overflow it; overflow is
/// clipped evenly from opposite edges rather than shrinking the photos.
pub async fn create_print_sheet(
    provider: &impl SurfaceProvider,
    photo: &str,
    config: &SheetConfig,
) -> Result<PrintSheet> {
    if envelope::strip_prefix(photo).is_empty() {
        return Err(ImagingError::EmptyInput);
    }
    if let Some(reason) = config.photo.invalid_reason() {
        return Err(ImagingError::InvalidPhotoSize(reason));
    }

    let layout = SheetLayout::for_photo(&config.photo);
    if layout.photo_width_px > MAX_TILE_EDGE_PX || layout.photo_height_px > MAX_TILE_EDGE_PX {
        return Err(ImagingError::InvalidPhotoSize(format!(
            "{:.0}x{:.0} px tiles exceed the {MAX_TILE_EDGE_PX} px limit",
            layout.photo_width_px, layout.photo_height_px
        )));
    }

    let raster = decode_image(provider, photo, config.decode_timeout).await?;

    let mut surface = provider.create_surface(layout.sheet_width_px, layout.sheet_height_px)?;
    surface.fill(Rgba::WHITE);

    for (index, tile) in layout.tiles().into_iter().enumerate() {
        surface.draw_raster(&raster, tile);
        surface.stroke_rect(tile, Rgba::GUIDE_GRAY);
        debug!(index, x = tile.x, y = tile.y, "placed tile");
    }

    let encoded = provider.encode(&surface, Quality::REFERENCE)?;
    info!(
        columns = GRID_COLUMNS,
        rows = GRID_ROWS,
        width_mm = config.photo.width_mm,
        height_mm = config.photo.height_mm,
        overflow = layout.overflows(),
        bytes = encoded.len(),
        "composed print sheet"
    );

    Ok(PrintSheet {
        byte_len: encoded.len(),
        data_url: envelope::to_data_url(&encoded),
        layout,
    })
}
