//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what to draw and encode) and the
//! [`surface`](super::surface) provider (which does the actual pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality in `[0.0, 1.0]`. Clamped on construction.
//! - [`CompressionBudget`]: Target encoded size in bytes; non-positive means "no limit".
//! - [`PhotoSpec`]: Physical photo size in millimetres plus the minimum DPI.
//! - [`TileRect`]: A floating-point rectangle on a surface, rounded only at draw time.
//! - [`Rgba`]: An 8-bit colour, with the sheet background and cut-guide colours.

use serde::{Deserialize, Serialize};

/// Quality setting for lossy image encoding, from 0.0 (worst) to 1.0 (best).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Quality(f64);

impl Quality {
    /// High-quality reference encode, also used for print sheets.
    pub const REFERENCE: Quality = Quality(0.95);

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::REFERENCE;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Integer quality level (1–100) understood by JPEG encoders.
    pub fn jpeg_level(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Target encoded size in bytes.
///
/// A budget of zero or less disables re-encoding entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressionBudget(i64);

impl CompressionBudget {
    pub const UNLIMITED: CompressionBudget = CompressionBudget(0);

    pub fn bytes(bytes: i64) -> Self {
        Self(bytes)
    }

    pub fn kilobytes(kb: i64) -> Self {
        Self(kb.saturating_mul(1024))
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Whether this budget triggers a quality search.
    pub fn is_limited(self) -> bool {
        self.0 > 0
    }

    /// Whether an encoding of `len` bytes fits within the budget.
    pub fn fits(self, len: usize) -> bool {
        i64::try_from(len).is_ok_and(|len| len <= self.0)
    }
}

/// Physical dimensions of a single printed photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhotoSpec {
    pub width_mm: f64,
    pub height_mm: f64,
    pub min_dpi: u32,
}

impl PhotoSpec {
    pub fn new(width_mm: f64, height_mm: f64, min_dpi: u32) -> Self {
        Self {
            width_mm,
            height_mm,
            min_dpi,
        }
    }

    /// Describe the first invalid dimension, if any.
    pub fn invalid_reason(&self) -> Option<String> {
        if !(self.width_mm.is_finite() && self.width_mm > 0.0) {
            return Some(format!("width must be positive, got {} mm", self.width_mm));
        }
        if !(self.height_mm.is_finite() && self.height_mm > 0.0) {
            return Some(format!("height must be positive, got {} mm", self.height_mm));
        }
        if self.min_dpi == 0 {
            return Some("minimum DPI must be positive".to_string());
        }
        None
    }
}

/// Axis-aligned rectangle in surface pixels.
///
/// Coordinates stay fractional (and may be negative) so grid layouts don't
/// accumulate rounding drift; canvases round each edge when drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TileRect {
    /// Pixel edges `(left, top, right, bottom)` after rounding, right/bottom exclusive.
    pub fn pixel_edges(&self) -> (i64, i64, i64, i64) {
        (
            self.x.round() as i64,
            self.y.round() as i64,
            (self.x + self.width).round() as i64,
            (self.y + self.height).round() as i64,
        )
    }
}

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);
    /// Light gray (`#d1d5db`) used for cut guides.
    pub const GUIDE_GRAY: Rgba = Rgba([0xd1, 0xd5, 0xdb, 255]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(-0.5).value(), 0.0);
        assert_eq!(Quality::new(0.5).value(), 0.5);
        assert_eq!(Quality::new(1.5).value(), 1.0);
    }

    #[test]
    fn quality_default_is_reference() {
        assert_eq!(Quality::default().value(), 0.95);
    }

    #[test]
    fn quality_maps_to_jpeg_levels() {
        assert_eq!(Quality::new(0.95).jpeg_level(), 95);
        assert_eq!(Quality::new(0.49375).jpeg_level(), 49);
        assert_eq!(Quality::new(0.0).jpeg_level(), 1);
        assert_eq!(Quality::new(1.0).jpeg_level(), 100);
    }

    #[test]
    fn budget_limits_only_when_positive() {
        assert!(!CompressionBudget::UNLIMITED.is_limited());
        assert!(!CompressionBudget::bytes(-10).is_limited());
        assert!(CompressionBudget::bytes(1).is_limited());
        assert_eq!(CompressionBudget::kilobytes(50).value(), 51_200);
    }

    #[test]
    fn budget_fits_is_inclusive() {
        let budget = CompressionBudget::bytes(1000);
        assert!(budget.fits(999));
        assert!(budget.fits(1000));
        assert!(!budget.fits(1001));
    }

    #[test]
    fn photo_spec_rejects_non_positive_dimensions() {
        assert!(PhotoSpec::new(51.0, 51.0, 300).invalid_reason().is_none());
        assert!(PhotoSpec::new(0.0, 51.0, 300).invalid_reason().is_some());
        assert!(PhotoSpec::new(51.0, -1.0, 300).invalid_reason().is_some());
        assert!(PhotoSpec::new(f64::NAN, 51.0, 300).invalid_reason().is_some());
        assert!(PhotoSpec::new(51.0, 51.0, 0).invalid_reason().is_some());
    }

    #[test]
    fn tile_rect_rounds_each_edge_independently() {
        let rect = TileRect {
            x: -3.54,
            y: 0.5,
            width: 602.36,
            height: 602.36,
        };
        assert_eq!(rect.pixel_edges(), (-4, 1, 599, 603));
    }
}
