//! Pure calculation functions for sheet layout and quality search.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{PhotoSpec, Quality, TileRect};

/// Resolution every print sheet is rendered at.
pub const SHEET_DPI: u32 = 300;
/// Sheet width in inches (landscape 4x6 photo paper).
pub const SHEET_WIDTH_IN: u32 = 6;
/// Sheet height in inches.
pub const SHEET_HEIGHT_IN: u32 = 4;
/// Millimetre-to-inch conversion factor.
pub const MM_TO_INCH: f64 = 0.0393701;
/// Copies per row.
pub const GRID_COLUMNS: u32 = 3;
/// Rows of copies.
pub const GRID_ROWS: u32 = 2;

/// Convert a physical length to (fractional) pixels at the given resolution.
///
/// # Examples
/// ```
/// # use passport_photo::imaging::mm_to_px;
/// let px = mm_to_px(51.0, 300);
/// assert!((px - 602.36).abs() < 0.01);
/// ```
pub fn mm_to_px(mm: f64, dpi: u32) -> f64 {
    mm * MM_TO_INCH * dpi as f64
}

/// Fixed 3×2 grid of photo copies centred on a 6×4 inch sheet.
///
/// The grid is never shrunk to fit. When three copies are wider than the
/// sheet (51 mm × 3 > 152.4 mm) the start offset goes negative and the
/// overflow is clipped evenly from both edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetLayout {
    pub sheet_width_px: u32,
    pub sheet_height_px: u32,
    pub photo_width_px: f64,
    pub photo_height_px: f64,
    pub start_x: f64,
    pub start_y: f64,
}

impl SheetLayout {
    pub fn for_photo(photo: &PhotoSpec) -> Self {
        let sheet_width_px = SHEET_WIDTH_IN * SHEET_DPI;
        let sheet_height_px = SHEET_HEIGHT_IN * SHEET_DPI;
        let photo_width_px = mm_to_px(photo.width_mm, SHEET_DPI);
        let photo_height_px = mm_to_px(photo.height_mm, SHEET_DPI);

        let start_x = (sheet_width_px as f64 - Self::grid_extent(photo_width_px, GRID_COLUMNS)) / 2.0;
        let start_y = (sheet_height_px as f64 - Self::grid_extent(photo_height_px, GRID_ROWS)) / 2.0;

        Self {
            sheet_width_px,
            sheet_height_px,
            photo_width_px,
            photo_height_px,
            start_x,
            start_y,
        }
    }

    fn grid_extent(cell: f64, count: u32) -> f64 {
        cell * count as f64
    }

    pub fn grid_width_px(&self) -> f64 {
        Self::grid_extent(self.photo_width_px, GRID_COLUMNS)
    }

    pub fn grid_height_px(&self) -> f64 {
        Self::grid_extent(self.photo_height_px, GRID_ROWS)
    }

    /// Tile rectangles in row-major order (left to right, top to bottom).
    pub fn tiles(&self) -> Vec<TileRect> {
        (0..GRID_ROWS)
            .flat_map(|row| (0..GRID_COLUMNS).map(move |col| (row, col)))
            .map(|(row, col)| TileRect {
                x: self.start_x + col as f64 * self.photo_width_px,
                y: self.start_y + row as f64 * self.photo_height_px,
                width: self.photo_width_px,
                height: self.photo_height_px,
            })
            .collect()
    }

    /// Whether the grid extends past any sheet edge.
    pub fn overflows(&self) -> bool {
        self.start_x < 0.0 || self.start_y < 0.0
    }
}

/// Bounded bisection over encoder quality.
///
/// Each step proposes the midpoint of the current bounds. A candidate that
/// fits raises the floor, one that doesn't lowers the ceiling. The search
/// stops after a fixed number of steps whether or not it has converged.
#[derive(Debug, Clone, PartialEq)]
pub struct QualitySearch {
    min: f64,
    max: f64,
    remaining: u32,
}

impl QualitySearch {
    pub const FLOOR: f64 = 0.1;
    pub const CEILING: f64 = 1.0;
    pub const ITERATIONS: u32 = 6;

    pub fn new() -> Self {
        Self {
            min: Self::FLOOR,
            max: Self::CEILING,
            remaining: Self::ITERATIONS,
        }
    }

    /// Quality to try next, or `None` once the step budget is spent.
    pub fn next_quality(&self) -> Option<Quality> {
        (self.remaining > 0).then(|| Quality::new(self.midpoint()))
    }

    /// Feed back whether the last proposed quality fit the budget.
    pub fn record(&mut self, fits: bool) {
        if self.remaining == 0 {
            return;
        }
        let mid = self.midpoint();
        if fits {
            self.min = mid;
        } else {
            self.max = mid;
        }
        self.remaining -= 1;
    }

    fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

impl Default for QualitySearch {
    fn default() -> Self {
        Self::new()
    }
}
