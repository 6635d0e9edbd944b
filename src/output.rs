//! CLI output formatting for every command.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O. With `--json` the same
//! information is emitted as a single JSON object instead.
//!
//! # Output Format
//!
//! ## Compress
//!
//! ```text
//! Compressed → photo-50kb.jpg
//!     Budget: 51200 bytes
//!     Result: 49213 bytes at quality 0.49
//!     Encodes: 7
//! ```
//!
//! ## Sheet
//!
//! ```text
//! Print sheet → sheet.jpg (1800x1200 px, 6x4 in at 300 DPI)
//!     Photo: 51 x 51 mm → 602.4 x 602.4 px
//!     Grid: 3 x 2 from (-3.5, -2.4)
//!     Overflow: grid is wider or taller than the sheet; edges clipped evenly
//! ```

use crate::export::Export;
use crate::imaging::{
    CompressionBudget, Compressed, GRID_COLUMNS, GRID_ROWS, PhotoSpec, PrintSheet, SHEET_DPI,
    SHEET_HEIGHT_IN, SHEET_WIDTH_IN,
};
use serde::Serialize;

/// Machine-readable summary of a compression run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompressSummary {
    pub output: String,
    pub budget_bytes: i64,
    pub bytes: usize,
    pub quality: Option<f64>,
    pub within_budget: bool,
    pub encodes: u32,
}

impl CompressSummary {
    pub fn new(output: &str, budget: CompressionBudget, result: &Compressed) -> Self {
        Self {
            output: output.to_string(),
            budget_bytes: budget.value(),
            bytes: result.byte_len,
            quality: result.quality.map(|q| q.value()),
            within_budget: result.within_budget,
            encodes: result.encode_attempts,
        }
    }
}

/// Machine-readable summary of a print sheet.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SheetSummary {
    pub output: String,
    pub sheet_width_px: u32,
    pub sheet_height_px: u32,
    pub photo_width_mm: f64,
    pub photo_height_mm: f64,
    pub photo_width_px: f64,
    pub photo_height_px: f64,
    pub start_x: f64,
    pub start_y: f64,
    pub overflows: bool,
    pub bytes: usize,
}

impl SheetSummary {
    pub fn new(output: &str, photo: &PhotoSpec, sheet: &PrintSheet) -> Self {
        let layout = &sheet.layout;
        Self {
            output: output.to_string(),
            sheet_width_px: layout.sheet_width_px,
            sheet_height_px: layout.sheet_height_px,
            photo_width_mm: photo.width_mm,
            photo_height_mm: photo.height_mm,
            photo_width_px: layout.photo_width_px,
            photo_height_px: layout.photo_height_px,
            start_x: layout.start_x,
            start_y: layout.start_y,
            overflows: layout.overflows(),
            bytes: sheet.byte_len,
        }
    }
}

/// Machine-readable summary of an export.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportSummary {
    pub output: String,
    pub format: String,
    pub size_limit: String,
    pub bytes: usize,
    pub within_limit: bool,
}

impl ExportSummary {
    pub fn new(output: &str, export: &Export) -> Self {
        Self {
            output: output.to_string(),
            format: export.format.to_string(),
            size_limit: export.applied_limit.to_string(),
            bytes: export.byte_len,
            within_limit: export.within_limit,
        }
    }
}

pub fn format_compress_output(summary: &CompressSummary) -> Vec<String> {
    let mut lines = vec![format!("Compressed → {}", summary.output)];
    if summary.budget_bytes <= 0 {
        lines.push("    Budget: none (input passed through)".to_string());
        lines.push(format!("    Result: {} bytes", summary.bytes));
        return lines;
    }
    lines.push(format!("    Budget: {} bytes", summary.budget_bytes));
    match summary.quality {
        Some(q) => lines.push(format!(
            "    Result: {} bytes at quality {:.2}",
            summary.bytes, q
        )),
        None => lines.push(format!("    Result: {} bytes", summary.bytes)),
    }
    lines.push(format!("    Encodes: {}", summary.encodes));
    if !summary.within_budget {
        lines.push("    Warning: no quality fit the budget; kept the high-quality encode".to_string());
    }
    lines
}

pub fn format_sheet_output(summary: &SheetSummary) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Print sheet → {} ({}x{} px, {}x{} in at {} DPI)",
            summary.output,
            summary.sheet_width_px,
            summary.sheet_height_px,
            SHEET_WIDTH_IN,
            SHEET_HEIGHT_IN,
            SHEET_DPI
        ),
        format!(
            "    Photo: {} x {} mm → {:.1} x {:.1} px",
            summary.photo_width_mm,
            summary.photo_height_mm,
            summary.photo_width_px,
            summary.photo_height_px
        ),
        format!(
            "    Grid: {} x {} from ({:.1}, {:.1})",
            GRID_COLUMNS, GRID_ROWS, summary.start_x, summary.start_y
        ),
    ];
    if summary.overflows {
        lines.push(
            "    Overflow: grid is wider or taller than the sheet; edges clipped evenly"
                .to_string(),
        );
    }
    lines
}

pub fn format_export_output(summary: &ExportSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Exported → {}", summary.output),
        format!("    Format: {}", summary.format),
        format!("    Size limit: {}", summary.size_limit),
        format!("    Size: {} bytes", summary.bytes),
    ];
    if !summary.within_limit {
        lines.push("    Warning: file is larger than the selected limit".to_string());
    }
    lines
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_compress_output(summary: &CompressSummary) {
    print_lines(format_compress_output(summary));
}

pub fn print_sheet_output(summary: &SheetSummary) {
    print_lines(format_sheet_output(summary));
}

pub fn print_export_output(summary: &ExportSummary) {
    print_lines(format_export_output(summary));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compress_summary() -> CompressSummary {
        CompressSummary {
            output: "photo.jpg".to_string(),
            budget_bytes: 51_200,
            bytes: 49_375,
            quality: Some(0.49375),
            within_budget: true,
            encodes: 7,
        }
    }

    #[test]
    fn compress_output_lists_budget_and_result() {
        let lines = format_compress_output(&compress_summary());
        assert_eq!(
            lines,
            vec![
                "Compressed → photo.jpg",
                "    Budget: 51200 bytes",
                "    Result: 49375 bytes at quality 0.49",
                "    Encodes: 7",
            ]
        );
    }

    #[test]
    fn compress_output_warns_when_over_budget() {
        let summary = CompressSummary {
            within_budget: false,
            ..compress_summary()
        };
        let lines = format_compress_output(&summary);
        assert!(lines.last().unwrap().starts_with("    Warning:"));
    }

    #[test]
    fn passthrough_output_has_no_encode_count() {
        let summary = CompressSummary {
            budget_bytes: 0,
            quality: None,
            encodes: 0,
            ..compress_summary()
        };
        let lines = format_compress_output(&summary);
        assert_eq!(lines[1], "    Budget: none (input passed through)");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn sheet_output_reports_overflow() {
        let summary = SheetSummary {
            output: "sheet.jpg".to_string(),
            sheet_width_px: 1800,
            sheet_height_px: 1200,
            photo_width_mm: 51.0,
            photo_height_mm: 51.0,
            photo_width_px: 602.3625,
            photo_height_px: 602.3625,
            start_x: -3.5438,
            start_y: -2.3625,
            overflows: true,
            bytes: 300_000,
        };
        let lines = format_sheet_output(&summary);
        assert_eq!(
            lines[0],
            "Print sheet → sheet.jpg (1800x1200 px, 6x4 in at 300 DPI)"
        );
        assert_eq!(lines[1], "    Photo: 51 x 51 mm → 602.4 x 602.4 px");
        assert_eq!(lines[2], "    Grid: 3 x 2 from (-3.5, -2.4)");
        assert!(lines[3].starts_with("    Overflow:"));
    }

    #[test]
    fn summaries_serialize_to_json() {
        let json = serde_json::to_value(compress_summary()).unwrap();
        assert_eq!(json["bytes"], 49_375);
        assert_eq!(json["within_budget"], true);
    }
}
