//! Product-level choices shared by the CLI, config, and export stage.
//!
//! These mirror what a user picks before downloading: which document the
//! photo is for, whether they want a single digital file or a print sheet,
//! and which file-size ceiling the receiving portal enforces.

use crate::imaging::{CompressionBudget, PhotoSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Document the photo is prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocType {
    #[default]
    Passport,
}

impl DocType {
    /// Physical photo requirements for the document.
    pub fn photo_spec(self) -> PhotoSpec {
        match self {
            DocType::Passport => PhotoSpec::new(51.0, 51.0, 300),
        }
    }
}

/// What the export stage produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One photo, optionally capped to a file-size limit.
    #[default]
    SingleDigital,
    /// Six copies tiled onto a 4x6 inch sheet, always full quality.
    PrintSheet,
}

impl OutputFormat {
    /// Short label used in download file names.
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::SingleDigital => "digital",
            OutputFormat::PrintSheet => "sheet",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::SingleDigital => f.write_str("single-digital"),
            OutputFormat::PrintSheet => f.write_str("print-sheet"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single-digital" | "digital" => Ok(OutputFormat::SingleDigital),
            "print-sheet" | "sheet" => Ok(OutputFormat::PrintSheet),
            other => Err(format!(
                "unknown output format '{other}' (expected single-digital or print-sheet)"
            )),
        }
    }
}

/// File-size ceilings common on government upload portals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FileSizeLimit {
    #[default]
    #[serde(rename = "unlimited")]
    Unlimited,
    #[serde(rename = "50kb")]
    Kb50,
    #[serde(rename = "100kb")]
    Kb100,
    #[serde(rename = "200kb")]
    Kb200,
}

impl FileSizeLimit {
    pub fn kilobytes(self) -> Option<i64> {
        match self {
            FileSizeLimit::Unlimited => None,
            FileSizeLimit::Kb50 => Some(50),
            FileSizeLimit::Kb100 => Some(100),
            FileSizeLimit::Kb200 => Some(200),
        }
    }

    /// Byte budget for the compressor; unlimited maps to a passthrough budget.
    pub fn budget(self) -> CompressionBudget {
        self.kilobytes()
            .map(CompressionBudget::kilobytes)
            .unwrap_or(CompressionBudget::UNLIMITED)
    }
}

impl fmt::Display for FileSizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kilobytes() {
            Some(kb) => write!(f, "{kb}kb"),
            None => f.write_str("unlimited"),
        }
    }
}

impl FromStr for FileSizeLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unlimited" | "none" => Ok(FileSizeLimit::Unlimited),
            "50kb" => Ok(FileSizeLimit::Kb50),
            "100kb" => Ok(FileSizeLimit::Kb100),
            "200kb" => Ok(FileSizeLimit::Kb200),
            other => Err(format!(
                "unknown size limit '{other}' (expected unlimited, 50kb, 100kb, or 200kb)"
            )),
        }
    }
}
