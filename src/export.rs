//! Final output stage: turn a transformed portrait into a downloadable file.
//!
//! The caller hands over the image the transform service returned (bare
//! base64 or a data URL) plus the user's choices:
//!
//! ```text
//! single-digital + unlimited  →  input, normalised to a data URL
//! single-digital + 50kb       →  compress_to_target_size (≤ 51 200 bytes, best effort)
//! print-sheet    + any limit  →  create_print_sheet (never compressed)
//! ```
//!
//! Print sheets ignore the size limit: they are meant for a photo lab and
//! need full quality.

use crate::imaging::{
    CompressConfig, DEFAULT_DECODE_TIMEOUT, ImagingError, PhotoSpec, SheetConfig,
    SurfaceProvider, compress_to_target_size, create_print_sheet,
};
use crate::types::{DocType, FileSizeLimit, OutputFormat};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to generate print sheet: {0}")]
    Sheet(#[source] ImagingError),
    #[error("Failed to compress photo: {0}")]
    Compress(#[source] ImagingError),
}

/// Everything needed to produce one download.
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub image: &'a str,
    pub format: OutputFormat,
    pub size_limit: FileSizeLimit,
    pub photo: PhotoSpec,
    pub decode_timeout: Duration,
}

impl<'a> ExportRequest<'a> {
    pub fn new(image: &'a str, format: OutputFormat, size_limit: FileSizeLimit) -> Self {
        Self {
            image,
            format,
            size_limit,
            photo: DocType::Passport.photo_spec(),
            decode_timeout: DEFAULT_DECODE_TIMEOUT,
        }
    }
}

/// A finished download.
#[derive(Debug, Clone)]
pub struct Export {
    pub data_url: String,
    pub file_name: String,
    pub byte_len: usize,
    pub format: OutputFormat,
    /// Size limit actually applied (print sheets are never limited).
    pub applied_limit: FileSizeLimit,
    /// False only when a size limit could not be met.
    pub within_limit: bool,
}

/// Download file name, e.g. `passport_photo_digital_50kb.jpg` or `passport_photo_sheet_HQ.jpg`.
pub fn download_file_name(format: OutputFormat, applied_limit: FileSizeLimit) -> String {
    let size = match applied_limit {
        FileSizeLimit::Unlimited => "HQ".to_string(),
        limit => limit.to_string(),
    };
    format!("passport_photo_{}_{}.jpg", format.label(), size)
}

/// Produce the download for `request`.
pub async fn export(
    provider: &impl SurfaceProvider,
    request: &ExportRequest<'_>,
) -> Result<Export, ExportError> {
    let export = match request.format {
        OutputFormat::PrintSheet => {
            let config = SheetConfig {
                photo: request.photo,
                decode_timeout: request.decode_timeout,
            };
            let sheet = create_print_sheet(provider, request.image, &config)
                .await
                .map_err(ExportError::Sheet)?;
            Export {
                data_url: sheet.data_url,
                file_name: download_file_name(request.format, FileSizeLimit::Unlimited),
                byte_len: sheet.byte_len,
                format: request.format,
                applied_limit: FileSizeLimit::Unlimited,
                within_limit: true,
            }
        }
        OutputFormat::SingleDigital => {
            let config = CompressConfig {
                budget: request.size_limit.budget(),
                decode_timeout: request.decode_timeout,
            };
            let compressed = compress_to_target_size(provider, request.image, &config)
                .await
                .map_err(ExportError::Compress)?;
            Export {
                data_url: compressed.data_url,
                file_name: download_file_name(request.format, request.size_limit),
                byte_len: compressed.byte_len,
                format: request.format,
                applied_limit: request.size_limit,
                within_limit: compressed.within_budget,
            }
        }
    };

    info!(
        file = %export.file_name,
        bytes = export.byte_len,
        within_limit = export.within_limit,
        "export ready"
    );
    Ok(export)
}
