use clap::{Parser, Subcommand};
use passport_photo::config::{self, AppConfig};
use passport_photo::export::{ExportRequest, export};
use passport_photo::imaging::{
    CompressConfig, CompressionBudget, PhotoSpec, RustSurfaceProvider, SheetConfig,
    compress_to_target_size, create_print_sheet,
};
use passport_photo::envelope;
use passport_photo::output::{self, CompressSummary, ExportSummary, SheetSummary};
use passport_photo::types::{FileSizeLimit, OutputFormat};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "passport_photo=info";

/// Photo size overrides shared by commands that lay out sheets.
#[derive(clap::Args, Clone)]
struct PhotoArgs {
    /// Printed photo width in millimetres (default from config: 51)
    #[arg(long)]
    width_mm: Option<f64>,

    /// Printed photo height in millimetres (default from config: 51)
    #[arg(long)]
    height_mm: Option<f64>,
}

impl PhotoArgs {
    fn resolve(&self, config: &AppConfig) -> PhotoSpec {
        let base = config.photo_spec();
        PhotoSpec::new(
            self.width_mm.unwrap_or(base.width_mm),
            self.height_mm.unwrap_or(base.height_mm),
            base.min_dpi,
        )
    }
}

/// Where and how to write the resulting image.
#[derive(clap::Args, Clone)]
struct OutputArgs {
    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Write the data URL as text instead of raw JPEG bytes
    #[arg(long)]
    data_url: bool,
}

#[derive(Parser)]
#[command(name = "passport-photo")]
#[command(about = "Size-capped passport photo export and 4x6 print sheets")]
#[command(long_about = "\
Size-capped passport photo export and 4x6 print sheets

Inputs may be JPEG or PNG files, or text files holding a data URL
(data:image/jpeg;base64,...) or bare base64. Outputs are JPEG.

  compress   Re-encode at the highest quality that fits a byte budget
  sheet      Tile six copies (3 x 2) onto a 6x4 inch sheet at 300 DPI
  export     Pick one of the above from an output format and size limit

Settings are read from ./passport-photo.toml (or --config); flags win.
Run 'passport-photo gen-config' to print a documented config file.
Set RUST_LOG=passport_photo=debug to trace each quality candidate.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./passport-photo.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print a JSON summary instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Re-encode a photo to fit under a file-size limit
    Compress {
        /// Input image file
        input: PathBuf,

        #[command(flatten)]
        out: OutputArgs,

        /// Size limit: unlimited, 50kb, 100kb, or 200kb (default from config)
        #[arg(long)]
        limit: Option<FileSizeLimit>,

        /// Exact byte budget; zero or less passes the input through
        #[arg(long, conflicts_with = "limit", allow_negative_numbers = true)]
        target_bytes: Option<i64>,
    },
    /// Compose a 6x4 inch print sheet with six copies of a photo
    Sheet {
        /// Input image file
        input: PathBuf,

        #[command(flatten)]
        out: OutputArgs,

        #[command(flatten)]
        photo: PhotoArgs,
    },
    /// Produce a named download for an output format and size limit
    Export {
        /// Input image file
        input: PathBuf,

        /// Directory to write the download into
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// single-digital or print-sheet (default from config)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Size limit for single digital files (default from config)
        #[arg(long)]
        limit: Option<FileSizeLimit>,

        #[command(flatten)]
        photo: PhotoArgs,

        /// Write the data URL as text instead of raw JPEG bytes
        #[arg(long)]
        data_url: bool,
    },
    /// Print a stock passport-photo.toml with all options documented
    GenConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let cwd = std::env::current_dir()?;
    let load_config = || config::load_config(cli.config.as_deref(), &cwd);
    let provider = RustSurfaceProvider::new();

    match cli.command {
        Command::Compress {
            input,
            out,
            limit,
            target_bytes,
        } => {
            let app_config = load_config()?;
            let image = read_image(&input)?;
            let budget = match (target_bytes, limit) {
                (Some(bytes), _) => CompressionBudget::bytes(bytes),
                (None, Some(limit)) => limit.budget(),
                (None, None) => app_config.export.size_limit.budget(),
            };
            let compress_config = CompressConfig {
                budget,
                decode_timeout: app_config.decode_timeout(),
            };
            let result = compress_to_target_size(&provider, &image, &compress_config).await?;
            write_image(&out.output, &result.data_url, out.data_url)?;

            let summary = CompressSummary::new(&display(&out.output), budget, &result);
            report(cli.json, &summary, output::print_compress_output)?;
        }
        Command::Sheet { input, out, photo } => {
            let app_config = load_config()?;
            let image = read_image(&input)?;
            let sheet_config = SheetConfig {
                photo: photo.resolve(&app_config),
                decode_timeout: app_config.decode_timeout(),
            };
            let sheet = create_print_sheet(&provider, &image, &sheet_config).await?;
            write_image(&out.output, &sheet.data_url, out.data_url)?;

            let summary = SheetSummary::new(&display(&out.output), &sheet_config.photo, &sheet);
            report(cli.json, &summary, output::print_sheet_output)?;
        }
        Command::Export {
            input,
            output_dir,
            format,
            limit,
            photo,
            data_url,
        } => {
            let app_config = load_config()?;
            let image = read_image(&input)?;
            let request = ExportRequest {
                image: &image,
                format: format.unwrap_or(app_config.export.format),
                size_limit: limit.unwrap_or(app_config.export.size_limit),
                photo: photo.resolve(&app_config),
                decode_timeout: app_config.decode_timeout(),
            };
            let download = export(&provider, &request).await?;

            std::fs::create_dir_all(&output_dir)?;
            let file_name = if data_url {
                format!("{}.txt", download.file_name)
            } else {
                download.file_name.clone()
            };
            let path = output_dir.join(file_name);
            write_image(&path, &download.data_url, data_url)?;

            let summary = ExportSummary::new(&display(&path), &download);
            report(cli.json, &summary, output::print_export_output)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install a stderr subscriber so stdout stays free for reports.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();
}

fn read_image(path: &Path) -> std::io::Result<String> {
    let contents = std::fs::read(path)?;
    Ok(envelope::from_file_contents(&contents))
}

fn write_image(
    path: &Path,
    data_url: &str,
    as_data_url: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if as_data_url {
        std::fs::write(path, data_url)?;
    } else {
        std::fs::write(path, envelope::decode_payload(data_url)?)?;
    }
    Ok(())
}

fn report<T: Serialize>(
    json: bool,
    summary: &T,
    print_text: fn(&T),
) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print_text(summary);
    }
    Ok(())
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
