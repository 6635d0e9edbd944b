//! # Passport Photo
//!
//! Client-side post-processing for AI-prepared passport photos. Once a
//! portrait has been transformed into a compliant photo (by a remote service
//! outside this crate), two things remain: fit it under the byte ceiling an
//! upload portal enforces, or lay it out for printing.
//!
//! # Architecture: Two Independent Operations
//!
//! ```text
//! image (data URL or base64) ──► compress_to_target_size ──► JPEG ≤ budget (best effort)
//!                            └─► create_print_sheet      ──► 6x4 in sheet, 3x2 copies
//! ```
//!
//! Both operations are stateless. Each decodes its input once (the only
//! await point, bounded by a timeout), draws onto a surface it owns
//! exclusively, re-encodes, and drops the surface. Neither calls the other,
//! though a sheet can be fed to the compressor if a size-capped sheet is
//! wanted.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Surface provider traits, layout math, quality search, the two operations |
//! | [`envelope`] | Data-URL parsing and base64 payload handling |
//! | [`export`] | Picks the operation for the user's output format and size limit |
//! | [`types`] | Document presets, output formats, file-size limits |
//! | [`config`] | `passport-photo.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Injected Surfaces
//!
//! Operations never allocate pixels themselves. They ask a
//! [`imaging::SurfaceProvider`] for decoding, blank canvases, and encoding,
//! so tests can swap in a recording provider and other hosts can bring their
//! own raster backend.
//!
//! ## Exact Sizes, Bounded Search
//!
//! The compressor measures candidates by their exact encoded length and
//! stops after a fixed number of bisection steps. The result is the best
//! candidate seen, which can still exceed the budget when nothing fits.
//!
//! ## Overflowing Print Grid
//!
//! Print sheets always hold 3x2 copies at true physical size. A 51 mm photo
//! makes the grid about 7 px wider than a 6 inch sheet; the grid is centred
//! and the excess clipped evenly instead of shrinking the photos.

pub mod config;
pub mod envelope;
pub mod export;
pub mod imaging;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
