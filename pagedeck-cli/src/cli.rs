//! CLI argument parsing for pagedeck.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled by the build script to render the man page, so it
//! only depends on `clap`, `std` and the library.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use pagedeck::config::{CompressionLevel, Config, ImageSizing, Metadata, OverwriteMode, PageRange};
use pagedeck::error::{PageDeckError, Result};
use pagedeck::utils::collect_paths_for_patterns;

/// Collect PDF pages and images into one reordered PDF.
///
/// pagedeck loads PDFs and images (PNG, JPEG, WebP, GIF, BMP, TIFF) in the
/// order given, places every image on its own page, lets you keep, reorder
/// or delete pages by position, and writes the result as a single PDF.
#[derive(Parser, Debug)]
#[command(name = "pagedeck")]
#[command(version)]
#[command(about = "Collect PDF pages and images into one reordered PDF", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF or image files (in order)
    ///
    /// Glob patterns are expanded, matches in sorted order.
    /// Unsupported files are skipped (listed with --verbose).
    ///
    /// Examples:
    ///   pagedeck contract.pdf signature.jpg -o signed.pdf
    ///   pagedeck 'scans/*.png' -o scans.pdf
    #[arg(required = true, value_name = "FILE|GLOB")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE", default_value = "edited-document.pdf")]
    pub output: PathBuf,

    /// Keep and reorder pages by position (e.g. "3,1-2")
    ///
    /// Positions are 1-based over all loaded pages, in load order.
    /// Pages not listed are deleted.
    #[arg(long, value_name = "RANGE", conflicts_with = "remove")]
    pub order: Option<String>,

    /// Delete pages by position (e.g. "2,5-7")
    #[arg(long, value_name = "RANGE")]
    pub remove: Option<String>,

    /// Fit images into the size of the first page
    ///
    /// By default each image page takes the image's own size,
    /// scaled down so neither side exceeds 2000pt.
    #[arg(long)]
    pub match_page_size: bool,

    /// Dry run - load inputs and show the resulting page list without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Verbose output - show per-page details and statistics
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for output PDF
    ///
    /// - none: No compression
    /// - standard: Compress streams (default)
    /// - maximum: Compress streams and drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Set title metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set author metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Set subject metadata for output PDF
    #[arg(long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// Set keywords metadata for output PDF (comma-separated)
    #[arg(long, value_name = "TEXT")]
    pub keywords: Option<String>,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// Input patterns are expanded here.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A glob pattern is invalid
    /// - Compression level is invalid
    /// - A page range is invalid
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let inputs = collect_paths_for_patterns(&self.inputs)?;

        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let image_sizing = if self.match_page_size {
            ImageSizing::MatchFirstPage
        } else {
            ImageSizing::Intrinsic
        };

        let config = Config {
            inputs,
            output: self.output.clone(),
            dry_run: self.dry_run,
            json: self.json,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode,
            compression,
            metadata: Metadata::new(
                self.title.clone(),
                self.author.clone(),
                self.subject.clone(),
                self.keywords.clone(),
            ),
            image_sizing,
            order: parse_range(self.order.as_deref())?,
            remove: parse_range(self.remove.as_deref())?,
        };

        config.validate().map_err(|e| {
            PageDeckError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(PageDeckError::invalid_config("No input files specified"));
        }

        if self.order.is_some() && self.remove.is_some() {
            return Err(PageDeckError::invalid_config(
                "Cannot use both --order and --remove",
            ));
        }

        if self.json && !self.dry_run {
            return Err(PageDeckError::invalid_config("--json requires --dry-run"));
        }

        parse_range(self.order.as_deref())?;
        parse_range(self.remove.as_deref())?;

        Ok(())
    }

    /// Default log filter for the verbosity flags.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "pagedeck=debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

fn parse_range(value: Option<&str>) -> Result<Option<PageRange>> {
    value
        .map(|s| PageRange::parse(s).map_err(|e| PageDeckError::invalid_config(e.to_string())))
        .transpose()
}
