//! Configuration module for pagedeck.
//!
//! This module turns CLI arguments into a validated configuration that drives
//! an editing run. It handles:
//! - Validation of argument combinations
//! - Page range parsing for `--order` and `--remove`
//! - Overwrite, compression and image sizing policies
//! - Output metadata normalization

use anyhow::{Context, Result, bail};

use crate::PageDeckError;
use std::{path::PathBuf, str::FromStr};

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// No compression - copied streams are written as they were read.
    None,
    /// Compress streams.
    #[default]
    Standard,
    /// Compress streams, drop unreferenced objects and renumber the rest.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PageDeckError;
    /// Parse compression level from string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation: "none", "standard", or "maximum"
    ///
    /// # Errors
    ///
    /// Returns an error if the string doesn't match a valid compression level.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PageDeckError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// How uploaded images are sized when turned into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageSizing {
    /// Page takes the image's own size, capped to 2000pt on the long side.
    #[default]
    Intrinsic,
    /// Image is fitted and centered into the first page of the collection.
    MatchFirstPage,
}

/// Page positions selected by the user.
///
/// Supports individual pages and ranges, kept in the order written:
/// - "1" - single page
/// - "1-5" - range of pages (inclusive)
/// - "3,1,2" - individual pages in a custom order
/// - "4-6,1-3" - ranges in a custom order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    ranges: Vec<PageRangeItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageRangeItem {
    Single(u32),
    Range(u32, u32),
}

impl PageRangeItem {
    fn last(&self) -> u32 {
        match self {
            Self::Single(p) => *p,
            Self::Range(_, end) => *end,
        }
    }
}

impl PageRange {
    /// Parse a page range string.
    ///
    /// # Arguments
    ///
    /// * `s` - Page range string (e.g., "3,1-2")
    ///
    /// # Errors
    ///
    /// Returns an error if the string format is invalid or contains invalid page numbers.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagedeck::config::PageRange;
    ///
    /// let range = PageRange::parse("1-5,10").unwrap();
    /// assert!(range.contains(3));
    /// assert!(range.contains(10));
    /// assert!(!range.contains(7));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let mut ranges = Vec::new();

        for part in s.split(',') {
            let part = part.trim();

            if part.contains('-') {
                let parts: Vec<&str> = part.split('-').collect();
                if parts.len() != 2 {
                    bail!("Invalid page range format: {part}. Expected format like '1-5'");
                }

                let start: u32 = parts[0]
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid page number: {}", parts[0]))?;

                let end: u32 = parts[1]
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid page number: {}", parts[1]))?;

                if start == 0 || end == 0 {
                    bail!("Page numbers must be positive (1-indexed)");
                }

                if start > end {
                    bail!(
                        "Invalid range {start}-{end}: start page must be less than or equal to end page"
                    );
                }

                ranges.push(PageRangeItem::Range(start, end));
            } else {
                let page: u32 = part
                    .parse()
                    .with_context(|| format!("Invalid page number: {part}"))?;

                if page == 0 {
                    bail!("Page numbers must be positive (1-indexed)");
                }

                ranges.push(PageRangeItem::Single(page));
            }
        }

        if ranges.is_empty() {
            bail!("Page range cannot be empty");
        }

        Ok(Self { ranges })
    }

    /// Check if a page number is included in this range.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-indexed page number
    pub fn contains(&self, page: u32) -> bool {
        self.ranges.iter().any(|item| match item {
            PageRangeItem::Single(p) => *p == page,
            PageRangeItem::Range(start, end) => page >= *start && page <= *end,
        })
    }

    /// Highest page number referenced by this range.
    pub fn max_page(&self) -> u32 {
        self.ranges.iter().map(PageRangeItem::last).max().unwrap_or(0)
    }

    /// Get all page numbers included in this range up to a maximum.
    ///
    /// # Returns
    ///
    /// A sorted vector of 1-indexed page numbers.
    pub fn to_pages(&self, max_pages: u32) -> Vec<u32> {
        (1..=max_pages).filter(|p| self.contains(*p)).collect()
    }

    /// Expand the range in the order it was written.
    ///
    /// Repeated pages keep their first position.
    ///
    /// # Errors
    ///
    /// Returns an error if any referenced page is greater than `max_pages`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagedeck::config::PageRange;
    ///
    /// let range = PageRange::parse("3,1-2").unwrap();
    /// assert_eq!(range.ordered_positions(3).unwrap(), vec![3, 1, 2]);
    /// ```
    pub fn ordered_positions(&self, max_pages: u32) -> Result<Vec<u32>> {
        let highest = self.max_page();
        if highest > max_pages {
            bail!("Page {highest} does not exist (document has {max_pages} page(s))");
        }

        let mut pages = Vec::new();
        for item in &self.ranges {
            let span = match item {
                PageRangeItem::Single(p) => *p..=*p,
                PageRangeItem::Range(start, end) => *start..=*end,
            };
            for page in span {
                if !pages.contains(&page) {
                    pages.push(page);
                }
            }
        }

        Ok(pages)
    }
}

/// PDF metadata to set on the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document keywords (comma-separated).
    pub keywords: Option<String>,
}

impl Metadata {
    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
    }

    /// Create metadata from optional strings, trimming whitespace.
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        subject: Option<String>,
        keywords: Option<String>,
    ) -> Self {
        let to_string_opt = |opt: Option<String>| {
            opt.filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
        };

        Self {
            title: to_string_opt(title),
            author: to_string_opt(author),
            subject: to_string_opt(subject),
            keywords: to_string_opt(keywords),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for an editing run.
///
/// Derived from CLI arguments and validated before any file is read.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input files or glob patterns (in upload order).
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Dry run mode - plan the edit without creating output.
    pub dry_run: bool,

    /// Print the plan as JSON.
    pub json: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Metadata to set on output document.
    pub metadata: Metadata,

    /// How images become pages.
    pub image_sizing: ImageSizing,

    /// Pages to keep, in their new order.
    pub order: Option<PageRange>,

    /// Pages to delete.
    pub remove: Option<PageRange>,
}

impl Config {
    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - `order` and `remove` are both set
    /// - The output path is also an input
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.order.is_some() && self.remove.is_some() {
            bail!("Cannot use both --order and --remove");
        }

        for input in &self.inputs {
            if input == &self.output {
                bail!(
                    "Output file cannot be the same as an input file: {}",
                    self.output.display()
                );
            }
        }

        Ok(())
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
