//! # officemd
//!
//! Convert Word documents (.docx) and PowerPoint presentations (.pptx) into
//! a single `index.md` plus an `images/` directory of extracted pictures.
//!
//! ## Quick Start
//!
//! ```no_run
//! use officemd::convert_file_default;
//!
//! // Writes report/index.md and report/images/ next to report.docx
//! let report = convert_file_default("report.docx")?;
//! println!("{} ({} images)", report.markdown_path.display(), report.images_written);
//! # Ok::<(), officemd::Error>(())
//! ```
//!
//! ## Options
//!
//! ```no_run
//! use officemd::{convert_file, ConvertOptions, TablePlacement};
//!
//! let options = ConvertOptions::new()
//!     .with_table_placement(TablePlacement::DocumentOrder)
//!     .with_heading_font_size(28.0);
//!
//! convert_file("slides.pptx", "out/slides", &options)?;
//! # Ok::<(), officemd::Error>(())
//! ```
//!
//! ## Format-Specific APIs
//!
//! ```no_run
//! use officemd::docx::DocxParser;
//! use officemd::pptx::PptxParser;
//!
//! // Word documents
//! let doc = DocxParser::open("report.docx")?.parse()?;
//!
//! // PowerPoint presentations
//! let presentation = PptxParser::open("slides.pptx")?.parse()?;
//! # Ok::<(), officemd::Error>(())
//! ```
//!
//! ## Features
//!
//! - `docx` (default): Word document support
//! - `pptx` (default): PowerPoint presentation support

pub mod container;
pub mod detect;
pub mod error;
pub mod media;
pub mod model;

#[cfg(feature = "docx")]
pub mod docx;

#[cfg(feature = "pptx")]
pub mod pptx;

pub mod render;

// Re-exports
pub use container::{Package, Relationship, Relationships};
pub use detect::{detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, Result};
pub use media::{ImageRef, ImageStore, RelationshipMap, IMAGES_DIR_NAME};
pub use model::{
    Block, Cell, ListInfo, Paragraph, Presentation, Row, Shape, Slide, Table, TextRun, TextStyle,
    WordDocument,
};
pub use render::{ConvertOptions, MarkdownBuffer, TablePlacement, MARKDOWN_FILE_NAME};

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of one conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Detected input format
    pub format: FormatType,
    /// Path of the written `index.md`
    pub markdown_path: PathBuf,
    /// Directory holding the extracted images
    pub images_dir: PathBuf,
    /// Number of image files written
    pub images_written: usize,
    /// Image references whose target part was missing from the package
    pub skipped_images: usize,
}

/// Convert a document into `output_dir`.
///
/// The format is detected from the file content. `output_dir` and its
/// `images/` subdirectory are created if absent; existing files with the
/// same names are overwritten.
///
/// # Example
///
/// ```no_run
/// use officemd::{convert_file, ConvertOptions};
///
/// let report = convert_file("report.docx", "out", &ConvertOptions::default())?;
/// assert!(report.markdown_path.ends_with("index.md"));
/// # Ok::<(), officemd::Error>(())
/// ```
pub fn convert_file(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();

    if !input.is_file() {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }

    let format = detect_format_from_path(input)?;
    let title = document_title(input);
    log::debug!("converting {} as {}", input.display(), format);

    let report = match format {
        #[cfg(feature = "docx")]
        FormatType::Docx => convert_docx(input, output_dir, &title, options)?,
        #[cfg(feature = "pptx")]
        FormatType::Pptx => convert_pptx(input, output_dir, &title, options)?,
        #[cfg(not(all(feature = "docx", feature = "pptx")))]
        _ => return Err(Error::UnsupportedFormat(format.extension().to_string())),
    };

    log::info!(
        "wrote {} with {} images ({} skipped)",
        report.markdown_path.display(),
        report.images_written,
        report.skipped_images
    );
    Ok(report)
}

/// Convert a document into its default output directory with default options.
///
/// # Example
///
/// ```no_run
/// use officemd::convert_file_default;
///
/// let report = convert_file_default("slides.pptx")?;
/// println!("{}", report.images_dir.display());
/// # Ok::<(), officemd::Error>(())
/// ```
pub fn convert_file_default(input: impl AsRef<Path>) -> Result<ConversionReport> {
    let input = input.as_ref();
    convert_file(input, default_output_dir(input), &ConvertOptions::default())
}

/// Sibling directory named after the input's stem: `<parent>/<stem>`.
pub fn default_output_dir(input: impl AsRef<Path>) -> PathBuf {
    let input = input.as_ref();
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    parent.join(document_title(input))
}

/// File stem used for the leading `# <stem>` heading.
pub fn document_title(input: impl AsRef<Path>) -> String {
    input
        .as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(feature = "docx")]
fn convert_docx(
    input: &Path,
    output_dir: &Path,
    title: &str,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    let parser = docx::DocxParser::open(input)?;
    let document = parser.parse()?;

    let mut store = ImageStore::create(output_dir)?;
    let images = RelationshipMap::extract(parser.package(), parser.main_part(), &mut store)?;
    let buffer = docx::render_document(&document, &images, title, options);

    Ok(ConversionReport {
        format: FormatType::Docx,
        markdown_path: write_markdown(&buffer, output_dir)?,
        images_dir: store.dir().to_path_buf(),
        images_written: store.written(),
        skipped_images: images.skipped(),
    })
}

#[cfg(feature = "pptx")]
fn convert_pptx(
    input: &Path,
    output_dir: &Path,
    title: &str,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    let parser = pptx::PptxParser::open(input)?;
    let presentation = parser.parse()?;

    let mut store = ImageStore::create(output_dir)?;
    let rendered = pptx::render_presentation(&presentation, &mut store, title, options)?;

    Ok(ConversionReport {
        format: FormatType::Pptx,
        markdown_path: write_markdown(&rendered.buffer, output_dir)?,
        images_dir: store.dir().to_path_buf(),
        images_written: store.written(),
        skipped_images: rendered.skipped_images,
    })
}

/// Images are already on disk when this runs.
fn write_markdown(buffer: &MarkdownBuffer, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(MARKDOWN_FILE_NAME);
    buffer.write_to(&path)?;
    Ok(path)
}
