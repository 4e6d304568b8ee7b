//! Markdown projection shared by both pipelines.
//!
//! Walkers classify paragraphs with [`classify`] and push lines into a
//! [`MarkdownBuffer`], which keeps blank lines in check and serializes the
//! final `index.md`.

mod buffer;
mod classify;
mod options;
mod style_mapping;
mod table;

pub use buffer::MarkdownBuffer;
pub use classify::{classify, LineKind, Rule, DOCUMENT_RULES, SLIDE_RULES};
pub use options::{
    ConvertOptions, TablePlacement, DEFAULT_HEADING_FONT_SIZE_PT, MARKDOWN_FILE_NAME,
};
pub use style_mapping::{heading_level, heading_line};
pub use table::table_lines;
