//! Intermediate content model for Office documents.
//!
//! Parsers turn format-specific XML into these structures; the walkers in
//! `docx` and `pptx` turn them into Markdown lines.

mod document;
mod paragraph;
mod slide;
mod table;

pub use document::*;
pub use paragraph::*;
pub use slide::*;
pub use table::*;
