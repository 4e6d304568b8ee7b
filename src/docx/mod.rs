//! DOCX (Word) document pipeline.
//!
//! [`DocxParser`] reads the body of a Word package into a
//! [`WordDocument`](crate::model::WordDocument); [`render_document`] turns it
//! into Markdown lines, with images resolved through the relationship map of
//! the main part.

mod parser;
mod styles;
mod walker;

pub use parser::DocxParser;
pub use styles::{Style, StyleMap};
pub use walker::render_document;
