//! PPTX (PowerPoint) presentation pipeline.
//!
//! [`PptxParser`] reads slides in presentation order into a
//! [`Presentation`](crate::model::Presentation); [`render_presentation`]
//! writes picture blobs and produces the Markdown lines.

mod parser;
mod walker;

pub use parser::{picture_extension, PptxParser};
pub use walker::{render_presentation, RenderedPresentation, UNTITLED_SLIDE};
