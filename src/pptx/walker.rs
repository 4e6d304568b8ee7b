//! Markdown projection of a presentation.

use crate::error::Result;
use crate::media::{ImageStore, SlideImageNames};
use crate::model::{Presentation, Shape, Slide};
use crate::render::{classify, heading_line, ConvertOptions, MarkdownBuffer, SLIDE_RULES};

/// Heading text of a slide without a title placeholder.
pub const UNTITLED_SLIDE: &str = "(untitled)";

/// Markdown of a presentation plus the pictures that could not be written.
#[derive(Debug)]
pub struct RenderedPresentation {
    /// Rendered lines
    pub buffer: MarkdownBuffer,
    /// Picture shapes whose image part was missing
    pub skipped_images: usize,
}

/// Render a parsed presentation under a `# <title>` heading.
///
/// Each slide gets a `## Slide N: <title>` heading followed by its shapes in
/// document order. Pictures are written to `store` as they are met, named
/// per slide.
pub fn render_presentation(
    presentation: &Presentation,
    store: &mut ImageStore,
    title: &str,
    options: &ConvertOptions,
) -> Result<RenderedPresentation> {
    let mut buffer = MarkdownBuffer::new();
    buffer.push_line(heading_line(1, title));
    buffer.push_blank();

    let mut skipped_images = 0;
    for slide in &presentation.slides {
        let (lines, skipped) = render_slide(slide, store, options)?;
        skipped_images += skipped;

        let slide_title = slide.title().unwrap_or_else(|| UNTITLED_SLIDE.to_string());
        buffer.push_blank();
        buffer.push_line(format!("## Slide {}: {}", slide.number, slide_title));
        buffer.push_blank();
        buffer.append(lines);
    }

    Ok(RenderedPresentation {
        buffer,
        skipped_images,
    })
}

fn render_slide(
    slide: &Slide,
    store: &mut ImageStore,
    options: &ConvertOptions,
) -> Result<(MarkdownBuffer, usize)> {
    let mut lines = MarkdownBuffer::new();
    let mut names = SlideImageNames::new(slide.number);
    let mut skipped = 0;

    for shape in &slide.shapes {
        match shape {
            Shape::Text {
                is_title: true, ..
            } => {}
            Shape::Text { paragraphs, .. } => {
                for paragraph in paragraphs {
                    let text = paragraph.text();
                    if text.is_empty() {
                        continue;
                    }
                    let kind = classify(paragraph, SLIDE_RULES, options);
                    lines.push_line(kind.render(&text));
                }
            }
            Shape::Picture(picture) => match &picture.image {
                Some(image) => {
                    let saved = store.save(&mut names, &image.data, &image.extension)?;
                    lines.push_image(&saved);
                }
                None if picture.linked => {}
                None => {
                    log::warn!(
                        "slide {}: skipping picture {} without image data",
                        slide.number,
                        picture.name.as_deref().unwrap_or("(unnamed)")
                    );
                    skipped += 1;
                }
            },
            Shape::Table(table) => lines.push_table(table),
        }
    }

    Ok((lines, skipped))
}
