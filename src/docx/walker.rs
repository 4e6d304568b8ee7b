//! Markdown projection of a Word document.

use crate::media::RelationshipMap;
use crate::model::{Block, Paragraph, WordDocument};
use crate::render::{
    classify, heading_line, ConvertOptions, MarkdownBuffer, TablePlacement, DOCUMENT_RULES,
};

/// Render a parsed document under a `# <title>` heading.
///
/// Every paragraph emits its image lines first, then at most one text line.
/// A paragraph with neither text nor images acts as a separator and only
/// contributes a blank line.
pub fn render_document(
    document: &WordDocument,
    images: &RelationshipMap,
    title: &str,
    options: &ConvertOptions,
) -> MarkdownBuffer {
    let mut buffer = MarkdownBuffer::new();
    buffer.push_line(heading_line(1, title));
    buffer.push_blank();

    match options.table_placement {
        TablePlacement::AfterParagraphs => {
            for paragraph in document.paragraphs() {
                render_paragraph(paragraph, images, options, &mut buffer);
            }
            for table in document.tables() {
                buffer.push_table(table);
            }
        }
        TablePlacement::DocumentOrder => {
            for block in &document.blocks {
                match block {
                    Block::Paragraph(paragraph) => {
                        render_paragraph(paragraph, images, options, &mut buffer)
                    }
                    Block::Table(table) => buffer.push_table(table),
                }
            }
        }
    }

    buffer
}

fn render_paragraph(
    paragraph: &Paragraph,
    images: &RelationshipMap,
    options: &ConvertOptions,
    buffer: &mut MarkdownBuffer,
) {
    for image in &paragraph.images {
        match images.get(&image.resource_id) {
            Some(extracted) => buffer.push_image(extracted),
            None => log::debug!("no extracted image for {}", image.resource_id),
        }
    }

    let text = paragraph.text();
    if !text.is_empty() {
        let kind = classify(paragraph, DOCUMENT_RULES, options);
        buffer.push_line(kind.render(&text));
    } else if paragraph.images.is_empty() {
        buffer.push_blank();
    }
}
