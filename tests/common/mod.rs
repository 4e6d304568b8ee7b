//! Synthetic .docx / .pptx packages for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const IMAGE_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const STYLES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const SLIDE_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

const W_NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#;
const P_NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

/// Zip the given parts.
pub fn zip_parts(parts: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        for (name, data) in parts {
            zip.start_file(name.as_str(), SimpleFileOptions::default())
                .unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

/// Write package bytes into `dir` under `file_name`.
pub fn write_input(dir: &Path, file_name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, data).unwrap();
    path
}

fn relationship(id: &str, rel_type: &str, target: &str, external: bool) -> String {
    let mode = if external { r#" TargetMode="External""# } else { "" };
    format!(
        r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
        id, rel_type, target, mode
    )
}

fn rels_part(entries: &[String]) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        entries.concat()
    )
    .into_bytes()
}

fn content_types(main_part: &str, main_type: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="{}" ContentType="{}"/></Types>"#,
        main_part, main_type
    )
    .into_bytes()
}

// ---------------------------------------------------------------------------
// Word documents
// ---------------------------------------------------------------------------

/// Builder for a minimal Word package.
#[derive(Default)]
pub struct Docx {
    body: String,
    rels: Vec<String>,
    media: Vec<(String, Vec<u8>)>,
}

impl Docx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw body XML.
    pub fn body(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    /// Declare an image relationship and store its part under `word/`.
    pub fn image(mut self, rel_id: &str, target: &str, data: &[u8]) -> Self {
        self.rels
            .push(relationship(rel_id, IMAGE_REL, target, false));
        self.media
            .push((format!("word/{}", target), data.to_vec()));
        self
    }

    /// Declare an image relationship whose target is absent.
    pub fn broken_image(mut self, rel_id: &str, target: &str) -> Self {
        self.rels
            .push(relationship(rel_id, IMAGE_REL, target, false));
        self
    }

    /// Declare an external (linked) image relationship.
    pub fn linked_image(mut self, rel_id: &str, url: &str) -> Self {
        self.rels.push(relationship(rel_id, IMAGE_REL, url, true));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut rels = vec![relationship("rIdStyles", STYLES_REL, "styles.xml", false)];
        rels.extend(self.rels);

        let mut parts = vec![
            (
                "[Content_Types].xml".to_string(),
                content_types(
                    "/word/document.xml",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
                ),
            ),
            (
                "_rels/.rels".to_string(),
                rels_part(&[relationship(
                    "rId1",
                    OFFICE_DOCUMENT_REL,
                    "word/document.xml",
                    false,
                )]),
            ),
            (
                "word/document.xml".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {}><w:body>{}<w:sectPr/></w:body></w:document>"#,
                    W_NS, self.body
                )
                .into_bytes(),
            ),
            ("word/_rels/document.xml.rels".to_string(), rels_part(&rels)),
            ("word/styles.xml".to_string(), STYLES.as_bytes().to_vec()),
        ];
        parts.extend(self.media);
        zip_parts(&parts)
    }
}

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
  <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style>
  <w:style w:type="paragraph" w:styleId="ru1"><w:name w:val="Заголовок 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/></w:style>
</w:styles>"#;

/// A plain paragraph.
pub fn para(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
}

/// A paragraph with the given style ID.
pub fn styled(style_id: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
        style_id, text
    )
}

/// A numbered list paragraph.
pub fn list_item(text: &str, level: u8) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="{}"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
        level, text
    )
}

/// A paragraph whose only run is bold.
pub fn bold(text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>{}</w:t></w:r></w:p>"#,
        text
    )
}

/// A paragraph holding one inline picture, with optional caption text.
pub fn image_para(rel_id: &str, text: &str) -> String {
    let caption = if text.is_empty() {
        String::new()
    } else {
        format!("<w:r><w:t>{}</w:t></w:r>", text)
    };
    format!(
        r#"<w:p><w:r><w:drawing><wp:inline><wp:docPr id="1" name="Picture 1"/><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="{}"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>{}</w:p>"#,
        rel_id, caption
    )
}

/// A table with one paragraph per cell.
pub fn table(rows: &[&[&str]]) -> String {
    let mut xml = String::from("<w:tbl><w:tblPr/><w:tblGrid/>");
    for row in rows {
        xml.push_str("<w:tr>");
        for cell in *row {
            xml.push_str(&format!("<w:tc><w:tcPr/>{}</w:tc>", para(cell)));
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

// ---------------------------------------------------------------------------
// Presentations
// ---------------------------------------------------------------------------

struct SlidePart {
    tree: String,
    rels: Vec<String>,
    media: Vec<(String, Vec<u8>)>,
}

/// Builder for a minimal presentation package.
#[derive(Default)]
pub struct Pptx {
    slides: Vec<SlidePart>,
    order: Option<Vec<usize>>,
}

impl Pptx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slide with the given shape tree XML.
    pub fn slide(mut self, tree: &str) -> Self {
        self.slides.push(SlidePart {
            tree: tree.to_string(),
            rels: Vec::new(),
            media: Vec::new(),
        });
        self
    }

    /// Attach an image part to the most recently added slide.
    pub fn slide_image(mut self, rel_id: &str, media_name: &str, data: &[u8]) -> Self {
        if let Some(slide) = self.slides.last_mut() {
            slide.rels.push(relationship(
                rel_id,
                IMAGE_REL,
                &format!("../media/{}", media_name),
                false,
            ));
            slide
                .media
                .push((format!("ppt/media/{}", media_name), data.to_vec()));
        }
        self
    }

    /// Declare an image relationship on the last slide without its part.
    pub fn broken_slide_image(mut self, rel_id: &str, media_name: &str) -> Self {
        if let Some(slide) = self.slides.last_mut() {
            slide.rels.push(relationship(
                rel_id,
                IMAGE_REL,
                &format!("../media/{}", media_name),
                false,
            ));
        }
        self
    }

    /// Declare an external (linked) image relationship on the last slide.
    pub fn linked_slide_image(mut self, rel_id: &str, url: &str) -> Self {
        if let Some(slide) = self.slides.last_mut() {
            slide.rels.push(relationship(rel_id, IMAGE_REL, url, true));
        }
        self
    }

    /// Order of the slide ID list, as 0-based indices of added slides.
    pub fn order(mut self, order: &[usize]) -> Self {
        self.order = Some(order.to_vec());
        self
    }

    pub fn build(self) -> Vec<u8> {
        let order = self
            .order
            .clone()
            .unwrap_or_else(|| (0..self.slides.len()).collect());

        let slide_ids: String = order
            .iter()
            .map(|&i| format!(r#"<p:sldId id="{}" r:id="rIdS{}"/>"#, 256 + i, i + 1))
            .collect();
        let presentation_rels: Vec<String> = (0..self.slides.len())
            .map(|i| {
                relationship(
                    &format!("rIdS{}", i + 1),
                    SLIDE_REL,
                    &format!("slides/slide{}.xml", i + 1),
                    false,
                )
            })
            .collect();

        let mut parts = vec![
            (
                "[Content_Types].xml".to_string(),
                content_types(
                    "/ppt/presentation.xml",
                    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml",
                ),
            ),
            (
                "_rels/.rels".to_string(),
                rels_part(&[relationship(
                    "rId1",
                    OFFICE_DOCUMENT_REL,
                    "ppt/presentation.xml",
                    false,
                )]),
            ),
            (
                "ppt/presentation.xml".to_string(),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {}><p:sldIdLst>{}</p:sldIdLst></p:presentation>"#,
                    P_NS, slide_ids
                )
                .into_bytes(),
            ),
            (
                "ppt/_rels/presentation.xml.rels".to_string(),
                rels_part(&presentation_rels),
            ),
        ];

        for (i, slide) in self.slides.into_iter().enumerate() {
            let n = i + 1;
            parts.push((
                format!("ppt/slides/slide{}.xml", n),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>"#,
                    P_NS, slide.tree
                )
                .into_bytes(),
            ));
            if !slide.rels.is_empty() {
                parts.push((
                    format!("ppt/slides/_rels/slide{}.xml.rels", n),
                    rels_part(&slide.rels),
                ));
            }
            parts.extend(slide.media);
        }

        zip_parts(&parts)
    }
}

/// A title placeholder shape.
pub fn title_shape(text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US" sz="4400"/><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        text
    )
}

/// A text shape; each paragraph is `(text, level, size in points)`.
pub fn text_shape(paragraphs: &[(&str, u8, Option<u32>)]) -> String {
    let mut xml = String::from(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/>"#,
    );
    for (text, level, size) in paragraphs {
        let size_attr = size
            .map(|s| format!(r#" sz="{}""#, s * 100))
            .unwrap_or_default();
        xml.push_str(&format!(
            r#"<a:p><a:pPr lvl="{}"/><a:r><a:rPr lang="en-US"{}/><a:t>{}</a:t></a:r></a:p>"#,
            level, size_attr, text
        ));
    }
    xml.push_str("</p:txBody></p:sp>");
    xml
}

/// A picture shape referencing `rel_id`.
pub fn picture(rel_id: &str, name: &str) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="4" name="{}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{}"/></p:blipFill><p:spPr/></p:pic>"#,
        name, rel_id
    )
}

/// A picture shape that only links to `rel_id`.
pub fn linked_picture(rel_id: &str, name: &str) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="5" name="{}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:link="{}"/></p:blipFill><p:spPr/></p:pic>"#,
        name, rel_id
    )
}

/// A graphic frame holding a table.
pub fn table_frame(rows: &[&[&str]]) -> String {
    let mut xml = String::from(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="5" name="Table 4"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblGrid/>"#,
    );
    for row in rows {
        xml.push_str(r#"<a:tr h="370840">"#);
        for cell in *row {
            xml.push_str(&format!(
                r#"<a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>{}</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>"#,
                cell
            ));
        }
        xml.push_str("</a:tr>");
    }
    xml.push_str("</a:tbl></a:graphicData></a:graphic></p:graphicFrame>");
    xml
}

// ---------------------------------------------------------------------------
// Output checks
// ---------------------------------------------------------------------------

/// Sorted file names under `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Output must not hold doubled, leading or trailing blank lines.
pub fn assert_blank_lines_collapsed(markdown: &str) {
    let lines: Vec<&str> = markdown.split('\n').collect();
    assert!(!lines[0].is_empty(), "leading blank line");
    assert!(
        !lines.last().unwrap().is_empty(),
        "trailing blank line in {:?}",
        markdown
    );
    for pair in lines.windows(2) {
        assert!(
            !(pair[0].is_empty() && pair[1].is_empty()),
            "double blank line in {:?}",
            markdown
        );
    }
}

/// Every `![..](images/..)` line must point at an existing file.
pub fn assert_image_links_resolve(markdown: &str, output_dir: &Path) {
    for line in markdown.lines().filter(|l| l.starts_with("![")) {
        let start = line.find("](").unwrap() + 2;
        let target = &line[start..line.len() - 1];
        assert!(
            output_dir.join(target).is_file(),
            "dangling image reference {}",
            target
        );
    }
}
