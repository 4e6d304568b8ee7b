//! PPTX parser implementation.

use crate::container::{Package, Relationships};
use crate::error::{Error, Result};
use crate::media::extension_or_default;
use crate::model::{
    Cell, ImageData, Paragraph, Picture, Presentation, Row, Shape, Slide, Table, TextRun,
    TextStyle,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use std::path::Path;

const DEFAULT_MAIN_PART: &str = "ppt/presentation.xml";

/// Parser for PPTX (PowerPoint) presentations.
pub struct PptxParser {
    package: Package,
    main_part: String,
    slide_parts: Vec<String>,
}

impl PptxParser {
    /// Open a PPTX file for parsing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    /// Create a parser from an opened package.
    ///
    /// Slide order comes from the slide ID list of the presentation part.
    pub fn from_package(package: Package) -> Result<Self> {
        let main_part = package.main_part(DEFAULT_MAIN_PART)?;
        let rels = package.read_relationships(&main_part)?;
        let xml = package.read_xml(&main_part)?;

        let slide_parts = parse_slide_ids(&xml)?
            .into_iter()
            .filter_map(|rel_id| match rels.get(&rel_id) {
                Some(rel) if !rel.external => Some(Package::resolve_path(&main_part, &rel.target)),
                _ => {
                    log::warn!("slide relationship {} does not resolve, skipping", rel_id);
                    None
                }
            })
            .collect();

        Ok(Self {
            package,
            main_part,
            slide_parts,
        })
    }

    /// The underlying package.
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Path of the presentation part (usually `ppt/presentation.xml`).
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Slide part paths in presentation order.
    pub fn slide_parts(&self) -> &[String] {
        &self.slide_parts
    }

    /// Parse every slide, loading picture blobs as they are referenced.
    pub fn parse(&self) -> Result<Presentation> {
        let mut presentation = Presentation::default();

        for (idx, part) in self.slide_parts.iter().enumerate() {
            let number = idx + 1;
            if !self.package.exists(part) {
                log::warn!("slide {} part {} is missing", number, part);
                presentation.slides.push(Slide::new(number));
                continue;
            }

            let xml = self.package.read_xml(part)?;
            let mut slide = parse_slide_xml(&xml, number)?;
            let rels = self.package.read_relationships(part)?;
            self.load_pictures(&mut slide, part, &rels);

            log::debug!("parsed slide {} ({} shapes)", number, slide.shapes.len());
            presentation.slides.push(slide);
        }

        Ok(presentation)
    }

    fn load_pictures(&self, slide: &mut Slide, part: &str, rels: &Relationships) {
        for shape in &mut slide.shapes {
            let Shape::Picture(picture) = shape else {
                continue;
            };
            let Some(rel_id) = picture.resource_id.as_deref() else {
                continue;
            };

            let target = match rels.get(rel_id) {
                Some(rel) if rel.external => {
                    log::debug!("picture {} links to {}, not extracted", rel_id, rel.target);
                    picture.linked = true;
                    continue;
                }
                Some(rel) => Package::resolve_path(part, &rel.target),
                None => {
                    log::debug!("picture {} has no embedded image part", rel_id);
                    continue;
                }
            };

            match self.package.read_binary(&target) {
                Ok(data) => {
                    picture.image = Some(ImageData {
                        extension: picture_extension(&target),
                        data,
                    });
                }
                Err(e) => log::debug!("picture {} unreadable: {}", rel_id, e),
            }
        }
    }
}

/// Normalized extension of a picture part.
pub fn picture_extension(part_name: &str) -> String {
    match extension_or_default(part_name).to_lowercase().as_str() {
        "jpeg" => "jpg".to_string(),
        "tif" => "tiff".to_string(),
        other => other.to_string(),
    }
}

/// Relationship IDs of `p:sldId` entries, in list order.
fn parse_slide_ids(xml: &str) -> Result<Vec<String>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut ids = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"sldId" =>
            {
                // r:id, not the numeric id
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|attr| {
                        attr.key.local_name().as_ref() == b"id" && attr.key.prefix().is_some()
                    })
                    .map(|attr| String::from_utf8_lossy(&attr.value).to_string());
                if let Some(rel_id) = rel_id {
                    ids.push(rel_id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

/// Parse one slide's shape tree.
pub(crate) fn parse_slide_xml(xml: &str, number: usize) -> Result<Slide> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut slide = SlideReader::new(number);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => slide.start(e),
            Ok(Event::Empty(ref e)) => {
                slide.start(e);
                slide.end(e.name());
            }
            Ok(Event::Text(ref e)) => {
                if slide.in_text() {
                    let text = e.unescape().unwrap_or_default();
                    slide.text(&text);
                }
            }
            Ok(Event::End(ref e)) => slide.end(e.name()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(slide.slide)
}

/// Shape being read.
enum ShapeState {
    Text {
        is_title: bool,
        has_body: bool,
        paragraphs: Vec<Paragraph>,
    },
    Picture(Picture),
    Frame(Option<Table>),
}

/// Streaming reader for `p:spTree`.
///
/// Group shapes are flattened: their children are read like top-level
/// shapes, in document order.
struct SlideReader {
    slide: Slide,
    title_seen: bool,
    fallback_depth: usize,
    shape: Option<ShapeState>,
    row: Option<Row>,
    cell: Option<Cell>,
    para: Option<Paragraph>,
    in_run: bool,
    in_text: bool,
    run_style: TextStyle,
}

impl SlideReader {
    fn new(number: usize) -> Self {
        Self {
            slide: Slide::new(number),
            title_seen: false,
            fallback_depth: 0,
            shape: None,
            row: None,
            cell: None,
            para: None,
            in_run: false,
            in_text: false,
            run_style: TextStyle::default(),
        }
    }

    fn in_text(&self) -> bool {
        self.fallback_depth == 0 && self.in_text && self.para.is_some()
    }

    fn text(&mut self, text: &str) {
        if let Some(para) = self.para.as_mut() {
            if !text.is_empty() {
                para.add_run(TextRun::styled(text, self.run_style.clone()));
            }
        }
    }

    /// Whether a new `a:p` belongs to something being collected.
    fn accepts_paragraph(&self) -> bool {
        match &self.shape {
            Some(ShapeState::Text { has_body, .. }) => *has_body,
            Some(ShapeState::Frame(Some(_))) => self.cell.is_some(),
            _ => false,
        }
    }

    fn start(&mut self, e: &BytesStart) {
        if e.local_name().as_ref() == b"Fallback" {
            self.fallback_depth += 1;
            return;
        }
        if self.fallback_depth > 0 {
            return;
        }

        match e.local_name().as_ref() {
            b"sp" => {
                self.shape = Some(ShapeState::Text {
                    is_title: false,
                    has_body: false,
                    paragraphs: Vec::new(),
                });
            }
            b"pic" => self.shape = Some(ShapeState::Picture(Picture::default())),
            b"graphicFrame" => self.shape = Some(ShapeState::Frame(None)),
            _ => self.shape_element(e),
        }
    }

    fn shape_element(&mut self, e: &BytesStart) {
        let local = e.local_name();
        let name = local.as_ref();
        if self.shape_property(name, e) {
            return;
        }

        match name {
            b"p" if self.accepts_paragraph() => self.para = Some(Paragraph::new()),
            b"pPr" => {
                if let Some(para) = self.para.as_mut() {
                    para.level = local_attr(e, b"lvl")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0);
                }
            }
            b"r" | b"fld" if self.para.is_some() => {
                self.in_run = true;
                self.run_style = TextStyle::default();
            }
            b"rPr" if self.in_run => {
                // Hundredths of a point
                self.run_style.size_pt = local_attr(e, b"sz")
                    .and_then(|v| v.parse::<f32>().ok())
                    .map(|sz| sz / 100.0);
                self.run_style.bold = local_attr(e, b"b").is_some_and(|v| v == "1" || v == "true");
            }
            b"t" if self.in_run => self.in_text = true,
            // Soft breaks keep the paragraph on one line
            b"br" => {
                if let Some(para) = self.para.as_mut() {
                    para.add_run(TextRun::plain(" "));
                }
            }
            _ => {}
        }
    }

    /// Elements that describe the current shape itself.
    fn shape_property(&mut self, name: &[u8], e: &BytesStart) -> bool {
        match self.shape.as_mut() {
            Some(ShapeState::Text {
                is_title, has_body, ..
            }) => match name {
                b"ph" => {
                    let kind = local_attr(e, b"type");
                    if matches!(kind.as_deref(), Some("title") | Some("ctrTitle")) {
                        *is_title = true;
                    }
                    true
                }
                b"txBody" => {
                    *has_body = true;
                    true
                }
                _ => false,
            },
            Some(ShapeState::Picture(picture)) => match name {
                b"cNvPr" => {
                    if picture.name.is_none() {
                        picture.name = local_attr(e, b"name");
                    }
                    true
                }
                b"blip" => {
                    picture.resource_id = local_attr(e, b"embed");
                    picture.linked =
                        picture.resource_id.is_none() && local_attr(e, b"link").is_some();
                    true
                }
                _ => false,
            },
            Some(ShapeState::Frame(table)) => match name {
                b"tbl" => {
                    if table.is_none() {
                        *table = Some(Table::new());
                    }
                    true
                }
                b"tr" if table.is_some() => {
                    self.row = Some(Row::new());
                    true
                }
                b"tc" if table.is_some() && self.row.is_some() => {
                    self.cell = Some(Cell::new());
                    true
                }
                _ => false,
            },
            None => false,
        }
    }

    fn end(&mut self, name: QName) {
        let local = name.local_name();
        if local.as_ref() == b"Fallback" && self.fallback_depth > 0 {
            self.fallback_depth -= 1;
            return;
        }
        if self.fallback_depth > 0 {
            return;
        }

        match local.as_ref() {
            b"t" => self.in_text = false,
            b"r" | b"fld" => {
                self.in_run = false;
                self.in_text = false;
            }
            b"p" => self.end_paragraph(),
            b"tc" => {
                if let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) {
                    row.add_cell(cell);
                }
            }
            b"tr" => {
                if let (Some(row), Some(ShapeState::Frame(Some(table)))) =
                    (self.row.take(), self.shape.as_mut())
                {
                    table.add_row(row);
                }
            }
            b"sp" | b"pic" | b"graphicFrame" => self.end_shape(),
            _ => {}
        }
    }

    fn end_paragraph(&mut self) {
        let Some(para) = self.para.take() else {
            return;
        };
        if let Some(cell) = self.cell.as_mut() {
            cell.content.push(para);
        } else if let Some(ShapeState::Text { paragraphs, .. }) = self.shape.as_mut() {
            paragraphs.push(para);
        }
    }

    fn end_shape(&mut self) {
        let Some(shape) = self.shape.take() else {
            return;
        };

        match shape {
            ShapeState::Text {
                is_title,
                has_body,
                paragraphs,
            } => {
                // Only the first title placeholder is the slide title
                let is_title = is_title && !self.title_seen;
                self.title_seen |= is_title;
                if has_body {
                    self.slide.shapes.push(Shape::Text {
                        is_title,
                        paragraphs,
                    });
                }
            }
            ShapeState::Picture(picture) => self.slide.shapes.push(Shape::Picture(picture)),
            ShapeState::Frame(Some(table)) => self.slide.shapes.push(Shape::Table(table)),
            ShapeState::Frame(None) => {}
        }
    }
}

/// Attribute value matched by local name, ignoring the namespace prefix.
fn local_attr(e: &BytesStart, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}
