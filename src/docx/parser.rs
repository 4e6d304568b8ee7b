//! DOCX parser implementation.

use super::styles::{attr_value, bool_attr, StyleMap};
use crate::container::Package;
use crate::error::{Error, Result};
use crate::model::{
    Block, Cell, InlineImage, ListInfo, Paragraph, Row, Table, TextRun, TextStyle, WordDocument,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use std::collections::HashMap;

const DEFAULT_MAIN_PART: &str = "word/document.xml";
const DEFAULT_STYLES_PART: &str = "word/styles.xml";

/// Upper bound on `w:gridSpan` when the table declares no grid.
const MAX_GRID_COLUMNS: usize = 63;

/// Parser for DOCX (Word) documents.
pub struct DocxParser {
    package: Package,
    main_part: String,
    styles: StyleMap,
}

impl DocxParser {
    /// Open a DOCX file for parsing.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    /// Create a parser from an opened package.
    pub fn from_package(package: Package) -> Result<Self> {
        let main_part = package.main_part(DEFAULT_MAIN_PART)?;

        let styles_part = package
            .read_relationships(&main_part)?
            .find_by_type_suffix("/styles")
            .filter(|rel| !rel.external)
            .map(|rel| Package::resolve_path(&main_part, &rel.target))
            .unwrap_or_else(|| DEFAULT_STYLES_PART.to_string());

        let styles = if package.exists(&styles_part) {
            StyleMap::parse(&package.read_xml(&styles_part)?)?
        } else {
            log::debug!("no styles part, paragraphs carry no style names");
            StyleMap::default()
        };

        Ok(Self {
            package,
            main_part,
            styles,
        })
    }

    /// The underlying package.
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Path of the main document part (usually `word/document.xml`).
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Parse the document body.
    pub fn parse(&self) -> Result<WordDocument> {
        let xml = self.package.read_xml(&self.main_part)?;
        let doc = parse_document_xml(&xml, &self.styles)?;
        log::debug!(
            "parsed {}: {} paragraphs, {} tables",
            self.main_part,
            doc.paragraphs().count(),
            doc.tables().count()
        );
        Ok(doc)
    }
}

/// Parse the main document XML into body blocks.
pub(crate) fn parse_document_xml(xml: &str, styles: &StyleMap) -> Result<WordDocument> {
    let mut reader = quick_xml::Reader::from_str(xml);
    // Don't trim text - preserve whitespace from xml:space="preserve" elements
    reader.config_mut().trim_text(false);

    let mut body = BodyReader::new(styles);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => body.start(e),
            Ok(Event::Empty(ref e)) => {
                body.start(e);
                body.end(e.name());
            }
            Ok(Event::Text(ref e)) => {
                if body.wants_text() {
                    let text = e.unescape().unwrap_or_default();
                    body.text(&text);
                }
            }
            Ok(Event::End(ref e)) => body.end(e.name()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(body.doc)
}

/// Paragraph being read.
#[derive(Default)]
struct ParagraphState {
    paragraph: Paragraph,
    style_id: Option<String>,
    num_id: Option<String>,
    ilvl: u8,
    in_ppr: bool,
    in_num_pr: bool,
    in_run: bool,
    in_rpr: bool,
    in_text: bool,
    run_style: TextStyle,
}

impl ParagraphState {
    fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.paragraph
                .add_run(TextRun::styled(text, self.run_style.clone()));
        }
    }

    fn finish(self, styles: &StyleMap) -> Paragraph {
        let mut paragraph = self.paragraph;
        paragraph.style_name = styles.paragraph_style_name(self.style_id.as_deref());
        // numId 0 removes numbering inherited from the style
        paragraph.list_info = self
            .num_id
            .filter(|id| id != "0")
            .map(|_| ListInfo { level: self.ilvl });
        paragraph
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerticalMerge {
    Restart,
    Continue,
}

/// Cell being read.
struct CellState {
    content: Vec<Paragraph>,
    span: usize,
    merge: Option<VerticalMerge>,
}

/// Rows of the outermost table being read.
#[derive(Default)]
struct TableBuilder {
    table: Table,
    row: Option<Row>,
    cell: Option<CellState>,
    column: usize,
    /// Number of `w:gridCol` entries declared by the table
    grid_columns: usize,
    /// Grid column → cell that started a vertical merge there
    merge_origins: HashMap<usize, Cell>,
}

impl TableBuilder {
    fn start_row(&mut self) {
        self.row = Some(Row::new());
        self.column = 0;
    }

    fn start_cell(&mut self) {
        self.cell = Some(CellState {
            content: Vec::new(),
            span: 1,
            merge: None,
        });
    }

    fn in_cell(&self) -> bool {
        self.cell.is_some()
    }

    fn set_span(&mut self, span: usize) {
        let limit = match self.grid_columns {
            0 => MAX_GRID_COLUMNS,
            n => n,
        };
        if let Some(cell) = self.cell.as_mut() {
            cell.span = span.clamp(1, limit);
        }
    }

    fn set_merge(&mut self, value: Option<&str>) {
        if let Some(cell) = self.cell.as_mut() {
            cell.merge = Some(match value {
                Some("restart") => VerticalMerge::Restart,
                _ => VerticalMerge::Continue,
            });
        }
    }

    fn push_paragraph(&mut self, paragraph: Paragraph) {
        if let Some(cell) = self.cell.as_mut() {
            cell.content.push(paragraph);
        }
    }

    /// Close the cell, repeating it once per grid column it covers.
    fn end_cell(&mut self) {
        let Some(state) = self.cell.take() else {
            return;
        };

        let mut cell = Cell {
            content: state.content,
        };
        match state.merge {
            Some(VerticalMerge::Restart) => {
                self.merge_origins.insert(self.column, cell.clone());
            }
            Some(VerticalMerge::Continue) => {
                if let Some(origin) = self.merge_origins.get(&self.column) {
                    cell = origin.clone();
                }
            }
            None => {
                self.merge_origins.remove(&self.column);
            }
        }

        if let Some(row) = self.row.as_mut() {
            for _ in 0..state.span {
                row.add_cell(cell.clone());
            }
        }
        self.column += state.span;
    }

    fn end_row(&mut self) {
        self.end_cell();
        if let Some(row) = self.row.take() {
            self.table.add_row(row);
        }
    }
}

/// Streaming reader for `w:body`.
///
/// Only body-level paragraphs and the cells of body-level tables are
/// materialized. Paragraphs nested inside other paragraphs (text boxes),
/// nested tables and `mc:Fallback` content are skipped.
struct BodyReader<'a> {
    styles: &'a StyleMap,
    doc: WordDocument,
    para: Option<ParagraphState>,
    para_depth: usize,
    table: Option<TableBuilder>,
    table_depth: usize,
    /// Tables opened inside a paragraph (text boxes)
    framed_tables: usize,
    fallback_depth: usize,
    change_depth: usize,
}

impl<'a> BodyReader<'a> {
    fn new(styles: &'a StyleMap) -> Self {
        Self {
            styles,
            doc: WordDocument::new(),
            para: None,
            para_depth: 0,
            table: None,
            table_depth: 0,
            framed_tables: 0,
            fallback_depth: 0,
            change_depth: 0,
        }
    }

    /// Whether the reader is directly inside the outermost table's grid.
    fn in_table_grid(&self) -> bool {
        self.table_depth == 1 && self.para.is_none()
    }

    fn wants_text(&self) -> bool {
        self.fallback_depth == 0
            && self.para_depth == 1
            && self.para.as_ref().is_some_and(|p| p.in_text)
    }

    fn text(&mut self, text: &str) {
        if let Some(state) = self.para.as_mut() {
            state.push_text(text);
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

        match e.name().as_ref() {
            b"w:p" => self.start_paragraph(),
            b"w:tbl" => self.start_table(),
            b"w:tr" if self.in_table_grid() => {
                if let Some(table) = self.table.as_mut() {
                    table.start_row();
                }
            }
            b"w:tc" if self.in_table_grid() => {
                if let Some(table) = self.table.as_mut() {
                    table.start_cell();
                }
            }
            b"w:gridCol" if self.in_table_grid() => {
                if let Some(table) = self.table.as_mut() {
                    table.grid_columns += 1;
                }
            }
            b"w:gridSpan" if self.in_table_grid() => {
                let span = attr_value(e, b"w:val").and_then(|v| v.parse().ok());
                if let (Some(table), Some(span)) = (self.table.as_mut(), span) {
                    table.set_span(span);
                }
            }
            b"w:vMerge" if self.in_table_grid() => {
                let value = attr_value(e, b"w:val");
                if let Some(table) = self.table.as_mut() {
                    table.set_merge(value.as_deref());
                }
            }
            b"w:pPrChange" | b"w:rPrChange" => self.change_depth += 1,
            _ if self.change_depth == 0 => self.paragraph_element(e),
            _ => {}
        }
    }

    fn start_paragraph(&mut self) {
        if self.para.is_some() {
            self.para_depth += 1;
            return;
        }

        let in_cell =
            self.table_depth == 1 && self.table.as_ref().is_some_and(TableBuilder::in_cell);
        if self.table_depth == 0 || in_cell {
            self.para = Some(ParagraphState::default());
            self.para_depth = 1;
        }
    }

    fn start_table(&mut self) {
        if self.para.is_some() {
            self.framed_tables += 1;
            return;
        }
        self.table_depth += 1;
        if self.table_depth == 1 {
            self.table = Some(TableBuilder::default());
        }
    }

    fn paragraph_element(&mut self, e: &BytesStart) {
        let top_level = self.para_depth == 1;
        let Some(state) = self.para.as_mut() else {
            return;
        };

        // Images count wherever they sit inside the paragraph
        match e.local_name().as_ref() {
            b"blip" => {
                if let Some(id) = local_attr(e, b"embed") {
                    state.paragraph.images.push(InlineImage { resource_id: id });
                }
            }
            b"imagedata" => {
                if let Some(id) = local_attr(e, b"id") {
                    state.paragraph.images.push(InlineImage { resource_id: id });
                }
            }
            _ => {}
        }

        if !top_level {
            return;
        }

        match e.name().as_ref() {
            b"w:pPr" => state.in_ppr = true,
            b"w:pStyle" if state.in_ppr => state.style_id = attr_value(e, b"w:val"),
            b"w:numPr" if state.in_ppr => state.in_num_pr = true,
            b"w:numId" if state.in_num_pr => state.num_id = attr_value(e, b"w:val"),
            b"w:ilvl" if state.in_num_pr => {
                state.ilvl = attr_value(e, b"w:val")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
            }
            b"w:r" => {
                state.in_run = true;
                state.run_style = TextStyle::default();
            }
            b"w:rPr" if state.in_run => state.in_rpr = true,
            b"w:b" if state.in_rpr => {
                state.run_style.bold = bool_attr(e, b"w:val").unwrap_or(true);
            }
            b"w:sz" if state.in_rpr => {
                // Half-points
                state.run_style.size_pt = attr_value(e, b"w:val")
                    .and_then(|v| v.parse::<f32>().ok())
                    .map(|half_points| half_points / 2.0);
            }
            b"w:t" if state.in_run => state.in_text = true,
            b"w:tab" if state.in_run => state.push_text("\t"),
            b"w:cr" if state.in_run => state.push_text("\n"),
            // Page and column breaks carry no text
            b"w:br" if state.in_run => {
                if matches!(attr_value(e, b"w:type").as_deref(), None | Some("textWrapping")) {
                    state.push_text("\n");
                }
            }
            b"w:noBreakHyphen" if state.in_run => state.push_text("-"),
            _ => {}
        }
    }

    fn end(&mut self, name: QName) {
        if name.local_name().as_ref() == b"Fallback" && self.fallback_depth > 0 {
            self.fallback_depth -= 1;
            return;
        }
        if self.fallback_depth > 0 {
            return;
        }

        match name.as_ref() {
            b"w:p" => self.end_paragraph(),
            b"w:tbl" => self.end_table(),
            b"w:tr" if self.in_table_grid() => {
                if let Some(table) = self.table.as_mut() {
                    table.end_row();
                }
            }
            b"w:tc" if self.in_table_grid() => {
                if let Some(table) = self.table.as_mut() {
                    table.end_cell();
                }
            }
            b"w:pPrChange" | b"w:rPrChange" => {
                self.change_depth = self.change_depth.saturating_sub(1);
            }
            other if self.change_depth == 0 && self.para_depth == 1 => {
                if let Some(state) = self.para.as_mut() {
                    match other {
                        b"w:pPr" => state.in_ppr = false,
                        b"w:numPr" => state.in_num_pr = false,
                        b"w:r" => {
                            state.in_run = false;
                            state.in_rpr = false;
                            state.in_text = false;
                        }
                        b"w:rPr" => state.in_rpr = false,
                        b"w:t" => state.in_text = false,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    fn end_paragraph(&mut self) {
        if self.para_depth > 1 {
            self.para_depth -= 1;
            return;
        }
        let Some(state) = self.para.take() else {
            return;
        };
        self.para_depth = 0;

        let paragraph = state.finish(self.styles);
        if self.table_depth == 0 {
            self.doc.add_block(Block::Paragraph(paragraph));
        } else if let Some(table) = self.table.as_mut() {
            table.push_paragraph(paragraph);
        }
    }

    fn end_table(&mut self) {
        if self.framed_tables > 0 {
            self.framed_tables -= 1;
            return;
        }
        if self.table_depth == 0 {
            return;
        }

        self.table_depth -= 1;
        if self.table_depth == 0 {
            if let Some(mut builder) = self.table.take() {
                builder.end_row();
                self.doc.add_block(Block::Table(builder.table));
            }
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
