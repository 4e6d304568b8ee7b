//! DOCX styles parsing.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// A parsed paragraph style definition.
#[derive(Debug, Clone, Default)]
pub struct Style {
    /// Style ID (e.g., "Heading1")
    pub id: String,
    /// Display name (e.g., "heading 1")
    pub name: String,
    /// Whether this is a paragraph style
    pub is_paragraph: bool,
}

/// Paragraph styles from styles.xml, keyed by style ID.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    /// Styles by ID
    pub styles: HashMap<String, Style>,
    /// ID of the default paragraph style
    pub default_paragraph: Option<String>,
}

impl StyleMap {
    /// Parse styles from XML content.
    pub fn parse(xml: &str) -> Result<Self> {
        if xml.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut map = StyleMap::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut current: Option<Style> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) if e.name().as_ref() == b"w:style" => {
                    current = Some(map.begin_style(&e));
                }
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"w:name" => {
                        if let (Some(style), Some(name)) = (current.as_mut(), attr_value(&e, b"w:val"))
                        {
                            style.name = name;
                        }
                    }
                    b"w:style" => {
                        let style = map.begin_style(&e);
                        map.insert(style);
                    }
                    _ => {}
                },
                Ok(Event::End(e)) if e.name().as_ref() == b"w:style" => {
                    if let Some(style) = current.take() {
                        map.insert(style);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(map)
    }

    fn begin_style(&mut self, e: &BytesStart) -> Style {
        let mut style = Style {
            id: attr_value(e, b"w:styleId").unwrap_or_default(),
            is_paragraph: attr_value(e, b"w:type").as_deref() == Some("paragraph"),
            ..Default::default()
        };
        style.name = style.id.clone();

        let is_default = attr_value(e, b"w:default").is_some_and(|v| v == "1" || v == "true");
        if is_default && style.is_paragraph {
            self.default_paragraph = Some(style.id.clone());
        }
        style
    }

    fn insert(&mut self, style: Style) {
        if style.is_paragraph && !style.id.is_empty() {
            self.styles.insert(style.id.clone(), style);
        }
    }

    /// Display name of a paragraph's style.
    ///
    /// Paragraphs without a style reference, or referencing an unknown ID,
    /// fall back to the default paragraph style.
    pub fn paragraph_style_name(&self, style_id: Option<&str>) -> Option<String> {
        style_id
            .and_then(|id| self.styles.get(id))
            .or_else(|| {
                self.default_paragraph
                    .as_deref()
                    .and_then(|id| self.styles.get(id))
            })
            .map(|style| style.name.clone())
    }
}

/// Get an attribute value as a string.
pub(crate) fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Get a boolean attribute value (absent → `None`).
pub(crate) fn bool_attr(e: &BytesStart, key: &[u8]) -> Option<bool> {
    attr_value(e, key).map(|val| val != "0" && val != "false" && val != "off")
}
