//! Presentation model: slides and their shapes.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// Raw image bytes taken from a picture shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// File extension without the dot (e.g., "png")
    pub extension: String,

    /// Image bytes, untouched
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// A picture shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    /// Shape name from the non-visual properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Relationship ID of the image part
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    /// The image, if its part could be resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,

    /// The image lives outside the package (`TargetMode="External"`)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub linked: bool,
}

/// A visual element on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    /// A shape with a text frame
    Text {
        /// Whether this is the slide's title placeholder
        is_title: bool,
        /// Paragraphs of the text frame
        paragraphs: Vec<Paragraph>,
    },
    /// A picture
    Picture(Picture),
    /// A graphic frame holding a table
    Table(Table),
}

/// One slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based slide number
    pub number: usize,

    /// Shapes in document order
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create an empty slide.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Text of the title placeholder, if present and not blank.
    ///
    /// Paragraphs of a multi-line title are joined with a single space.
    pub fn title(&self) -> Option<String> {
        let paragraphs = self.shapes.iter().find_map(|shape| match shape {
            Shape::Text {
                is_title: true,
                paragraphs,
            } => Some(paragraphs),
            _ => None,
        })?;

        let title = paragraphs
            .iter()
            .map(Paragraph::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }
}

/// A parsed presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    /// Slides in presentation order
    #[serde(default)]
    pub slides: Vec<Slide>,
}
