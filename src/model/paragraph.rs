//! Paragraph and text run models.

use serde::{Deserialize, Serialize};

/// Run-level formatting hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold set directly on the run
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,

    /// Explicit font size in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_pt: Option<f32>,
}

impl TextStyle {
    /// Create a bold style.
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Default::default()
        }
    }

    /// Create a style with an explicit font size.
    pub fn sized(size_pt: f32) -> Self {
        Self {
            size_pt: Some(size_pt),
            ..Default::default()
        }
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    #[serde(default)]
    pub style: TextStyle,
}

impl TextRun {
    /// Create a plain text run with no styling.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a styled text run.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Whether the run carries only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Numbering metadata of a list paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListInfo {
    /// Nesting level (0 = top level)
    pub level: u8,
}

/// An image referenced from inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    /// Relationship ID of the image part
    pub resource_id: String,
}

/// A paragraph of text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in this paragraph
    #[serde(default)]
    pub runs: Vec<TextRun>,

    /// Resolved style name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,

    /// List numbering metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_info: Option<ListInfo>,

    /// Outline level inside a text frame (0 = top level)
    #[serde(default)]
    pub level: u8,

    /// Images embedded in the paragraph, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<InlineImage>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with the given text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
            ..Default::default()
        }
    }

    /// Set the style name.
    pub fn with_style(mut self, name: impl Into<String>) -> Self {
        self.style_name = Some(name.into());
        self
    }

    /// Mark as a list item at the given nesting level.
    pub fn with_list_level(mut self, level: u8) -> Self {
        self.list_info = Some(ListInfo { level });
        self
    }

    /// Add a text run to this paragraph.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Get the plain text content.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// The trimmed text used for rendering.
    pub fn text(&self) -> String {
        self.plain_text().trim().to_string()
    }

    /// Check if this paragraph has no visible text.
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(TextRun::is_blank)
    }

    /// Whether every non-blank run is bold (and at least one exists).
    pub fn is_all_bold(&self) -> bool {
        let mut visible = self.runs.iter().filter(|r| !r.is_blank()).peekable();
        visible.peek().is_some() && visible.all(|r| r.style.bold)
    }

    /// Largest explicit run font size, in points.
    pub fn max_font_size(&self) -> Option<f32> {
        self.runs
            .iter()
            .filter_map(|r| r.style.size_pt)
            .fold(None, |max, size| match max {
                Some(m) if m >= size => Some(m),
                _ => Some(size),
            })
    }
}
