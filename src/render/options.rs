//! Conversion options configuration.

/// Name of the Markdown file written into the output directory.
pub const MARKDOWN_FILE_NAME: &str = "index.md";

/// Font size (points) at or above which a slide paragraph becomes a heading.
pub const DEFAULT_HEADING_FONT_SIZE_PT: f32 = 24.0;

/// Where Word tables land relative to body paragraphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TablePlacement {
    /// All paragraphs first, then every table in document order
    #[default]
    AfterParagraphs,
    /// Tables interleaved with paragraphs where they appear in the body
    DocumentOrder,
}

/// Options for a conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Placement of Word tables
    pub table_placement: TablePlacement,

    /// Slide paragraphs with any run at least this large become `###` headings
    pub heading_font_size_pt: f32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            table_placement: TablePlacement::AfterParagraphs,
            heading_font_size_pt: DEFAULT_HEADING_FONT_SIZE_PT,
        }
    }
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set where Word tables are placed.
    pub fn with_table_placement(mut self, placement: TablePlacement) -> Self {
        self.table_placement = placement;
        self
    }

    /// Set the slide heading font-size threshold, in points.
    pub fn with_heading_font_size(mut self, size_pt: f32) -> Self {
        self.heading_font_size_pt = size_pt;
        self
    }
}
