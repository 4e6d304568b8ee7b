//! Style name to heading level mapping.
//!
//! Word paragraphs are promoted to headings purely by the display name of
//! their paragraph style. The table covers the English built-in names and
//! the Russian localized ones; lookups ignore case.

/// Lower-cased style name → heading level.
static HEADING_STYLES: &[(&str, u8)] = &[
    ("heading 1", 1),
    ("heading 2", 2),
    ("heading 3", 3),
    ("heading 4", 4),
    ("heading 5", 5),
    ("title", 1),
    ("subtitle", 2),
    ("заголовок 1", 1),
    ("заголовок 2", 2),
    ("заголовок 3", 3),
    ("заголовок 4", 4),
];

/// Heading level for a style name, if the style is a known heading style.
pub fn heading_level(style_name: &str) -> Option<u8> {
    let name = style_name.to_lowercase();
    HEADING_STYLES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, level)| *level)
}

/// ATX heading line at the given level.
pub fn heading_line(level: u8, text: &str) -> String {
    format!("{} {}", "#".repeat(usize::from(level)), text)
}
